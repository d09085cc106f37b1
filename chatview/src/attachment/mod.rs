//! Conversion of picker and recorder results into outgoing messages.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::models::{MessageBody, OutgoingMessage};

lazy_static! {
    static ref IMAGE_EXTENSIONS: HashSet<&'static str> =
        ["jpg", "jpeg", "png", "gif", "heic", "webp", "bmp"]
            .into_iter()
            .collect();
    static ref VIDEO_EXTENSIONS: HashSet<&'static str> =
        ["mp4", "mov", "m4v", "avi", "mkv", "3gp"]
            .into_iter()
            .collect();
}

/// Entries of the attachment menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentSource {
    Camera,
    PhotoLibrary,
    File,
    Contact,
    Audio,
}

impl AttachmentSource {
    pub fn label(&self) -> &str {
        match self {
            Self::Camera => "Camera",
            Self::PhotoLibrary => "Photos",
            Self::File => "File",
            Self::Contact => "Contact",
            Self::Audio => "Voice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    File,
}

/// File handed back by the camera, photo library or file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedMedia {
    pub path: PathBuf,
    pub mime_type: Option<String>,
    pub file_size: u64,
}

impl PickedMedia {
    /// Classifies by MIME type first, then by file extension.
    pub fn kind(&self) -> MediaKind {
        if let Some(mime_type) = self.mime_type.as_deref() {
            let top_level = mime_type.split('/').next().unwrap_or_default();
            match top_level.to_ascii_lowercase().as_str() {
                "image" => return MediaKind::Image,
                "video" => return MediaKind::Video,
                _ => {}
            }
        }
        let extension = self
            .path
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();
        if IMAGE_EXTENSIONS.contains(extension.as_str()) {
            MediaKind::Image
        } else if VIDEO_EXTENSIONS.contains(extension.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::File
        }
    }

    pub fn into_outgoing(self, source: AttachmentSource) -> Result<OutgoingMessage, anyhow::Error> {
        let kind = self.kind();
        match source {
            AttachmentSource::Camera | AttachmentSource::PhotoLibrary
                if kind == MediaKind::File =>
            {
                return Err(anyhow!(
                    "{} returned unsupported media: {}",
                    source.label(),
                    self.path.display()
                ));
            }
            AttachmentSource::Contact | AttachmentSource::Audio => {
                return Err(anyhow!("{} does not produce media files", source.label()));
            }
            _ => {}
        }
        let path = self.path.to_string_lossy().into_owned();
        let body = match kind {
            MediaKind::Image => MessageBody::Image {
                path,
                file_size: self.file_size,
            },
            MediaKind::Video => MessageBody::Video {
                path,
                file_size: self.file_size,
            },
            MediaKind::File => MessageBody::File {
                display_name: self
                    .path
                    .file_name()
                    .map(|v| v.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.clone()),
                path,
                file_size: self.file_size,
            },
        };
        Ok(OutgoingMessage::new(body))
    }
}

/// User profile shared as a contact card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub user_id: String,
    pub nickname: String,
    pub avatar_url: Option<String>,
}

impl ContactCard {
    pub const EXT_USER_ID: &'static str = "user_card.uid";
    pub const EXT_NICKNAME: &'static str = "user_card.nickname";
    pub const EXT_AVATAR: &'static str = "user_card.avatar";

    pub fn into_outgoing(self) -> Result<OutgoingMessage, anyhow::Error> {
        if self.user_id.trim().is_empty() {
            return Err(anyhow!("Contact card has no user id"));
        }
        let nickname = if self.nickname.trim().is_empty() {
            self.user_id.clone()
        } else {
            self.nickname
        };
        let message = OutgoingMessage::new(MessageBody::Contact {
            user_id: self.user_id.clone(),
            nickname: nickname.clone(),
            avatar_url: self.avatar_url.clone(),
        })
        .with_ext(Self::EXT_USER_ID, self.user_id)
        .with_ext(Self::EXT_NICKNAME, nickname)
        .with_ext(Self::EXT_AVATAR, self.avatar_url.unwrap_or_default());
        Ok(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRecording {
    pub path: PathBuf,
    pub duration: Duration,
}

impl AudioRecording {
    pub const MIN_DURATION: Duration = Duration::from_secs(1);
    pub const MAX_DURATION: Duration = Duration::from_secs(60);

    /// Rejects recordings shorter than a second, clamps long ones.
    pub fn into_outgoing(self) -> Result<OutgoingMessage, anyhow::Error> {
        if self.duration < Self::MIN_DURATION {
            return Err(anyhow!("Recording is too short"));
        }
        let duration = self.duration.min(Self::MAX_DURATION);
        Ok(OutgoingMessage::new(MessageBody::Audio {
            path: self.path.to_string_lossy().into_owned(),
            duration_secs: duration.as_secs() as u32,
        }))
    }
}
