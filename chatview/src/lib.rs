pub mod action;
pub mod attachment;
pub mod chat;
pub mod models;

// Screen settings (action list, recall expiry, theme) backed by a JSON file
pub mod config;
