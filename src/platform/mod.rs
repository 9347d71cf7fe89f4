// DayzWatch - platform/mod.rs
//
// Platform layer: configuration, file access and the network backends that
// implement the app-layer collaborator traits.
// Must NOT depend on: the binary entry point.

pub mod config;
pub mod fs;
pub mod local;
pub mod openrouter;
pub mod sftp;
pub mod telegram;
