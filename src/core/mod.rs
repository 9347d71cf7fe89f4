// DayzWatch - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or any network/I/O crate directly.

pub mod discovery;
pub mod filter;
pub mod model;
pub mod parser;
pub mod window;
