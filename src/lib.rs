// DayzWatch - lib.rs
//
// Library entry point, exposing every module for integration testing.
// The binary in `main.rs` only wires configuration to these pieces.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
