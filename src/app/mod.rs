// DayzWatch - app/mod.rs
//
// Application layer: collaborator seams, per-tick orchestration, poll loop.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod cycle;
pub mod service;
pub mod source;
