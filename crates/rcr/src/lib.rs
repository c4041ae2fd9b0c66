//! rcr: Remote CLI Runner
//!
//! Runs a command on the single configured remote host over SSH, relaying
//! its output and mirroring its exit status locally.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod logging;
