//! CLI subcommands
//!
//! Each module defines a clap subcommand with an `execute` method taking
//! the per-invocation [`AppContext`](crate::context::AppContext).

pub mod auth;
pub mod catalog;
pub mod completions;
pub mod config;
pub mod destinations;
pub mod export;
