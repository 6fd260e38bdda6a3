//! Drafts Kubernetes Jobs that bootstrap a database (user and schema) from
//! inside a cluster that can reach it.
//!
//! The pipeline is single-pass: connection flags are resolved into a
//! [`connection::ConnectionDescriptor`], the engine builds its option set and
//! renders a bootstrap script, and [`manifest`] wraps that script into a
//! `batch/v1` Job written to stdout.

pub mod bootstrap;
pub mod cli;
pub mod connection;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod render;

pub use error::{Error, Result};
