//! Persistent storage for daemon settings.

pub mod config;
