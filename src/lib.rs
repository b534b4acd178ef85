//! Concurrent manifest-driven mirror backup.
//!
//! A manifest names one file or folder per line. Every line is mirrored into
//! the target folder by its own task; folders are copied recursively.

pub mod backup;
pub mod cli;
pub mod error;
pub mod utils;
