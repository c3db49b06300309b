//! Read-only HTTP API serving programming languages, lessons and quizzes
//! from JSON files on disk.

pub mod config;
pub mod content;
pub mod error;
pub mod server;
