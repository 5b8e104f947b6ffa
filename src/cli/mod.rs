//! CLI command handlers

pub mod commands;

pub use commands::{exams, movers, open_tracker, parse, rank, save, student};
