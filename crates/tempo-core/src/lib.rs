//! Core types and definitions for the Tempo time-control engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! clock and rewind state, commands, bubble records, components,
//! configuration, and diagnostics. It contains no ECS systems.

pub mod bubble;
pub mod clock;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod state;
pub mod types;
