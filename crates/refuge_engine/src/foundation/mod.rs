//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math and color types
//! - Frame and simulated-day clocks
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
