//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Colors
//! - Handle collections
//! - Time management
//! - Logging utilities

pub mod collections;
pub mod color;
pub mod logging;
pub mod math;
pub mod time;
