//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Seeded random sources for reproducible placement
//! - Logging utilities

pub mod math;
pub mod random;
pub mod logging;
