//! Shared formatting helpers used across screens.

pub mod fmt;
