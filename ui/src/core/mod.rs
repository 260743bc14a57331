//! Small shared helpers used across the views.

pub mod format;
