//! Output formatters for scan and purge results.
//!
//! One format: plain text, rendered to any `Write` destination so a file
//! and a console stream are interchangeable.

pub mod text;
