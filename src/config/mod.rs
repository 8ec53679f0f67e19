//! JSON configuration for the bundled tools.

pub mod overlay;
