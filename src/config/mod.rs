//! Configuration management for the transfer tool
//!
//! Settings live in a small JSON file under the platform config directory.
//! Everything has a default, so the file is optional.

pub mod settings;

pub use settings::Settings;
