//! Test utilities for protomake.
//!
//! Provides fake `make` executables, proto tree fixtures, an in-memory
//! manifest loader and helpers for serialising environment mutations.

pub mod env_lock;
pub mod env_var_guard;
pub mod error;
pub mod fake_make;
pub mod loader;
pub mod makefile;
pub mod manifest;

pub use fake_make::{RecordingMake, fake_make};
pub use loader::MemoryLoader;
pub use manifest::ManifestTree;
