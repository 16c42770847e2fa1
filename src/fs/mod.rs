//! Filesystem utilities for uwconfig.
//!
//! Output files are only ever replaced atomically so that a failed dump
//! never leaves a half-written config behind.

pub mod atomic;
pub mod existing;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
pub use existing::{ExistAction, handle_existing};
