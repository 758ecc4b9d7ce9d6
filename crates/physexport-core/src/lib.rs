//! physexport core library
//!
//! This crate provides the math types, matrix layout helpers and error
//! handling shared across all physexport components.

pub mod error;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use types::*;
