//! Larder Core - Document Model and Errors
//!
//! Data types shared by the storage layer: the nested key-value [`Document`],
//! the dotted-path resolver, and the error taxonomy. This crate carries no
//! storage behavior.

pub mod document;
pub mod error;
pub mod path;

pub use document::Document;
pub use error::{CodecError, LarderError, LarderResult, StoreError};
