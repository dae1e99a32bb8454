//! Shared utilities for SIH crates.
//!
//! This crate provides the text helpers used across the workspace:
//! single-byte decoding of legacy record bytes and repair of text that was
//! decoded with the wrong code page.

pub mod text;

// Re-export commonly used functions at crate root for convenience
pub use text::{
    DEFAULT_SOURCE_ENCODING, decode_single_byte, encode_single_byte, is_blank, repair_text,
    resolve_encoding, trim_field_bytes,
};
