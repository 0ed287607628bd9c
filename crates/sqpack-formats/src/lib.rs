//! File format parsers and builders for SqPack containers
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::float_cmp)] // Binary format requirements
#![allow(clippy::derive_partial_eq_without_eq)] // Binary format structs
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! This crate provides symmetric (parser and builder) implementations for the
//! on-disk structures of a SqPack file set (`.index`, `.index2`, `.datN`) and
//! for the sheet payloads stored inside it.
//!
//! # Supported Formats
//!
//! - **Container**: 1024-byte header shared by index and data files
//! - **Index**: Index header plus the `.index` / `.index2` hash tables
//! - **Block**: Stored-file records made of DEFLATE-compressed chunks
//! - **Sheet**: Sheet headers (`.exh`), sheet lists (`.exl`) and row pages
//!   (`.exd`)
//!
//! # Byte order
//!
//! Container, index and data-file headers are little-endian. Everything inside
//! a stored-file record and every sheet structure is big-endian. Each module
//! fixes its own byte order; nothing here is endian-generic.
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Type Safety**: Closed enums for every tagged field
//! - **Round-Trip Guarantee**: parse(build(data)) == data

#![warn(missing_docs)]

pub mod block;
pub mod container;
pub mod index;
pub mod sheet;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

/// Common format trait for self-contained structures
pub trait SqPackFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
