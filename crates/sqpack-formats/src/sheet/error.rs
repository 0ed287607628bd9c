//! Sheet error types

use super::column::ColumnType;
use thiserror::Error;

/// Sheet-specific error type
#[derive(Debug, Error)]
pub enum SheetError {
    /// Magic bytes do not match
    #[error("invalid magic: expected {expected:?}, got {actual:02X?}")]
    InvalidMagic {
        /// Expected magic
        expected: &'static str,
        /// Bytes found
        actual: [u8; 4],
    },

    /// Not enough bytes for a declared structure
    #[error("truncated data: need {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Unknown column type value
    #[error("invalid column type: {0:#06x}")]
    InvalidColumnType(u16),

    /// Unknown row layout value, or a layout a page cannot use
    #[error("invalid row layout: {0}")]
    InvalidRowLayout(u8),

    /// Unknown or non-addressable language value
    #[error("invalid language: {0}")]
    InvalidLanguage(u8),

    /// Column extends past the fixed row region
    #[error("column at offset {offset} ({size} bytes) exceeds the {row_data_size}-byte row region")]
    ColumnOutOfBounds {
        /// Column byte offset
        offset: u16,
        /// Column width
        size: usize,
        /// Fixed region size from the sheet header
        row_data_size: u16,
    },

    /// Field count differs from the column count
    #[error("expected {expected} fields, got {actual}")]
    FieldCountMismatch {
        /// Column count
        expected: usize,
        /// Fields supplied
        actual: usize,
    },

    /// Field variant does not match its column type
    #[error("field {column} is {actual}, column type is {expected:?}")]
    FieldTypeMismatch {
        /// Column position
        column: usize,
        /// Column type from the header
        expected: ColumnType,
        /// Variant name of the supplied field
        actual: &'static str,
    },

    /// String column payload is not valid text
    #[error("invalid string: {0}")]
    InvalidString(String),

    /// Row id already present in the page
    #[error("duplicate row id {0}")]
    DuplicateRow(u32),

    /// Sub-row ids must be dense and ascending from 0
    #[error("row {row}: expected sub-row {expected}, got {actual}")]
    SubRowOutOfSequence {
        /// Row id
        row: u32,
        /// Next sub-row id
        expected: u16,
        /// Sub-row id supplied
        actual: u16,
    },

    /// Operation does not apply to the sheet's row layout
    #[error("operation needs {expected:?} rows, sheet uses {actual:?}")]
    LayoutMismatch {
        /// Layout the operation works on
        expected: super::header::RowLayout,
        /// Layout of the sheet
        actual: super::header::RowLayout,
    },

    /// Malformed sheet list
    #[error("invalid sheet list: {0}")]
    InvalidSheetList(String),

    /// Structure too large for its size field
    #[error("{0} exceeds its size field")]
    TooLarge(&'static str),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for sheet operations
pub type SheetResult<T> = Result<T, SheetError>;
