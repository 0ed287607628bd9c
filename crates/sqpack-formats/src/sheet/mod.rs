//! Sheet formats: headers (`.exh`), the sheet list (`.exl`) and row pages
//! (`.exd`)
//!
//! A sheet is a table with a fixed column layout. Its header lists the
//! columns, the row-id ranges of its pages and the languages it is stored
//! in; each (page, language) pair is a separate stored file. All sheet
//! structures are big-endian.
//!
//! Rows use one of two layouts:
//!
//! - **Single**: one fixed column region per row id, followed by the row's
//!   strings
//! - **Grouped**: several `(sub-row id, fixed region)` pairs per row id,
//!   followed by the strings of every sub-row
//!
//! # Example
//!
//! ```
//! use sqpack_formats::sheet::{
//!     ColumnDefinition, ColumnType, Field, Language, PageRange, RowLayout, SheetHeader,
//!     SheetPage,
//! };
//!
//! let header = SheetHeader::new(
//!     RowLayout::Single,
//!     8,
//!     vec![
//!         ColumnDefinition::new(ColumnType::String, 0),
//!         ColumnDefinition::new(ColumnType::UInt32, 4),
//!     ],
//!     vec![PageRange::new(0, 100)],
//!     vec![Language::English],
//! );
//!
//! let mut page = SheetPage::new(&header)?;
//! page.write_row(1, vec![Field::from("Potion"), Field::UInt32(20)])?;
//!
//! let parsed = SheetPage::parse(&header, &page.build()?)?;
//! assert_eq!(parsed.get_row(1)?.map(|f| f[0].clone()), Some(Field::from("Potion")));
//! # Ok::<(), sqpack_formats::sheet::SheetError>(())
//! ```

mod column;
mod error;
mod field;
mod header;
mod language;
mod list;
mod page;
mod row;

pub use column::{ColumnDefinition, ColumnType};
pub use error::{SheetError, SheetResult};
pub use field::Field;
pub use header::{
    PageRange, RowLayout, SHEET_HEADER_FIXED_SIZE, SHEET_HEADER_MAGIC, SHEET_HEADER_VERSION,
    SheetHeader,
};
pub use language::{
    Language, SHEET_DIRECTORY, SHEET_LIST_PATH, header_path, page_path, page_path_for_value,
};
pub use list::{SHEET_LIST_MAGIC, SHEET_LIST_VERSION, SheetList};
pub use page::{
    PAGE_HEADER_SIZE, PAGE_MAGIC, PAGE_VERSION, PageRow, ROW_HEADER_SIZE, ROW_INDEX_ENTRY_SIZE,
    RowIndexEntry, SheetPage, SubRow,
};
