//! Sheet header (`.exh`)

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

use super::column::{ColumnDefinition, ColumnType};
use super::error::{SheetError, SheetResult};
use super::language::Language;

/// Sheet header magic
pub const SHEET_HEADER_MAGIC: [u8; 4] = *b"EXHF";

/// Sheet header format version
pub const SHEET_HEADER_VERSION: u16 = 3;

/// Size of the fixed part of the sheet header
pub const SHEET_HEADER_FIXED_SIZE: usize = 32;

/// How row ids map to records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RowLayout {
    /// Not set
    Unknown = 0,
    /// One record per row id
    Single = 1,
    /// Several sub-records per row id
    Grouped = 2,
}

impl TryFrom<u8> for RowLayout {
    type Error = SheetError;

    fn try_from(value: u8) -> SheetResult<Self> {
        match value {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Single),
            2 => Ok(Self::Grouped),
            other => Err(SheetError::InvalidRowLayout(other)),
        }
    }
}

/// Row id range stored in one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct PageRange {
    /// First row id of the page
    pub start_id: u32,
    /// Number of row ids the page covers
    pub row_count: u32,
}

impl PageRange {
    /// Create a page range
    pub const fn new(start_id: u32, row_count: u32) -> Self {
        Self {
            start_id,
            row_count,
        }
    }

    /// Whether `row_id` falls inside this page
    pub const fn contains(&self, row_id: u32) -> bool {
        row_id >= self.start_id && (row_id - self.start_id) < self.row_count
    }
}

/// Column layout, pagination and language variants of a sheet
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0x00   | 4    | Magic `EXHF` |
/// | 0x04   | 2    | Version |
/// | 0x06   | 2    | Fixed row region size |
/// | 0x08   | 2    | Column count |
/// | 0x0A   | 2    | Page count |
/// | 0x0C   | 2    | Language count |
/// | 0x0E   | 3    | Reserved |
/// | 0x11   | 1    | Row layout |
/// | 0x12   | 2    | Reserved |
/// | 0x14   | 4    | Total row count |
/// | 0x18   | 8    | Reserved |
///
/// Columns (4 bytes each), pages (8 bytes each) and languages (1 byte each)
/// follow. Reserved fields are written as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetHeader {
    /// Format version
    pub version: u16,
    /// Size of one row's fixed column region
    pub row_data_size: u16,
    /// Row layout
    pub row_layout: RowLayout,
    /// Total row count across all pages
    pub total_row_count: u32,
    /// Column definitions
    pub columns: Vec<ColumnDefinition>,
    /// Page ranges
    pub pages: Vec<PageRange>,
    /// Language variants, one page set each
    pub languages: Vec<Language>,
}

impl SheetHeader {
    /// Create a header; the total row count is summed from `pages`
    pub fn new(
        row_layout: RowLayout,
        row_data_size: u16,
        columns: Vec<ColumnDefinition>,
        pages: Vec<PageRange>,
        languages: Vec<Language>,
    ) -> Self {
        let total_row_count = pages.iter().map(|p| p.row_count).sum();
        Self {
            version: SHEET_HEADER_VERSION,
            row_data_size,
            row_layout,
            total_row_count,
            columns,
            pages,
            languages,
        }
    }

    /// Page holding `row_id`
    pub fn page_for(&self, row_id: u32) -> Option<&PageRange> {
        self.pages.iter().find(|page| page.contains(row_id))
    }

    /// Whether pages exist for `language`
    pub fn has_language(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    /// Check every column fits inside the fixed region
    pub fn validate_columns(&self) -> SheetResult<()> {
        for column in &self.columns {
            column.range(self.row_data_size)?;
        }
        Ok(())
    }

    /// Parse a complete header
    pub fn from_bytes(data: &[u8]) -> SheetResult<Self> {
        if data.len() < SHEET_HEADER_FIXED_SIZE {
            return Err(SheetError::Truncated {
                expected: SHEET_HEADER_FIXED_SIZE,
                actual: data.len(),
            });
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&data[..4]);
        if magic != SHEET_HEADER_MAGIC {
            return Err(SheetError::InvalidMagic {
                expected: "EXHF",
                actual: magic,
            });
        }

        let mut cursor = Cursor::new(&data[4..]);
        let version = u16::read_be(&mut cursor)?;
        let row_data_size = u16::read_be(&mut cursor)?;
        let column_count = u16::read_be(&mut cursor)?;
        let page_count = u16::read_be(&mut cursor)?;
        let language_count = u16::read_be(&mut cursor)?;
        cursor.set_position(0x11 - 4);
        let row_layout = RowLayout::try_from(u8::read_be(&mut cursor)?)?;
        cursor.set_position(0x14 - 4);
        let total_row_count = u32::read_be(&mut cursor)?;

        let needed = SHEET_HEADER_FIXED_SIZE
            + usize::from(column_count) * 4
            + usize::from(page_count) * 8
            + usize::from(language_count);
        if data.len() < needed {
            return Err(SheetError::Truncated {
                expected: needed,
                actual: data.len(),
            });
        }

        let mut cursor = Cursor::new(&data[SHEET_HEADER_FIXED_SIZE..]);
        let mut columns = Vec::with_capacity(usize::from(column_count));
        for _ in 0..column_count {
            let kind = ColumnType::try_from(u16::read_be(&mut cursor)?)?;
            let offset = u16::read_be(&mut cursor)?;
            columns.push(ColumnDefinition::new(kind, offset));
        }
        let mut pages = Vec::with_capacity(usize::from(page_count));
        for _ in 0..page_count {
            pages.push(PageRange::read(&mut cursor)?);
        }
        let mut languages = Vec::with_capacity(usize::from(language_count));
        for _ in 0..language_count {
            languages.push(Language::try_from(u8::read_be(&mut cursor)?)?);
        }

        Ok(Self {
            version,
            row_data_size,
            row_layout,
            total_row_count,
            columns,
            pages,
            languages,
        })
    }

    /// Serialize the header
    pub fn to_bytes(&self) -> SheetResult<Vec<u8>> {
        let count = |len: usize, what| u16::try_from(len).map_err(|_| SheetError::TooLarge(what));
        let column_count = count(self.columns.len(), "column table")?;
        let page_count = count(self.pages.len(), "page table")?;
        let language_count = count(self.languages.len(), "language table")?;

        let mut cursor = Cursor::new(Vec::new());
        SHEET_HEADER_MAGIC.write_be(&mut cursor)?;
        self.version.write_be(&mut cursor)?;
        self.row_data_size.write_be(&mut cursor)?;
        column_count.write_be(&mut cursor)?;
        page_count.write_be(&mut cursor)?;
        language_count.write_be(&mut cursor)?;
        [0u8; 3].write_be(&mut cursor)?;
        (self.row_layout as u8).write_be(&mut cursor)?;
        0u16.write_be(&mut cursor)?;
        self.total_row_count.write_be(&mut cursor)?;
        [0u8; 8].write_be(&mut cursor)?;

        for column in &self.columns {
            column.write(&mut cursor)?;
        }
        for page in &self.pages {
            page.write(&mut cursor)?;
        }
        for language in &self.languages {
            (*language as u8).write_be(&mut cursor)?;
        }
        Ok(cursor.into_inner())
    }
}

impl crate::SqPackFormat for SheetHeader {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::from_bytes(data)?)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.to_bytes()?)
    }
}
