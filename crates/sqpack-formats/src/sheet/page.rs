//! Row pages (`.exd`)

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};
use std::collections::HashMap;

use super::column::ColumnDefinition;
use super::error::{SheetError, SheetResult};
use super::field::Field;
use super::header::{RowLayout, SheetHeader};
use super::row::RegionCodec;

/// Page magic
pub const PAGE_MAGIC: [u8; 4] = *b"EXDF";

/// Page format version
pub const PAGE_VERSION: u16 = 2;

/// Size of the fixed page header
pub const PAGE_HEADER_SIZE: usize = 32;

/// Size of the header in front of each row record
pub const ROW_HEADER_SIZE: usize = 6;

/// Size of one row index entry
pub const ROW_INDEX_ENTRY_SIZE: usize = 8;

/// Entry of the row id → offset map
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct RowIndexEntry {
    /// Row id
    pub row_id: u32,
    /// Record offset, relative to the end of the page header
    pub offset: u32,
}

/// One sub-row of a row; single-layout rows hold exactly one with id 0
#[derive(Debug, Clone, PartialEq)]
pub struct SubRow {
    /// Sub-row id
    pub id: u16,
    /// Column values in column order
    pub fields: Vec<Field>,
}

/// All records stored under one row id
#[derive(Debug, Clone, PartialEq)]
pub struct PageRow {
    /// Row id
    pub id: u32,
    /// Sub-rows in storage order
    pub sub_rows: Vec<SubRow>,
}

/// Decoded rows of one page, bound to its sheet's column layout
///
/// ```text
/// +----------------------+  0x00
/// | EXDF, version        |
/// | row index size       |
/// | row data size        |
/// +----------------------+  0x20
/// | row index            |  (row id, offset) pairs
/// +----------------------+
/// | row records          |  6-byte row header + payload + padding
/// +----------------------+
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPage {
    layout: RowLayout,
    row_data_size: u16,
    columns: Vec<ColumnDefinition>,
    rows: Vec<PageRow>,
    positions: HashMap<u32, usize>,
}

impl SheetPage {
    /// Create an empty page for `header`'s column layout
    pub fn new(header: &SheetHeader) -> SheetResult<Self> {
        if header.row_layout == RowLayout::Unknown {
            return Err(SheetError::InvalidRowLayout(header.row_layout as u8));
        }
        header.validate_columns()?;
        Ok(Self {
            layout: header.row_layout,
            row_data_size: header.row_data_size,
            columns: header.columns.clone(),
            rows: Vec::new(),
            positions: HashMap::new(),
        })
    }

    fn codec(&self) -> RegionCodec<'_> {
        RegionCodec::new(&self.columns, self.row_data_size)
    }

    fn stride(&self) -> usize {
        2 + usize::from(self.row_data_size)
    }

    /// Row layout of the page
    pub const fn layout(&self) -> RowLayout {
        self.layout
    }

    /// Number of row ids
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the page has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in storage order
    pub fn rows(&self) -> &[PageRow] {
        &self.rows
    }

    /// Row ids in storage order
    pub fn row_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.iter().map(|row| row.id)
    }

    /// Row stored under `row_id`
    pub fn row(&self, row_id: u32) -> Option<&PageRow> {
        self.positions.get(&row_id).map(|&index| &self.rows[index])
    }

    fn require(&self, expected: RowLayout) -> SheetResult<()> {
        if self.layout == expected {
            Ok(())
        } else {
            Err(SheetError::LayoutMismatch {
                expected,
                actual: self.layout,
            })
        }
    }

    /// Fields of a single-layout row
    pub fn get_row(&self, row_id: u32) -> SheetResult<Option<&[Field]>> {
        self.require(RowLayout::Single)?;
        Ok(self
            .row(row_id)
            .and_then(|row| row.sub_rows.first())
            .map(|sub| sub.fields.as_slice()))
    }

    /// Fields of one sub-row of a grouped-layout row
    pub fn get_subrow(&self, row_id: u32, sub_row_id: u16) -> SheetResult<Option<&[Field]>> {
        self.require(RowLayout::Grouped)?;
        Ok(self
            .row(row_id)
            .and_then(|row| row.sub_rows.iter().find(|sub| sub.id == sub_row_id))
            .map(|sub| sub.fields.as_slice()))
    }

    /// Add a single-layout row
    pub fn write_row(&mut self, row_id: u32, fields: Vec<Field>) -> SheetResult<()> {
        self.require(RowLayout::Single)?;
        if self.positions.contains_key(&row_id) {
            return Err(SheetError::DuplicateRow(row_id));
        }
        self.codec().check(&fields)?;
        self.insert_row(PageRow {
            id: row_id,
            sub_rows: vec![SubRow { id: 0, fields }],
        })
    }

    /// Append a sub-row to a grouped-layout row
    ///
    /// Sub-row ids start at 0 and must be added in order.
    pub fn write_subrow(&mut self, row_id: u32, sub_row_id: u16, fields: Vec<Field>) -> SheetResult<()> {
        self.require(RowLayout::Grouped)?;
        self.codec().check(&fields)?;

        let next = self.row(row_id).map_or(0, |row| row.sub_rows.len());
        if usize::from(sub_row_id) != next {
            return Err(SheetError::SubRowOutOfSequence {
                row: row_id,
                expected: u16::try_from(next).unwrap_or(u16::MAX),
                actual: sub_row_id,
            });
        }

        let sub_row = SubRow {
            id: sub_row_id,
            fields,
        };
        match self.positions.get(&row_id) {
            Some(&index) => {
                self.rows[index].sub_rows.push(sub_row);
                Ok(())
            }
            None => self.insert_row(PageRow {
                id: row_id,
                sub_rows: vec![sub_row],
            }),
        }
    }

    fn insert_row(&mut self, row: PageRow) -> SheetResult<()> {
        if self.positions.contains_key(&row.id) {
            return Err(SheetError::DuplicateRow(row.id));
        }
        self.positions.insert(row.id, self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    /// Parse a page using `header`'s column layout
    pub fn parse(header: &SheetHeader, data: &[u8]) -> SheetResult<Self> {
        let mut page = Self::new(header)?;
        if data.len() < PAGE_HEADER_SIZE {
            return Err(SheetError::Truncated {
                expected: PAGE_HEADER_SIZE,
                actual: data.len(),
            });
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&data[..4]);
        if magic != PAGE_MAGIC {
            return Err(SheetError::InvalidMagic {
                expected: "EXDF",
                actual: magic,
            });
        }

        let mut cursor = Cursor::new(&data[4..PAGE_HEADER_SIZE]);
        let _version = u16::read_be(&mut cursor)?;
        let _reserved = u16::read_be(&mut cursor)?;
        let row_index_size = u32::read_be(&mut cursor)? as usize;
        let _row_data_size = u32::read_be(&mut cursor)?;

        let index_end = PAGE_HEADER_SIZE + row_index_size;
        if row_index_size % ROW_INDEX_ENTRY_SIZE != 0 || data.len() < index_end {
            return Err(SheetError::Truncated {
                expected: PAGE_HEADER_SIZE + row_index_size.next_multiple_of(ROW_INDEX_ENTRY_SIZE),
                actual: data.len(),
            });
        }

        let mut cursor = Cursor::new(&data[PAGE_HEADER_SIZE..index_end]);
        for _ in 0..row_index_size / ROW_INDEX_ENTRY_SIZE {
            let entry = RowIndexEntry::read(&mut cursor)?;
            let row = page.decode_record(data, entry)?;
            page.insert_row(row)?;
        }

        Ok(page)
    }

    fn decode_record(&self, data: &[u8], entry: RowIndexEntry) -> SheetResult<PageRow> {
        let start = PAGE_HEADER_SIZE + entry.offset as usize;
        let header = data.get(start..start + ROW_HEADER_SIZE).ok_or(SheetError::Truncated {
            expected: start + ROW_HEADER_SIZE,
            actual: data.len(),
        })?;
        let mut cursor = Cursor::new(header);
        let payload_size = u32::read_be(&mut cursor)? as usize;
        let sub_row_count = u16::read_be(&mut cursor)?;

        let payload_start = start + ROW_HEADER_SIZE;
        let payload_end = payload_start + payload_size;
        let payload = data.get(payload_start..payload_end).ok_or(SheetError::Truncated {
            expected: payload_end,
            actual: data.len(),
        })?;

        let codec = self.codec();
        let sub_rows = match self.layout {
            RowLayout::Grouped => (0..usize::from(sub_row_count))
                .map(|k| {
                    let base = k * self.stride();
                    let id = payload
                        .get(base..base + 2)
                        .map(|b| u16::from_be_bytes([b[0], b[1]]))
                        .ok_or(SheetError::Truncated {
                            expected: base + 2,
                            actual: payload.len(),
                        })?;
                    Ok(SubRow {
                        id,
                        fields: codec.decode(payload, base + 2)?,
                    })
                })
                .collect::<SheetResult<Vec<_>>>()?,
            _ => vec![SubRow {
                id: 0,
                fields: codec.decode(payload, 0)?,
            }],
        };

        Ok(PageRow {
            id: entry.row_id,
            sub_rows,
        })
    }

    fn encode_payload(&self, row: &PageRow) -> SheetResult<Vec<u8>> {
        let codec = self.codec();
        let mut strings = Vec::new();
        let mut payload = Vec::new();

        match self.layout {
            RowLayout::Grouped => {
                let count = row.sub_rows.len();
                for (k, sub) in row.sub_rows.iter().enumerate() {
                    // Strings follow every fixed region, not just this one
                    let bias = (count - k - 1) * self.stride();
                    payload.extend_from_slice(&sub.id.to_be_bytes());
                    payload.extend_from_slice(&codec.encode(&sub.fields, &mut strings, bias)?);
                }
            }
            _ => {
                if let Some(sub) = row.sub_rows.first() {
                    payload = codec.encode(&sub.fields, &mut strings, 0)?;
                }
            }
        }

        payload.extend_from_slice(&strings);
        let padding = (4 - (ROW_HEADER_SIZE + payload.len()) % 4) % 4;
        payload.resize(payload.len() + padding, 0);
        Ok(payload)
    }

    /// Serialize the page; records follow the index in row order
    pub fn build(&self) -> SheetResult<Vec<u8>> {
        let row_index_size = self.rows.len() * ROW_INDEX_ENTRY_SIZE;
        let mut index = Cursor::new(Vec::with_capacity(row_index_size));
        let mut records = Vec::new();

        for row in &self.rows {
            let offset = u32::try_from(row_index_size + records.len())
                .map_err(|_| SheetError::TooLarge("page"))?;
            RowIndexEntry {
                row_id: row.id,
                offset,
            }
            .write(&mut index)?;

            let payload = self.encode_payload(row)?;
            let payload_size =
                u32::try_from(payload.len()).map_err(|_| SheetError::TooLarge("row payload"))?;
            let sub_row_count = u16::try_from(row.sub_rows.len())
                .map_err(|_| SheetError::TooLarge("sub-row count"))?;
            records.extend_from_slice(&payload_size.to_be_bytes());
            records.extend_from_slice(&sub_row_count.to_be_bytes());
            records.extend_from_slice(&payload);
        }

        let row_index_size =
            u32::try_from(row_index_size).map_err(|_| SheetError::TooLarge("row index"))?;
        let row_data_size =
            u32::try_from(records.len()).map_err(|_| SheetError::TooLarge("row data"))?;

        let mut out = Cursor::new(Vec::with_capacity(
            PAGE_HEADER_SIZE + row_index_size as usize + records.len(),
        ));
        PAGE_MAGIC.write_be(&mut out)?;
        PAGE_VERSION.write_be(&mut out)?;
        0u16.write_be(&mut out)?;
        row_index_size.write_be(&mut out)?;
        row_data_size.write_be(&mut out)?;
        [0u8; 16].write_be(&mut out)?;

        let mut out = out.into_inner();
        out.extend_from_slice(&index.into_inner());
        out.extend_from_slice(&records);
        Ok(out)
    }
}
