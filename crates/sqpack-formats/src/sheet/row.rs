//! Column codec for one fixed row region
//!
//! Both row layouts share this codec. They differ only in where each
//! region starts inside the row payload and in the bias applied to string
//! offsets, which are stored relative to `region_start + row_data_size`.

use super::column::{ColumnDefinition, ColumnType};
use super::error::{SheetError, SheetResult};
use super::field::Field;

/// Encoder/decoder for the fixed column region of a row or sub-row
#[derive(Debug, Clone, Copy)]
pub(crate) struct RegionCodec<'a> {
    columns: &'a [ColumnDefinition],
    row_data_size: u16,
}

impl<'a> RegionCodec<'a> {
    pub(crate) const fn new(columns: &'a [ColumnDefinition], row_data_size: u16) -> Self {
        Self {
            columns,
            row_data_size,
        }
    }

    pub(crate) const fn size(&self) -> usize {
        self.row_data_size as usize
    }

    /// Check field count, variants and column bounds without encoding
    pub(crate) fn check(&self, fields: &[Field]) -> SheetResult<()> {
        if fields.len() != self.columns.len() {
            return Err(SheetError::FieldCountMismatch {
                expected: self.columns.len(),
                actual: fields.len(),
            });
        }
        for (index, (column, field)) in self.columns.iter().zip(fields).enumerate() {
            if !field.matches(column.kind) {
                return Err(SheetError::FieldTypeMismatch {
                    column: index,
                    expected: column.kind,
                    actual: field.type_name(),
                });
            }
            column.range(self.row_data_size)?;
            if let Field::String(text) = field
                && text.contains('\0')
            {
                return Err(SheetError::InvalidString(format!(
                    "column {index} contains a NUL byte"
                )));
            }
        }
        Ok(())
    }

    /// Encode one region, appending string bytes to `strings`
    ///
    /// `string_bias` is the distance from this region's string base to the
    /// start of `strings` in the final payload.
    pub(crate) fn encode(
        &self,
        fields: &[Field],
        strings: &mut Vec<u8>,
        string_bias: usize,
    ) -> SheetResult<Vec<u8>> {
        self.check(fields)?;
        let mut region = vec![0u8; self.size()];

        for (column, field) in self.columns.iter().zip(fields) {
            let range = column.range(self.row_data_size)?;
            let slot = &mut region[range];
            match field {
                Field::String(text) => {
                    let offset = u32::try_from(string_bias + strings.len())
                        .map_err(|_| SheetError::TooLarge("string tail"))?;
                    slot.copy_from_slice(&offset.to_be_bytes());
                    strings.extend_from_slice(text.as_bytes());
                    strings.push(0);
                }
                Field::Bool(value) => slot[0] = u8::from(*value),
                Field::Int8(value) => slot.copy_from_slice(&value.to_be_bytes()),
                Field::UInt8(value) => slot[0] = *value,
                Field::Int16(value) => slot.copy_from_slice(&value.to_be_bytes()),
                Field::UInt16(value) => slot.copy_from_slice(&value.to_be_bytes()),
                Field::Int32(value) => slot.copy_from_slice(&value.to_be_bytes()),
                Field::UInt32(value) => slot.copy_from_slice(&value.to_be_bytes()),
                Field::Float32(value) => slot.copy_from_slice(&value.to_be_bytes()),
                Field::Int64(value) => slot.copy_from_slice(&value.to_be_bytes()),
                Field::UInt64(value) => slot.copy_from_slice(&value.to_be_bytes()),
                Field::PackedBool(value) => {
                    // false leaves sibling bits alone
                    if *value && let Some(bit) = column.kind.packed_bit() {
                        slot[0] |= 1 << bit;
                    }
                }
            }
        }

        Ok(region)
    }

    /// Decode the region starting at `payload[region_start]`
    pub(crate) fn decode(&self, payload: &[u8], region_start: usize) -> SheetResult<Vec<Field>> {
        let region_end = region_start + self.size();
        let region = payload.get(region_start..region_end).ok_or(SheetError::Truncated {
            expected: region_end,
            actual: payload.len(),
        })?;
        let string_base = region_end;

        self.columns
            .iter()
            .map(|column| {
                let bytes = &region[column.range(self.row_data_size)?];
                Ok(match column.kind {
                    ColumnType::String => {
                        let offset = u32::from_be_bytes(fixed(bytes)) as usize;
                        Field::String(read_string(payload, string_base + offset)?)
                    }
                    ColumnType::Bool => Field::Bool(bytes[0] == 1),
                    ColumnType::Int8 => Field::Int8(i8::from_be_bytes(fixed(bytes))),
                    ColumnType::UInt8 => Field::UInt8(bytes[0]),
                    ColumnType::Int16 => Field::Int16(i16::from_be_bytes(fixed(bytes))),
                    ColumnType::UInt16 => Field::UInt16(u16::from_be_bytes(fixed(bytes))),
                    ColumnType::Int32 => Field::Int32(i32::from_be_bytes(fixed(bytes))),
                    ColumnType::UInt32 => Field::UInt32(u32::from_be_bytes(fixed(bytes))),
                    ColumnType::Float32 => Field::Float32(f32::from_be_bytes(fixed(bytes))),
                    ColumnType::Int64 => Field::Int64(i64::from_be_bytes(fixed(bytes))),
                    ColumnType::UInt64 => Field::UInt64(u64::from_be_bytes(fixed(bytes))),
                    packed => {
                        let bit = packed.packed_bit().unwrap_or(0);
                        Field::PackedBool(bytes[0] & (1 << bit) != 0)
                    }
                })
            })
            .collect()
    }
}

/// Copy a column slice into a fixed-size array
///
/// Callers pass slices sized by `ColumnType::size`, so the lengths match.
fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Read a NUL-terminated UTF-8 string at `payload[start]`
fn read_string(payload: &[u8], start: usize) -> SheetResult<String> {
    let tail = payload.get(start..).ok_or(SheetError::Truncated {
        expected: start,
        actual: payload.len(),
    })?;
    let len = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| SheetError::InvalidString(format!("unterminated string at {start}")))?;
    String::from_utf8(tail[..len].to_vec()).map_err(|e| SheetError::InvalidString(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new(ColumnType::PackedBool0, 0),
            ColumnDefinition::new(ColumnType::PackedBool3, 0),
            ColumnDefinition::new(ColumnType::PackedBool7, 0),
        ]
    }

    #[test]
    fn test_packed_bools_share_one_byte() {
        let columns = flags();
        let codec = RegionCodec::new(&columns, 1);
        let mut strings = Vec::new();

        let cases = [
            ([false, false, false], 0b0000_0000),
            ([true, false, false], 0b0000_0001),
            ([false, true, false], 0b0000_1000),
            ([true, false, true], 0b1000_0001),
            ([true, true, true], 0b1000_1001),
        ];
        for (values, byte) in cases {
            let fields: Vec<Field> = values.iter().map(|v| Field::PackedBool(*v)).collect();
            let region = codec.encode(&fields, &mut strings, 0).expect("encode");
            assert_eq!(region, vec![byte]);
            assert_eq!(codec.decode(&region, 0).expect("decode"), fields);
        }
        assert!(strings.is_empty());
    }

    #[test]
    fn test_scalar_columns() {
        let columns = vec![
            ColumnDefinition::new(ColumnType::Int8, 0),
            ColumnDefinition::new(ColumnType::Bool, 1),
            ColumnDefinition::new(ColumnType::Int16, 2),
            ColumnDefinition::new(ColumnType::Float32, 4),
            ColumnDefinition::new(ColumnType::UInt64, 8),
        ];
        let codec = RegionCodec::new(&columns, 16);
        let fields = vec![
            Field::Int8(-2),
            Field::Bool(true),
            Field::Int16(-300),
            Field::Float32(1.5),
            Field::UInt64(0x0102_0304_0506_0708),
        ];
        let region = codec.encode(&fields, &mut Vec::new(), 0).expect("encode");
        assert_eq!(
            region,
            vec![
                0xFE, 0x01, 0xFE, 0xD4, 0x3F, 0xC0, 0x00, 0x00, //
                0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
            ]
        );
        assert_eq!(codec.decode(&region, 0).expect("decode"), fields);
    }

    #[test]
    fn test_bool_byte_other_than_one_is_false() {
        let columns = vec![ColumnDefinition::new(ColumnType::Bool, 0)];
        let codec = RegionCodec::new(&columns, 1);
        assert_eq!(codec.decode(&[2], 0).unwrap(), vec![Field::Bool(false)]);
        assert_eq!(codec.decode(&[1], 0).unwrap(), vec![Field::Bool(true)]);
    }

    #[test]
    fn test_strings_use_bias() {
        let columns = vec![
            ColumnDefinition::new(ColumnType::String, 0),
            ColumnDefinition::new(ColumnType::String, 4),
        ];
        let codec = RegionCodec::new(&columns, 8);
        let mut strings = b"xx\0".to_vec();
        let region = codec
            .encode(&[Field::from("ab"), Field::from("")], &mut strings, 5)
            .expect("encode");
        assert_eq!(region, vec![0, 0, 0, 8, 0, 0, 0, 11]);
        assert_eq!(strings, b"xx\0ab\0\0".to_vec());
    }

    #[test]
    fn test_mismatches_rejected() {
        let columns = vec![ColumnDefinition::new(ColumnType::UInt16, 0)];
        let codec = RegionCodec::new(&columns, 2);
        assert!(matches!(
            codec.encode(&[Field::Int16(1)], &mut Vec::new(), 0),
            Err(SheetError::FieldTypeMismatch {
                column: 0,
                expected: ColumnType::UInt16,
                actual: "Int16"
            })
        ));
        assert!(matches!(
            codec.encode(&[], &mut Vec::new(), 0),
            Err(SheetError::FieldCountMismatch {
                expected: 1,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_unterminated_string() {
        let columns = vec![ColumnDefinition::new(ColumnType::String, 0)];
        let codec = RegionCodec::new(&columns, 4);
        assert!(matches!(
            codec.decode(&[0, 0, 0, 0, b'a', b'b'], 0),
            Err(SheetError::InvalidString(_))
        ));
    }
}
