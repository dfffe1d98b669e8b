//! FITS binary table extension reading and writing.
//!
//! Every column holds one scalar per row. Numeric columns share the image
//! zero-offset conventions (TZEROn instead of BZERO); strings are stored as
//! fixed-width `nA` fields padded with NUL bytes.

use ndarray::Array1;

use crate::array::ArrayData;
use crate::error::{Error, Result};
use crate::extension::{build_extension_header, ExtensionType};
use crate::hdu::Hdu;
use crate::header::{check_header_text, Card, Header};
use crate::image::{decode_pixels, encode_pixels, pixel_format};
use crate::value::Value;

/// Storage format of one binary table column (the TFORMn type code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    /// L -- logical, one byte `T` or `F`.
    Logical,
    /// B -- unsigned byte.
    Byte,
    /// I -- 16-bit signed integer.
    Short,
    /// J -- 32-bit signed integer.
    Int,
    /// K -- 64-bit signed integer.
    Long,
    /// E -- 32-bit IEEE float.
    Float,
    /// D -- 64-bit IEEE float.
    Double,
    /// nA -- character field of the given width.
    Ascii(usize),
}

impl ColumnFormat {
    /// Bytes this column occupies in each row.
    pub fn byte_width(&self) -> usize {
        match self {
            ColumnFormat::Logical | ColumnFormat::Byte => 1,
            ColumnFormat::Short => 2,
            ColumnFormat::Int | ColumnFormat::Float => 4,
            ColumnFormat::Long | ColumnFormat::Double => 8,
            ColumnFormat::Ascii(width) => *width,
        }
    }

    /// The equivalent image BITPIX for numeric formats.
    fn bitpix(&self) -> Option<i64> {
        match self {
            ColumnFormat::Byte => Some(8),
            ColumnFormat::Short => Some(16),
            ColumnFormat::Int => Some(32),
            ColumnFormat::Long => Some(64),
            ColumnFormat::Float => Some(-32),
            ColumnFormat::Double => Some(-64),
            ColumnFormat::Logical | ColumnFormat::Ascii(_) => None,
        }
    }

    fn from_bitpix(bitpix: i64) -> Option<Self> {
        match bitpix {
            8 => Some(ColumnFormat::Byte),
            16 => Some(ColumnFormat::Short),
            32 => Some(ColumnFormat::Int),
            64 => Some(ColumnFormat::Long),
            -32 => Some(ColumnFormat::Float),
            -64 => Some(ColumnFormat::Double),
            _ => None,
        }
    }

    /// The TFORMn value, e.g. `J` or `12A`.
    pub fn tform(&self) -> String {
        match self {
            ColumnFormat::Logical => String::from("L"),
            ColumnFormat::Byte => String::from("B"),
            ColumnFormat::Short => String::from("I"),
            ColumnFormat::Int => String::from("J"),
            ColumnFormat::Long => String::from("K"),
            ColumnFormat::Float => String::from("E"),
            ColumnFormat::Double => String::from("D"),
            ColumnFormat::Ascii(width) => format!("{width}A"),
        }
    }

    /// Parse a TFORMn value. Only scalar numeric columns (repeat 1) and
    /// character fields are accepted.
    pub fn parse_tform(s: &str) -> Result<Self> {
        let s = s.trim();
        let code = s
            .chars()
            .last()
            .ok_or_else(|| Error::UnsupportedTform(s.to_owned()))?;
        let repeat_str = &s[..s.len() - code.len_utf8()];
        let repeat = if repeat_str.is_empty() {
            1
        } else {
            repeat_str
                .parse::<usize>()
                .map_err(|_| Error::UnsupportedTform(s.to_owned()))?
        };

        if code == 'A' {
            return Ok(ColumnFormat::Ascii(repeat));
        }
        if repeat != 1 {
            return Err(Error::UnsupportedTform(s.to_owned()));
        }
        match code {
            'L' => Ok(ColumnFormat::Logical),
            'B' => Ok(ColumnFormat::Byte),
            'I' => Ok(ColumnFormat::Short),
            'J' => Ok(ColumnFormat::Int),
            'K' => Ok(ColumnFormat::Long),
            'E' => Ok(ColumnFormat::Float),
            'D' => Ok(ColumnFormat::Double),
            _ => Err(Error::UnsupportedTform(s.to_owned())),
        }
    }
}

/// Format and optional TZERO used to store `data` as a column.
///
/// Character fields are as wide as the longest value, and at least one byte.
pub fn column_format(data: &ArrayData) -> (ColumnFormat, Option<Value>) {
    match data {
        ArrayData::Bool(_) => (ColumnFormat::Logical, None),
        ArrayData::Str(a) => {
            let width = a.iter().map(String::len).max().unwrap_or(0).max(1);
            (ColumnFormat::Ascii(width), None)
        }
        numeric => match pixel_format(numeric.element_type()) {
            Some((bitpix, zero)) => (
                ColumnFormat::from_bitpix(bitpix).unwrap_or(ColumnFormat::Byte),
                zero,
            ),
            None => (ColumnFormat::Byte, None),
        },
    }
}

/// Encode all values of a column back to back, `format.byte_width()` bytes each.
fn encode_column(data: &ArrayData, format: ColumnFormat) -> Result<Vec<u8>> {
    match data {
        ArrayData::Bool(a) => Ok(a.iter().map(|&b| if b { b'T' } else { b'F' }).collect()),
        ArrayData::Str(a) => {
            let width = format.byte_width();
            let mut buf = Vec::with_capacity(a.len() * width);
            for s in a.iter() {
                let bytes = s.as_bytes();
                let len = bytes.len().min(width);
                buf.extend_from_slice(&bytes[..len]);
                buf.resize(buf.len() + width - len, 0);
            }
            Ok(buf)
        }
        numeric => encode_pixels(numeric),
    }
}

fn decode_column(raw: &[u8], format: ColumnFormat, zero: f64, rows: usize) -> Result<ArrayData> {
    let data = match format {
        ColumnFormat::Logical => {
            let values: Vec<bool> = raw.iter().map(|&b| b == b'T').collect();
            ArrayData::Bool(Array1::from_vec(values).into_dyn())
        }
        ColumnFormat::Ascii(width) => {
            let values: Vec<String> = if width == 0 {
                vec![String::new(); rows]
            } else {
                raw.chunks_exact(width)
                    .map(|field| {
                        String::from_utf8_lossy(field)
                            .trim_end_matches(|c: char| c == '\0' || c == ' ')
                            .to_owned()
                    })
                    .collect()
            };
            ArrayData::Str(Array1::from_vec(values).into_dyn())
        }
        numeric => {
            let bitpix = numeric
                .bitpix()
                .ok_or_else(|| Error::UnsupportedTform(numeric.tform()))?;
            decode_pixels(bitpix, zero, raw, &[rows])?
        }
    };
    Ok(data)
}

/// Build a `BINTABLE` extension from named one-dimensional columns.
///
/// All columns must have the row count of the first one.
pub fn bintable_hdu(columns: &[(String, ArrayData)]) -> Result<Hdu> {
    let rows = columns.first().map_or(0, |(_, data)| data.rows());
    let mut layout = Vec::with_capacity(columns.len());
    for (name, data) in columns {
        check_header_text(name)?;
        if data.ndim() != 1 {
            return Err(Error::NotOneDimensional {
                name: name.clone(),
                ndim: data.ndim(),
            });
        }
        if data.rows() != rows {
            return Err(Error::ColumnLength {
                name: name.clone(),
                expected: rows,
                found: data.rows(),
            });
        }
        layout.push(column_format(data));
    }

    let row_width: usize = layout.iter().map(|(f, _)| f.byte_width()).sum();
    let mut header =
        build_extension_header(ExtensionType::BinaryTable, 8, &[row_width, rows], 0);
    header.push(Card::with_comment(
        "TFIELDS",
        columns.len() as i64,
        "number of table fields",
    ));

    let mut data = vec![0u8; row_width * rows];
    let mut offset = 0;
    for (i, ((name, values), (format, zero))) in columns.iter().zip(&layout).enumerate() {
        let n = i + 1;
        header.push(Card::new(&format!("TTYPE{n}"), name.as_str()));
        header.push(Card::new(&format!("TFORM{n}"), format.tform()));
        if let Some(zero) = zero {
            header.push(Card::new(&format!("TZERO{n}"), zero.clone()));
        }

        let width = format.byte_width();
        let encoded = encode_column(values, *format)?;
        for (row, field) in encoded.chunks_exact(width).enumerate() {
            let start = row * row_width + offset;
            data[start..start + width].copy_from_slice(field);
        }
        offset += width;
    }

    Ok(Hdu::new(header, data))
}

/// One column as described by the TTYPEn/TFORMn/TZEROn cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub format: ColumnFormat,
    pub zero: f64,
    /// Byte offset of the field within a row.
    pub offset: usize,
}

/// Parse the column descriptions of a binary table header.
pub fn parse_columns(header: &Header) -> Result<Vec<ColumnInfo>> {
    let tfields = header.require_usize("TFIELDS")?;
    let mut columns = Vec::with_capacity(tfields);
    let mut offset = 0;
    for n in 1..=tfields {
        let tform = header
            .get_str(&format!("TFORM{n}"))
            .ok_or(Error::MissingKeyword("TFORMn"))?;
        let format = ColumnFormat::parse_tform(tform)?;
        let name = header
            .get_str(&format!("TTYPE{n}"))
            .map_or_else(|| format!("col{n}"), |s| s.trim().to_owned());
        let zero = header.get_float(&format!("TZERO{n}")).unwrap_or(0.0);
        columns.push(ColumnInfo {
            name,
            format,
            zero,
            offset,
        });
        offset += format.byte_width();
    }
    Ok(columns)
}

/// Column names of a binary table HDU, in column order.
pub fn column_names(hdu: &Hdu) -> Result<Vec<String>> {
    Ok(parse_columns(&hdu.header)?
        .into_iter()
        .map(|c| c.name)
        .collect())
}

/// Read the column named `name` from a binary table HDU.
pub fn read_column(hdu: &Hdu, name: &str) -> Result<ArrayData> {
    if hdu.extension_type()? != ExtensionType::BinaryTable {
        return Err(Error::InvalidHeader("not a binary table HDU"));
    }
    let row_width = hdu.header.require_usize("NAXIS1")?;
    let rows = hdu.header.require_usize("NAXIS2")?;
    if hdu.data.len() < row_width * rows {
        return Err(Error::UnexpectedEof);
    }

    let column = parse_columns(&hdu.header)?
        .into_iter()
        .find(|c| c.name == name)
        .ok_or_else(|| Error::ColumnNotFound(name.to_owned()))?;
    let width = column.format.byte_width();
    if column.offset + width > row_width {
        return Err(Error::InvalidHeader("column extends past NAXIS1"));
    }

    let mut raw = Vec::with_capacity(rows * width);
    for row in 0..rows {
        let start = row * row_width + column.offset;
        raw.extend_from_slice(&hdu.data[start..start + width]);
    }
    decode_column(&raw, column.format, column.zero, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ElementType;
    use ndarray::{arr1, arr2};

    fn col(name: &str, data: impl Into<ArrayData>) -> (String, ArrayData) {
        (name.to_owned(), data.into())
    }

    #[test]
    fn tform_codes() {
        assert_eq!(ColumnFormat::Logical.tform(), "L");
        assert_eq!(ColumnFormat::Long.tform(), "K");
        assert_eq!(ColumnFormat::Ascii(12).tform(), "12A");
    }

    #[test]
    fn parse_tform_variants() {
        assert_eq!(ColumnFormat::parse_tform("J").unwrap(), ColumnFormat::Int);
        assert_eq!(ColumnFormat::parse_tform("1D").unwrap(), ColumnFormat::Double);
        assert_eq!(
            ColumnFormat::parse_tform(" 20A ").unwrap(),
            ColumnFormat::Ascii(20)
        );
        assert!(matches!(
            ColumnFormat::parse_tform("3E"),
            Err(Error::UnsupportedTform(_))
        ));
        assert!(matches!(
            ColumnFormat::parse_tform("1PB(200)"),
            Err(Error::UnsupportedTform(_))
        ));
        assert!(ColumnFormat::parse_tform("").is_err());
    }

    #[test]
    fn string_width_is_longest_value() {
        let data: ArrayData = arr1(&[String::from("abc"), String::from("defgh")])
            .into_dyn()
            .into();
        assert_eq!(column_format(&data).0, ColumnFormat::Ascii(5));
        let empty: ArrayData = arr1(&[String::new()]).into_dyn().into();
        assert_eq!(column_format(&empty).0, ColumnFormat::Ascii(1));
    }

    #[test]
    fn unsigned_columns_get_tzero() {
        let data: ArrayData = arr1(&[1u16]).into_dyn().into();
        assert_eq!(
            column_format(&data),
            (ColumnFormat::Short, Some(Value::Integer(32768)))
        );
    }

    #[test]
    fn header_describes_columns() {
        let hdu = bintable_hdu(&[
            col("x", arr1(&[1i32, 2, 3]).into_dyn()),
            col("y", arr1(&[4.0f64, 5.0, 6.0]).into_dyn()),
        ])
        .unwrap();
        let h = &hdu.header;
        assert_eq!(h.get_str("XTENSION"), Some("BINTABLE"));
        assert_eq!(h.get_int("NAXIS1"), Some(12));
        assert_eq!(h.get_int("NAXIS2"), Some(3));
        assert_eq!(h.get_int("TFIELDS"), Some(2));
        assert_eq!(h.get_str("TTYPE2"), Some("y"));
        assert_eq!(h.get_str("TFORM2"), Some("D"));
        assert_eq!(hdu.data.len(), 36);
        assert_eq!(column_names(&hdu).unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn rows_are_interleaved() {
        let hdu = bintable_hdu(&[
            col("a", arr1(&[1u8, 2]).into_dyn()),
            col("b", arr1(&[true, false]).into_dyn()),
        ])
        .unwrap();
        assert_eq!(hdu.data, vec![1, b'T', 2, b'F']);
    }

    #[test]
    fn columns_read_back() {
        let names = arr1(&[String::from("alpha"), String::from("b")]).into_dyn();
        let hdu = bintable_hdu(&[
            col("id", arr1(&[u32::MAX, 0]).into_dyn()),
            col("tiny", arr1(&[-128i8, 127]).into_dyn()),
            col("name", names.clone()),
            col("ok", arr1(&[false, true]).into_dyn()),
            col("big", arr1(&[u64::MAX, 1]).into_dyn()),
        ])
        .unwrap();
        let reparsed = crate::hdu::parse_hdu(&hdu.to_bytes()).unwrap().0;

        assert_eq!(
            read_column(&reparsed, "id").unwrap(),
            ArrayData::from(arr1(&[u32::MAX, 0]).into_dyn())
        );
        assert_eq!(
            read_column(&reparsed, "tiny").unwrap(),
            ArrayData::from(arr1(&[-128i8, 127]).into_dyn())
        );
        assert_eq!(read_column(&reparsed, "name").unwrap(), ArrayData::from(names));
        assert_eq!(
            read_column(&reparsed, "ok").unwrap(),
            ArrayData::from(arr1(&[false, true]).into_dyn())
        );
        assert_eq!(
            read_column(&reparsed, "big").unwrap().element_type(),
            ElementType::U64
        );
    }

    #[test]
    fn missing_column() {
        let hdu = bintable_hdu(&[col("x", arr1(&[1i64]).into_dyn())]).unwrap();
        assert!(matches!(
            read_column(&hdu, "nope"),
            Err(Error::ColumnNotFound(n)) if n == "nope"
        ));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let err = bintable_hdu(&[
            col("x", arr1(&[1i16, 2, 3]).into_dyn()),
            col("y", arr1(&[1i16, 2]).into_dyn()),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnLength { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn multi_dimensional_column_rejected() {
        let err = bintable_hdu(&[col("m", arr2(&[[1.0f32]]).into_dyn())]).unwrap_err();
        assert!(matches!(err, Error::NotOneDimensional { ndim: 2, .. }));
    }

    #[test]
    fn long_column_name_reads_back() {
        let name = "/run/events/reconstruction/splinempe_paraboloid/fit_status_with_suffix";
        let hdu = bintable_hdu(&[col(name, arr1(&[4i32, 5]).into_dyn())]).unwrap();
        let (parsed, _) = crate::hdu::parse_hdu(&hdu.to_bytes()).unwrap();
        assert_eq!(column_names(&parsed).unwrap(), vec![name]);
        assert_eq!(
            read_column(&parsed, name).unwrap(),
            ArrayData::from(arr1(&[4i32, 5]).into_dyn())
        );
    }

    #[test]
    fn non_ascii_column_name_rejected() {
        let err = bintable_hdu(&[col("énergie", arr1(&[1.0f64]).into_dyn())]).unwrap_err();
        assert!(matches!(err, Error::NonAsciiText(_)));
    }

    #[test]
    fn empty_table() {
        let hdu = bintable_hdu(&[]).unwrap();
        assert_eq!(hdu.header.get_int("TFIELDS"), Some(0));
        assert_eq!(hdu.header.get_int("NAXIS2"), Some(0));
        assert!(hdu.data.is_empty());
        assert!(column_names(&hdu).unwrap().is_empty());
    }
}
