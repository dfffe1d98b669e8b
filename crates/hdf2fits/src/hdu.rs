//! Header Data Units: one header plus its data payload.

use log::debug;

use crate::array::{ArrayData, ElementType};
use crate::block::{pad_to_block, padded_byte_len, DATA_PAD_BYTE};
use crate::error::{Error, Result};
use crate::extension::ExtensionType;
use crate::header::{check_header_text, parse_header_blocks, Header};
use crate::image::image_hdu;
use crate::primary::{empty_primary_header, is_primary};
use crate::table::Table;

/// Column name given to a string array stored as a one-column table.
pub const DEFAULT_COLUMN_NAME: &str = "col1";

/// A single Header Data Unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Hdu {
    /// All header cards, END excluded.
    pub header: Header,
    /// The data segment, unpadded.
    pub data: Vec<u8>,
}

impl Hdu {
    pub fn new(header: Header, data: Vec<u8>) -> Self {
        Hdu { header, data }
    }

    /// A primary HDU with no data.
    pub fn empty_primary() -> Self {
        Hdu::new(empty_primary_header(), Vec::new())
    }

    /// Build the extension HDU that stores `data`.
    ///
    /// Numeric and boolean arrays of any rank become an `IMAGE` extension.
    /// A one-dimensional string array becomes a `BINTABLE` with a single
    /// column named [`DEFAULT_COLUMN_NAME`]; string arrays of other ranks are
    /// rejected.
    pub fn from_array(data: &ArrayData) -> Result<Self> {
        let dtype = data.element_type();
        if dtype.is_numeric() {
            return image_hdu(data);
        }
        if dtype == ElementType::Str && data.ndim() == 1 {
            let mut table = Table::new();
            table.insert(DEFAULT_COLUMN_NAME, data.clone())?;
            return table.to_hdu();
        }
        Err(Error::NotAnImage {
            dtype,
            ndim: data.ndim(),
        })
    }

    pub fn is_primary(&self) -> bool {
        is_primary(&self.header)
    }

    /// Raw XTENSION value, `None` for a primary HDU.
    pub fn xtension(&self) -> Option<&str> {
        self.header.get_str("XTENSION").map(str::trim)
    }

    pub fn extension_type(&self) -> Result<ExtensionType> {
        ExtensionType::from_header(&self.header)
    }

    pub fn extname(&self) -> Option<&str> {
        self.header.get_str("EXTNAME")
    }

    /// Set EXTNAME. Names longer than one card are written with `CONTINUE`
    /// records; names outside printable ASCII are rejected.
    pub fn set_extname(&mut self, name: &str) -> Result<()> {
        check_header_text(name)?;
        self.header.set("EXTNAME", name);
        Ok(())
    }

    /// Number of data bytes the header declares:
    /// `|BITPIX| / 8 * GCOUNT * (PCOUNT + NAXIS1 * ... * NAXISn)`.
    pub fn declared_data_len(header: &Header) -> Result<usize> {
        let bitpix = header
            .get_int("BITPIX")
            .ok_or(Error::MissingKeyword("BITPIX"))?;
        let bytes_per_value = match bitpix {
            8 | 16 | 32 | 64 | -32 | -64 => bitpix.unsigned_abs() as usize / 8,
            other => return Err(Error::InvalidBitpix(other)),
        };
        let naxes = header.naxes()?;
        if naxes.is_empty() {
            return Ok(0);
        }
        let pcount = header.get_int("PCOUNT").unwrap_or(0).max(0) as usize;
        let gcount = header.get_int("GCOUNT").unwrap_or(1).max(0) as usize;
        let values: usize = naxes.iter().product();
        Ok(bytes_per_value * gcount * (pcount + values))
    }

    /// Header blocks followed by the zero-padded data blocks.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = self.header.to_bytes();
        buf.extend_from_slice(&self.data);
        // The header is block aligned, so this pads only the data.
        pad_to_block(&mut buf, DATA_PAD_BYTE);
        buf
    }
}

/// Parse one HDU from the start of `bytes`.
///
/// Returns the HDU and the number of bytes it occupies, padding included.
pub fn parse_hdu(bytes: &[u8]) -> Result<(Hdu, usize)> {
    let (header, header_len) = parse_header_blocks(bytes)?;
    let data_len = Hdu::declared_data_len(&header)?;
    let end = header_len + data_len;
    if end > bytes.len() {
        return Err(Error::UnexpectedEof);
    }
    let data = bytes[header_len..end].to_vec();
    let consumed = (header_len + padded_byte_len(data_len)).min(bytes.len());
    debug!("parsed HDU: {} cards, {} data bytes", header.len(), data_len);
    Ok((Hdu::new(header, data), consumed))
}
