//! Extension header construction and XTENSION classification.

use std::fmt;

use crate::error::{Error, Result};
use crate::header::{Card, Header};

/// The type of a FITS extension, determined by the XTENSION keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionType {
    /// XTENSION = 'IMAGE'.
    Image,
    /// XTENSION = 'BINTABLE'.
    BinaryTable,
}

impl ExtensionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionType::Image => "IMAGE",
            ExtensionType::BinaryTable => "BINTABLE",
        }
    }

    /// Classify an extension header by its XTENSION card.
    pub fn from_header(header: &Header) -> Result<Self> {
        let xtension = header
            .get_str("XTENSION")
            .ok_or(Error::MissingKeyword("XTENSION"))?;
        match xtension.trim() {
            "IMAGE" => Ok(ExtensionType::Image),
            "BINTABLE" => Ok(ExtensionType::BinaryTable),
            other => Err(Error::UnsupportedExtension(other.to_owned())),
        }
    }
}

impl fmt::Display for ExtensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the mandatory extension keywords in standard order:
/// XTENSION, BITPIX, NAXIS, NAXIS1..NAXISn, PCOUNT, GCOUNT.
pub fn build_extension_header(
    ext_type: ExtensionType,
    bitpix: i64,
    naxes: &[usize],
    pcount: usize,
) -> Header {
    let mut header = Header::new();
    header.push(Card::with_comment(
        "XTENSION",
        ext_type.as_str(),
        match ext_type {
            ExtensionType::Image => "Image extension",
            ExtensionType::BinaryTable => "binary table extension",
        },
    ));
    header.push(Card::with_comment("BITPIX", bitpix, "array data type"));
    header.push(Card::with_comment(
        "NAXIS",
        naxes.len() as i64,
        "number of array dimensions",
    ));
    for (i, &dim) in naxes.iter().enumerate() {
        header.push(Card::new(&format!("NAXIS{}", i + 1), dim as i64));
    }
    header.push(Card::with_comment("PCOUNT", pcount as i64, "number of parameters"));
    header.push(Card::with_comment("GCOUNT", 1i64, "number of groups"));
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_header_card_order() {
        let h = build_extension_header(ExtensionType::Image, -32, &[512, 256], 0);
        let names: Vec<&str> = h.cards().iter().map(|c| c.keyword_str()).collect();
        assert_eq!(
            names,
            ["XTENSION", "BITPIX", "NAXIS", "NAXIS1", "NAXIS2", "PCOUNT", "GCOUNT"]
        );
        assert_eq!(h.naxes().unwrap(), vec![512, 256]);
    }

    #[test]
    fn classify_image_and_table() {
        let image = build_extension_header(ExtensionType::Image, 8, &[3], 0);
        assert_eq!(ExtensionType::from_header(&image).unwrap(), ExtensionType::Image);
        let table = build_extension_header(ExtensionType::BinaryTable, 8, &[8, 2], 0);
        assert_eq!(
            ExtensionType::from_header(&table).unwrap(),
            ExtensionType::BinaryTable
        );
    }

    #[test]
    fn classify_unknown_extension() {
        let mut h = Header::new();
        h.push(Card::new("XTENSION", "A3DTABLE"));
        assert!(matches!(
            ExtensionType::from_header(&h),
            Err(Error::UnsupportedExtension(s)) if s == "A3DTABLE"
        ));
    }

    #[test]
    fn classify_missing_xtension() {
        assert!(matches!(
            ExtensionType::from_header(&Header::new()),
            Err(Error::MissingKeyword("XTENSION"))
        ));
    }

    #[test]
    fn display_matches_keyword_value() {
        assert_eq!(ExtensionType::Image.to_string(), "IMAGE");
    }
}
