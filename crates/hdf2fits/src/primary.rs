//! Primary HDU header construction.

use crate::header::{Card, Header};

/// Build the header of a data-less primary HDU.
///
/// `EXTEND = T` announces that extensions follow, which every file written
/// by this crate relies on.
pub fn empty_primary_header() -> Header {
    Header::from_cards(vec![
        Card::with_comment("SIMPLE", true, "conforms to FITS standard"),
        Card::with_comment("BITPIX", 8i64, "array data type"),
        Card::with_comment("NAXIS", 0i64, "number of array dimensions"),
        Card::new("EXTEND", true),
    ])
}

/// Returns `true` if `header` starts with `SIMPLE`, i.e. describes a primary HDU.
pub fn is_primary(header: &Header) -> bool {
    header
        .cards()
        .first()
        .is_some_and(|c| c.keyword_str() == "SIMPLE")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BLOCK_SIZE;
    use crate::value::Value;

    #[test]
    fn empty_primary_has_no_axes() {
        let h = empty_primary_header();
        assert_eq!(h.get("SIMPLE"), Some(&Value::Logical(true)));
        assert_eq!(h.get_int("BITPIX"), Some(8));
        assert_eq!(h.get_int("NAXIS"), Some(0));
        assert_eq!(h.naxes().unwrap(), Vec::<usize>::new());
        assert_eq!(h.get("EXTEND"), Some(&Value::Logical(true)));
    }

    #[test]
    fn empty_primary_fits_one_block() {
        assert_eq!(empty_primary_header().to_bytes().len(), BLOCK_SIZE);
    }

    #[test]
    fn primary_detection() {
        assert!(is_primary(&empty_primary_header()));
        let mut h = Header::new();
        h.push(Card::new("XTENSION", "IMAGE"));
        assert!(!is_primary(&h));
    }
}
