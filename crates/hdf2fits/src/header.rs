//! FITS header cards and ordered card lists.

use std::str;

use crate::block::{pad_to_block, BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE, HEADER_PAD_BYTE};
use crate::error::{Error, Result};
use crate::value::{
    format_value, is_printable_ascii, parse_value, quoted_len, Value, MAX_STRING_LEN,
};

/// Pad a keyword name to 8 bytes with trailing ASCII spaces.
///
/// Names longer than 8 bytes are truncated.
pub fn make_keyword(name: &str) -> [u8; 8] {
    let mut buf = [b' '; 8];
    let bytes = name.as_bytes();
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

const END_KEYWORD: &[u8; 8] = b"END     ";
const CONTINUE_KEYWORD: &[u8; 8] = b"CONTINUE";

/// Quoted width of each piece of a long string, leaving room for the `&`.
const CONTINUED_CHUNK_LEN: usize = MAX_STRING_LEN - 1;

/// One 80-byte keyword record.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// The 8-byte keyword name, ASCII, left-justified, space-padded.
    pub keyword: [u8; 8],
    /// The value, if this card has a value indicator (`= ` in bytes 8..10).
    pub value: Option<Value>,
    /// An optional comment string.
    pub comment: Option<String>,
}

impl Card {
    /// A valued card without comment.
    pub fn new(keyword: &str, value: impl Into<Value>) -> Self {
        Card {
            keyword: make_keyword(keyword),
            value: Some(value.into()),
            comment: None,
        }
    }

    /// A valued card with a comment.
    pub fn with_comment(keyword: &str, value: impl Into<Value>, comment: &str) -> Self {
        Card {
            comment: Some(comment.to_owned()),
            ..Card::new(keyword, value)
        }
    }

    /// Return the keyword as a trimmed string.
    pub fn keyword_str(&self) -> &str {
        let end = self
            .keyword
            .iter()
            .rposition(|&b| b != b' ')
            .map_or(0, |i| i + 1);
        str::from_utf8(&self.keyword[..end]).unwrap_or("")
    }

    /// Returns `true` if this card is the END keyword.
    pub fn is_end(&self) -> bool {
        &self.keyword == END_KEYWORD
    }

    fn is_commentary(&self) -> bool {
        matches!(self.keyword_str(), "COMMENT" | "HISTORY" | "")
    }
}

/// Reject text that cannot be stored in a header string value.
pub fn check_header_text(text: &str) -> Result<()> {
    if is_printable_ascii(text) {
        Ok(())
    } else {
        Err(Error::NonAsciiText(text.to_owned()))
    }
}

/// Parse a single 80-byte card.
pub fn parse_card(card_bytes: &[u8; CARD_SIZE]) -> Result<Card> {
    let mut keyword = [b' '; 8];
    keyword.copy_from_slice(&card_bytes[..8]);

    if !keyword
        .iter()
        .all(|&b| matches!(b, b'A'..=b'Z' | b'0'..=b'9' | b' ' | b'-' | b'_'))
    {
        return Err(Error::InvalidKeyword);
    }

    let mut card = Card {
        keyword,
        value: None,
        comment: None,
    };
    if card.is_end() {
        return Ok(card);
    }

    if !card.is_commentary() && &card_bytes[8..10] == b"= " {
        if let Some((value, comment)) = parse_value(&card_bytes[10..]) {
            card.value = Some(value);
            card.comment = comment.map(str::to_owned);
        }
        return Ok(card);
    }

    let text = str::from_utf8(&card_bytes[8..])
        .map_err(|_| Error::InvalidHeader("non-ASCII commentary card"))?
        .trim_end();
    if !text.is_empty() {
        card.comment = Some(text.to_owned());
    }
    Ok(card)
}

/// Serialize a card into an 80-byte card image.
pub fn format_card(card: &Card) -> [u8; CARD_SIZE] {
    let mut buf = [b' '; CARD_SIZE];
    buf[..8].copy_from_slice(&card.keyword);

    match (&card.value, &card.comment) {
        (Some(value), comment) => {
            buf[8] = b'=';
            let field = format_value(value);
            buf[10..].copy_from_slice(&field);
            if let Some(comment) = comment {
                insert_comment(&mut buf, comment);
            }
        }
        (None, Some(comment)) => {
            let bytes = comment.as_bytes();
            let len = bytes.len().min(CARD_SIZE - 8);
            buf[8..8 + len].copy_from_slice(&bytes[..len]);
        }
        (None, None) => {}
    }
    buf
}

/// Serialize a card into one or more card images.
///
/// String values too long for one card are split over `CONTINUE` records
/// (the long-string convention): every piece but the last ends in `&`, and
/// the comment goes on the last record.
pub fn format_records(card: &Card) -> Vec<[u8; CARD_SIZE]> {
    let text = match &card.value {
        Some(Value::String(s)) if quoted_len(s) > MAX_STRING_LEN => s,
        _ => return vec![format_card(card)],
    };

    let pieces = split_long_string(text);
    let last = pieces.len() - 1;
    let mut records = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.into_iter().enumerate() {
        let piece = if i == last { piece } else { piece + "&" };
        let mut buf = if i == 0 {
            format_card(&Card {
                keyword: card.keyword,
                value: Some(Value::String(piece)),
                comment: None,
            })
        } else {
            let mut buf = [b' '; CARD_SIZE];
            buf[..8].copy_from_slice(CONTINUE_KEYWORD);
            buf[10..].copy_from_slice(&format_value(&Value::String(piece)));
            buf
        };
        if i == last {
            if let Some(comment) = &card.comment {
                insert_comment(&mut buf, comment);
            }
        }
        records.push(buf);
    }
    records
}

/// Cut `text` into pieces whose quoted width is at most [`CONTINUED_CHUNK_LEN`].
fn split_long_string(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = if ch == '\'' { 2 } else { 1 };
        if width + w > CONTINUED_CHUNK_LEN {
            pieces.push(std::mem::take(&mut current));
            width = 0;
        }
        current.push(ch);
        width += w;
    }
    pieces.push(current);
    pieces
}

/// Join a `CONTINUE` record onto `prev` if its string value ends in `&`.
///
/// Returns `false`, leaving `prev` untouched, when the record does not
/// continue it.
fn append_continuation(prev: &mut Card, record: &[u8; CARD_SIZE]) -> bool {
    let Some(Value::String(text)) = prev.value.as_mut() else {
        return false;
    };
    if !text.ends_with('&') {
        return false;
    }
    let Some((Value::String(piece), comment)) = parse_value(&record[10..]) else {
        return false;
    };
    text.pop();
    text.push_str(&piece);
    prev.comment = comment.map(str::to_owned);
    true
}

/// Place ` / comment` after the value, at column 32 or just past a long string.
fn insert_comment(buf: &mut [u8; CARD_SIZE], comment: &str) {
    let content_end = buf
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(10, |i| i + 1)
        .max(30);
    let sep = content_end + 1;
    if sep + 3 >= CARD_SIZE {
        return;
    }
    buf[sep] = b'/';
    let start = sep + 2;
    let bytes = comment.as_bytes();
    let len = bytes.len().min(CARD_SIZE - start);
    buf[start..start + len].copy_from_slice(&bytes[..len]);
}

/// The header of one HDU: an ordered list of cards, END excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Header { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Append a card, keeping any existing card with the same keyword.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Replace the value of `keyword`, or append a new card if it is absent.
    pub fn set(&mut self, keyword: &str, value: impl Into<Value>) {
        let key = make_keyword(keyword);
        let value = value.into();
        match self.cards.iter_mut().find(|c| c.keyword == key) {
            Some(card) => card.value = Some(value),
            None => self.cards.push(Card {
                keyword: key,
                value: Some(value),
                comment: None,
            }),
        }
    }

    /// Value of the first card named `keyword`.
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        let key = make_keyword(keyword);
        self.cards
            .iter()
            .find(|c| c.keyword == key)
            .and_then(|c| c.value.as_ref())
    }

    pub fn get_int(&self, keyword: &str) -> Option<i64> {
        match self.get(keyword)? {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value, promoting integers.
    pub fn get_float(&self, keyword: &str) -> Option<f64> {
        match self.get(keyword)? {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        match self.get(keyword)? {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer keyword that must be present and non-negative.
    pub fn require_usize(&self, keyword: &'static str) -> Result<usize> {
        let n = self
            .get_int(keyword)
            .ok_or(Error::MissingKeyword(keyword))?;
        usize::try_from(n).map_err(|_| Error::InvalidHeader("negative size keyword"))
    }

    /// NAXIS1..NAXISn in header order (fastest-varying axis first).
    pub fn naxes(&self) -> Result<Vec<usize>> {
        let naxis = self.require_usize("NAXIS")?;
        (1..=naxis)
            .map(|i| {
                let n = self
                    .get_int(&format!("NAXIS{i}"))
                    .ok_or(Error::MissingKeyword("NAXISn"))?;
                usize::try_from(n).map_err(|_| Error::InvalidHeader("negative NAXISn"))
            })
            .collect()
    }

    /// Serialize into whole header blocks, END card included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity((self.cards.len() + 1) * CARD_SIZE);
        for card in &self.cards {
            for record in format_records(card) {
                buf.extend_from_slice(&record);
            }
        }
        let mut end = [b' '; CARD_SIZE];
        end[..8].copy_from_slice(END_KEYWORD);
        buf.extend_from_slice(&end);
        pad_to_block(&mut buf, HEADER_PAD_BYTE);
        buf
    }
}

/// Parse header blocks from the start of `data` until the END card.
///
/// Returns the header and the number of bytes it occupies (a multiple of
/// [`BLOCK_SIZE`]).
pub fn parse_header_blocks(data: &[u8]) -> Result<(Header, usize)> {
    let mut cards = Vec::new();
    for (block_idx, block) in data.chunks_exact(BLOCK_SIZE).enumerate() {
        for card_idx in 0..CARDS_PER_BLOCK {
            let start = card_idx * CARD_SIZE;
            let card_bytes: &[u8; CARD_SIZE] = block[start..start + CARD_SIZE]
                .try_into()
                .map_err(|_| Error::InvalidHeader("short card"))?;
            let card = parse_card(card_bytes)?;
            if card.is_end() {
                return Ok((Header::from_cards(cards), (block_idx + 1) * BLOCK_SIZE));
            }
            if &card.keyword == CONTINUE_KEYWORD {
                if let Some(prev) = cards.last_mut() {
                    if append_continuation(prev, card_bytes) {
                        continue;
                    }
                }
            }
            cards.push(card);
        }
    }
    Err(Error::UnexpectedEof)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_card(s: &str) -> [u8; CARD_SIZE] {
        let mut buf = [b' '; CARD_SIZE];
        buf[..s.len()].copy_from_slice(s.as_bytes());
        buf
    }

    #[test]
    fn parse_card_string_value() {
        let c = parse_card(&make_card("EXTNAME = 'img     '           / name")).unwrap();
        assert_eq!(c.keyword_str(), "EXTNAME");
        assert_eq!(c.value, Some(Value::String(String::from("img"))));
        assert_eq!(c.comment.as_deref(), Some("name"));
    }

    #[test]
    fn parse_card_comment_keyword() {
        let c = parse_card(&make_card("COMMENT written by hdf2fits")).unwrap();
        assert!(c.value.is_none());
        assert_eq!(c.comment.as_deref(), Some("written by hdf2fits"));
    }

    #[test]
    fn parse_card_lowercase_keyword_rejected() {
        let err = parse_card(&make_card("bitpix  =                   16")).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyword));
    }

    #[test]
    fn format_card_with_comment() {
        let card = Card::with_comment("NAXIS", 2i64, "number of axes");
        let buf = format_card(&card);
        let s = str::from_utf8(&buf).unwrap();
        assert!(s.starts_with("NAXIS   =                    2 / number of axes"));
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut h = Header::new();
        h.push(Card::new("EXTNAME", "old"));
        h.push(Card::new("BITPIX", 8i64));
        h.set("EXTNAME", "new");
        assert_eq!(h.len(), 2);
        assert_eq!(h.get_str("EXTNAME"), Some("new"));
    }

    #[test]
    fn set_appends_missing_keyword() {
        let mut h = Header::new();
        h.push(Card::new("BITPIX", 8i64));
        h.set("EXTNAME", "img");
        assert_eq!(h.cards()[1].keyword_str(), "EXTNAME");
    }

    #[test]
    fn get_float_promotes_integers() {
        let mut h = Header::new();
        h.push(Card::new("BZERO", 32768i64));
        assert_eq!(h.get_float("BZERO"), Some(32768.0));
    }

    #[test]
    fn naxes_reads_in_order() {
        let mut h = Header::new();
        h.push(Card::new("NAXIS", 2i64));
        h.push(Card::new("NAXIS1", 4i64));
        h.push(Card::new("NAXIS2", 3i64));
        assert_eq!(h.naxes().unwrap(), vec![4, 3]);
    }

    #[test]
    fn naxes_missing_axis() {
        let mut h = Header::new();
        h.push(Card::new("NAXIS", 2i64));
        h.push(Card::new("NAXIS1", 4i64));
        assert!(matches!(h.naxes(), Err(Error::MissingKeyword("NAXISn"))));
    }

    #[test]
    fn to_bytes_then_parse() {
        let mut h = Header::new();
        h.push(Card::new("SIMPLE", true));
        h.push(Card::new("BITPIX", 8i64));
        h.push(Card::new("NAXIS", 0i64));
        let bytes = h.to_bytes();
        assert_eq!(bytes.len(), BLOCK_SIZE);
        let (parsed, len) = parse_header_blocks(&bytes).unwrap();
        assert_eq!(len, BLOCK_SIZE);
        assert_eq!(parsed, h);
    }

    #[test]
    fn header_spanning_two_blocks() {
        let mut h = Header::new();
        for i in 0..CARDS_PER_BLOCK {
            h.push(Card::new(&format!("KEY{i}"), i as i64));
        }
        let bytes = h.to_bytes();
        assert_eq!(bytes.len(), 2 * BLOCK_SIZE);
        let (parsed, len) = parse_header_blocks(&bytes).unwrap();
        assert_eq!(len, 2 * BLOCK_SIZE);
        assert_eq!(parsed.len(), CARDS_PER_BLOCK);
    }

    #[test]
    fn long_string_spans_continue_records() {
        let name = "/events/reconstruction/splinempe_paraboloid_fit_status_with_long_suffix_xyz";
        let mut h = Header::new();
        h.push(Card::new("XTENSION", "IMAGE"));
        h.push(Card::with_comment("EXTNAME", name, "dataset"));
        h.push(Card::new("BITPIX", 8i64));
        let bytes = h.to_bytes();
        assert_eq!(&bytes[2 * CARD_SIZE..2 * CARD_SIZE + 8], b"CONTINUE");

        let (parsed, _) = parse_header_blocks(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert_eq!(parsed.get_str("EXTNAME"), Some(name));
        assert_eq!(parsed.cards()[2].keyword_str(), "BITPIX");
    }

    #[test]
    fn long_string_with_quotes_survives() {
        let text = "it's ".repeat(30);
        let card = Card::new("TTYPE1", text.as_str());
        let records = format_records(&card);
        assert!(records.len() > 2);
        let mut h = Header::new();
        h.push(card);
        let (parsed, _) = parse_header_blocks(&h.to_bytes()).unwrap();
        assert_eq!(parsed.get_str("TTYPE1"), Some(text.trim_end()));
    }

    #[test]
    fn short_string_is_one_record() {
        let card = Card::new("EXTNAME", "x".repeat(MAX_STRING_LEN).as_str());
        assert_eq!(format_records(&card).len(), 1);
    }

    #[test]
    fn continue_after_plain_value_is_kept() {
        let mut block = Vec::new();
        block.extend_from_slice(&make_card("EXTNAME = 'done&'"));
        block.extend_from_slice(&make_card("BITPIX  =                    8"));
        block.extend_from_slice(&make_card("CONTINUE  'stray'"));
        block.extend_from_slice(&make_card("END"));
        block.resize(BLOCK_SIZE, b' ');
        let (parsed, _) = parse_header_blocks(&block).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.get_str("EXTNAME"), Some("done&"));
    }

    #[test]
    fn parse_without_end_card() {
        let block = vec![b' '; BLOCK_SIZE];
        assert!(matches!(
            parse_header_blocks(&block),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn parse_too_short() {
        assert!(matches!(
            parse_header_blocks(&[b' '; 100]),
            Err(Error::UnexpectedEof)
        ));
    }
}
