//! Header card values: parsing from and formatting into the 70-byte value field.

use std::str;

/// A FITS header value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// FITS logical value (`T` or `F`).
    Logical(bool),
    /// FITS integer value.
    Integer(i64),
    /// FITS floating-point value.
    Float(f64),
    /// FITS character string (content between single quotes, trailing blanks trimmed).
    String(String),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Logical(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Find a ` /` comment separator and return the trimmed comment text after it.
///
/// Both ` / ` and ` /` (no trailing space, as IDL writes it) are accepted.
fn comment_after(bytes: &[u8]) -> (usize, Option<&str>) {
    let len = bytes.len();
    let mut i = 0;
    while i + 1 < len {
        if bytes[i] == b' ' && bytes[i + 1] == b'/' {
            let mut start = i + 2;
            if start < len && bytes[start] == b' ' {
                start += 1;
            }
            let comment = str::from_utf8(&bytes[start..])
                .ok()
                .map(str::trim_end)
                .filter(|s| !s.is_empty());
            return (i, comment);
        }
        i += 1;
    }
    (len, None)
}

/// Parse a quoted string value. Doubled quotes inside the string are a literal `'`.
fn parse_string(field: &[u8]) -> Option<(Value, Option<&str>)> {
    if field.first() != Some(&b'\'') {
        return None;
    }

    let mut value = String::new();
    let mut i = 1;
    while i < field.len() {
        if field[i] == b'\'' {
            if field.get(i + 1) == Some(&b'\'') {
                value.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            break;
        }
        value.push(field[i] as char);
        i += 1;
    }

    let (_, comment) = comment_after(&field[i.min(field.len())..]);
    Some((Value::String(value.trim_end().to_owned()), comment))
}

fn parse_float_str(s: &str) -> Option<f64> {
    s.replace(&['D', 'd'][..], "E").parse::<f64>().ok()
}

/// Parse the value field (bytes 10..80 of a card).
///
/// Returns the value and an optional comment, or `None` when the field holds
/// no value (an undefined keyword).
pub fn parse_value(value_bytes: &[u8]) -> Option<(Value, Option<&str>)> {
    let start = value_bytes.iter().position(|&b| b != b' ')?;
    let field = &value_bytes[start..];

    if field[0] == b'\'' {
        return parse_string(field);
    }

    let (end, comment) = comment_after(value_bytes);
    let text = str::from_utf8(&value_bytes[..end]).ok()?.trim();
    if text.is_empty() {
        return None;
    }

    match text {
        "T" => return Some((Value::Logical(true), comment)),
        "F" => return Some((Value::Logical(false), comment)),
        _ => {}
    }

    if !text.contains(&['.', 'E', 'e', 'D', 'd'][..]) {
        if let Ok(n) = text.parse::<i64>() {
            return Some((Value::Integer(n), comment));
        }
    }

    parse_float_str(text).map(|f| (Value::Float(f), comment))
}

/// Serialize a [`Value`] into the 70-byte value field.
///
/// Numbers and logicals are right-justified in the first 20 bytes (card
/// columns 11-30); strings start with a quote in the first byte and are
/// padded to at least 8 characters.
pub fn format_value(value: &Value) -> [u8; 70] {
    let mut buf = [b' '; 70];
    match value {
        Value::Logical(b) => buf[19] = if *b { b'T' } else { b'F' },
        Value::Integer(n) => right_justify(n.to_string().as_bytes(), &mut buf[..20]),
        Value::Float(f) => right_justify(format_float(*f).as_bytes(), &mut buf[..20]),
        Value::String(s) => write_string(s, &mut buf),
    }
    buf
}

fn right_justify(src: &[u8], dest: &mut [u8]) {
    let len = src.len().min(dest.len());
    let start = dest.len() - len;
    dest[start..].copy_from_slice(&src[..len]);
}

/// Shortest exponent form that fits 20 columns, starting from full precision.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return String::from("0.0");
    }
    let mut precision = 15usize;
    loop {
        let s = format!("{:.prec$E}", f, prec = precision);
        if s.len() <= 20 || precision == 0 {
            return s;
        }
        precision -= 1;
    }
}

/// Longest quoted string content that fits one card's value field.
pub const MAX_STRING_LEN: usize = 68;

/// Length of `s` between the quotes, with each `'` doubled.
pub fn quoted_len(s: &str) -> usize {
    s.len() + s.matches('\'').count()
}

/// Returns `true` if `s` holds only printable ASCII, the only text FITS
/// header values may carry.
pub fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn write_string(s: &str, buf: &mut [u8; 70]) {
    buf[0] = b'\'';
    let mut pos = 1;
    for ch in s.bytes() {
        let width = if ch == b'\'' { 2 } else { 1 };
        if pos + width >= 70 {
            break;
        }
        buf[pos] = ch;
        if ch == b'\'' {
            buf[pos + 1] = b'\'';
        }
        pos += width;
    }
    pos = pos.max(9);
    buf[pos] = b'\'';
}
