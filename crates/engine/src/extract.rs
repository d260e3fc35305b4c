//! Line extraction — from raw file bytes to prompt payloads.
//!
//! Corpus files are hand-authored lists of `<label> = <payload>` lines.
//! Only lines containing the delimiter are candidates; the payload is
//! everything after the first delimiter, trimmed.

/// Separates a line's label from its payload.
pub const DELIMITER: char = '=';

/// Which decoding produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Fallback for files that are not valid UTF-8
    Latin1,
}

/// The eligible lines of one file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLines {
    pub lines: Vec<String>,
    pub encoding: TextEncoding,
}

impl ExtractedLines {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Decode file bytes as UTF-8 (dropping a BOM), falling back to Latin-1.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback cannot fail.
pub fn decode(bytes: &[u8]) -> (String, TextEncoding) {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        (
            encoding_rs::mem::decode_latin1(bytes).into_owned(),
            TextEncoding::Latin1,
        )
    } else {
        (text.into_owned(), TextEncoding::Utf8)
    }
}

/// Trimmed lines of `text` that contain the delimiter.
pub fn eligible_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.contains(DELIMITER))
}

/// Decode `bytes` and keep the eligible lines.
pub fn extract_lines(bytes: &[u8]) -> ExtractedLines {
    let (text, encoding) = decode(bytes);
    ExtractedLines {
        lines: eligible_lines(&text).map(str::to_string).collect(),
        encoding,
    }
}

/// The payload of a line: the trimmed text after the first delimiter.
///
/// Returns `None` when the line has no delimiter or the payload is blank.
pub fn payload_of(line: &str) -> Option<&str> {
    let (_, tail) = line.split_once(DELIMITER)?;
    let tail = tail.trim();
    (!tail.is_empty()).then_some(tail)
}
