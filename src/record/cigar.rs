use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

/// CIGAR operation kinds, in their on-disk code order (`MIDNSHP=X`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    Match = 0,
    Insertion = 1,
    Deletion = 2,
    Skip = 3,
    SoftClip = 4,
    HardClip = 5,
    Pad = 6,
    SequenceMatch = 7,
    SequenceMismatch = 8,
}
impl Kind {
    const SYMBOLS: &'static [u8; 9] = b"MIDNSHP=X";

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Match,
            1 => Self::Insertion,
            2 => Self::Deletion,
            3 => Self::Skip,
            4 => Self::SoftClip,
            5 => Self::HardClip,
            6 => Self::Pad,
            7 => Self::SequenceMatch,
            8 => Self::SequenceMismatch,
            _ => return None,
        })
    }

    #[must_use]
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        Self::SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .and_then(|code| Self::from_code(code as u8))
    }

    #[must_use]
    pub fn symbol(self) -> char {
        Self::SYMBOLS[self as usize] as char
    }

    /// Returns true if the operation consumes bases of the read
    #[must_use]
    pub fn consumes_query(self) -> bool {
        matches!(
            self,
            Self::Match
                | Self::Insertion
                | Self::SoftClip
                | Self::SequenceMatch
                | Self::SequenceMismatch
        )
    }
}

/// A single packed CIGAR operation (`len << 4 | code`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp(u32);
impl CigarOp {
    #[must_use]
    pub fn new(kind: Kind, len: u32) -> Self {
        Self((len << 4) | kind as u32)
    }

    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Operation kind, `None` for codes outside of `MIDNSHP=X`
    #[must_use]
    pub fn kind(self) -> Option<Kind> {
        Kind::from_code((self.0 & 0xF) as u8)
    }

    #[must_use]
    pub fn len(self) -> u32 {
        self.0 >> 4
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}
impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}{}", self.len(), kind.symbol()),
            None => write!(f, "{}?", self.len()),
        }
    }
}

/// Borrowed view over a record's little-endian CIGAR bytes
#[derive(Debug, Clone, Copy)]
pub struct Cigar<'a> {
    bytes: &'a [u8],
}
impl<'a> Cigar<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() / 4
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = CigarOp> + 'a {
        self.bytes
            .chunks_exact(4)
            .map(|chunk| CigarOp::from_raw(LittleEndian::read_u32(chunk)))
    }

    /// Number of read bases implied by the operations (the sum of `M`/`I`/`S`/`=`/`X`)
    #[must_use]
    pub fn query_length(&self) -> usize {
        self.iter()
            .filter(|op| op.kind().is_some_and(Kind::consumes_query))
            .map(|op| op.len() as usize)
            .sum()
    }
}
impl fmt::Display for Cigar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("*");
        }
        self.iter().try_for_each(|op| write!(f, "{op}"))
    }
}

/// Parses a text CIGAR (e.g. `"5S20M1I9M"`); `"*"` parses to no operations
#[must_use]
pub fn parse_cigar(text: &str) -> Option<Vec<CigarOp>> {
    if text == "*" {
        return Some(Vec::new());
    }
    let mut ops = Vec::new();
    let mut len: Option<u32> = None;
    for byte in text.bytes() {
        if byte.is_ascii_digit() {
            let digit = u32::from(byte - b'0');
            len = Some(len.unwrap_or(0).checked_mul(10)?.checked_add(digit)?);
        } else {
            ops.push(CigarOp::new(Kind::from_symbol(byte)?, len.take()?));
        }
    }
    if len.is_some() {
        return None;
    }
    Some(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bytes(ops: &[CigarOp]) -> Vec<u8> {
        ops.iter().flat_map(|op| op.raw().to_le_bytes()).collect()
    }

    #[test]
    fn test_parse_and_display() {
        let ops = parse_cigar("5S20M1I9M3D2H").unwrap();
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[0], CigarOp::new(Kind::SoftClip, 5));
        assert_eq!(ops[5].kind(), Some(Kind::HardClip));

        let bytes = to_bytes(&ops);
        assert_eq!(Cigar::new(&bytes).to_string(), "5S20M1I9M3D2H");
        assert_eq!(Cigar::new(&[]).to_string(), "*");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_cigar("M").is_none());
        assert!(parse_cigar("10").is_none());
        assert!(parse_cigar("10Q").is_none());
        assert_eq!(parse_cigar("*"), Some(Vec::new()));
    }

    #[test]
    fn test_query_length() {
        let bytes = to_bytes(&parse_cigar("5S20M1I9M3D2H4N2=1X").unwrap());
        // S + M + I + M + = + X
        assert_eq!(Cigar::new(&bytes).query_length(), 5 + 20 + 1 + 9 + 2 + 1);
    }
}
