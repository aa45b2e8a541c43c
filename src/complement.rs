//! Nucleotide complement table for 4-bit packed bases
//!
//! Bases in an alignment record are stored with 4 bits each, two per byte, with the first base
//! of a pair in the high nibble. The codes follow the `=ACMGRSVTWYHKDBN` convention:
//!
//! | Code | Base | Complement |
//! | ---- | ---- | ---------- |
//! | 0    | `=`  | `=` (0)    |
//! | 1    | `A`  | `T` (8)    |
//! | 2    | `C`  | `G` (4)    |
//! | 4    | `G`  | `C` (2)    |
//! | 8    | `T`  | `A` (1)    |
//! | 15   | `N`  | `N` (15)   |
//!
//! Every other (ambiguity) code maps to 0.

/// Complement of each 4-bit nucleotide code, indexed by code
pub const NT16_COMPLEMENT: [u8; 16] = [0, 8, 4, 0, 2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 15];

/// Printable base for each 4-bit nucleotide code
pub const NT16_BASES: &[u8; 16] = b"=ACMGRSVTWYHKDBN";

/// Returns the complement of a 4-bit nucleotide code
///
/// Only the low nibble of `code` is considered.
#[inline]
#[must_use]
pub fn complement(code: u8) -> u8 {
    NT16_COMPLEMENT[(code & 0x0F) as usize]
}

/// Returns true if `code` has a defined complement (`=`, `A`, `C`, `G`, `T`, or `N`)
#[inline]
#[must_use]
pub fn has_complement(code: u8) -> bool {
    let code = code & 0x0F;
    code == 0 || NT16_COMPLEMENT[code as usize] != 0
}

/// Returns the 4-bit code stored at base `index` of a packed sequence
#[inline]
#[must_use]
pub fn packed_base(packed: &[u8], index: usize) -> u8 {
    let byte = packed[index / 2];
    if index % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0F
    }
}

/// Writes the reverse complement of the `len` packed bases of `src` into `dst`
///
/// Both slices must hold at least `len.div_ceil(2)` bytes. For odd lengths the trailing low
/// nibble of `dst` is cleared.
pub fn reverse_complement_packed(dst: &mut [u8], src: &[u8], len: usize) {
    let n_bytes = len.div_ceil(2);
    dst[..n_bytes].fill(0);
    for i in 0..len {
        let code = complement(packed_base(src, len - 1 - i));
        if i % 2 == 0 {
            dst[i / 2] |= code << 4;
        } else {
            dst[i / 2] |= code;
        }
    }
}

/// Writes `src` into `dst` in reverse order
///
/// Used for quality strings, which follow the strand in order but are never complemented.
pub fn reverse_into(dst: &mut [u8], src: &[u8]) {
    dst[..src.len()]
        .iter_mut()
        .zip(src.iter().rev())
        .for_each(|(d, s)| *d = *s);
}

/// Packs ASCII bases into 4-bit codes (unknown characters become `N`)
#[must_use]
pub fn pack_bases(bases: &[u8]) -> Vec<u8> {
    let mut packed = vec![0u8; bases.len().div_ceil(2)];
    for (i, &base) in bases.iter().enumerate() {
        let code = encode_base(base);
        if i % 2 == 0 {
            packed[i / 2] |= code << 4;
        } else {
            packed[i / 2] |= code;
        }
    }
    packed
}

/// Unpacks `len` 4-bit codes into ASCII bases
#[must_use]
pub fn unpack_bases(packed: &[u8], len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| NT16_BASES[packed_base(packed, i) as usize])
        .collect()
}

/// Encodes a single ASCII base into its 4-bit code
#[inline]
#[must_use]
pub fn encode_base(base: u8) -> u8 {
    let upper = base.to_ascii_uppercase();
    NT16_BASES
        .iter()
        .position(|&b| b == upper)
        .map_or(15, |code| code as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement_involution() {
        for code in 0..16u8 {
            if has_complement(code) {
                assert_eq!(complement(complement(code)), code, "code {code}");
            } else {
                assert_eq!(complement(code), 0, "code {code}");
            }
        }
    }

    #[test]
    fn test_canonical_pairs() {
        assert_eq!(complement(encode_base(b'A')), encode_base(b'T'));
        assert_eq!(complement(encode_base(b'C')), encode_base(b'G'));
        assert_eq!(complement(encode_base(b'G')), encode_base(b'C'));
        assert_eq!(complement(encode_base(b'T')), encode_base(b'A'));
        assert_eq!(complement(encode_base(b'N')), encode_base(b'N'));
    }

    #[test]
    fn test_pack_unpack() {
        let bases = b"ACGTN";
        let packed = pack_bases(bases);
        assert_eq!(packed, vec![0x12, 0x48, 0xF0]);
        assert_eq!(unpack_bases(&packed, bases.len()), bases.to_vec());
    }

    #[test]
    fn test_reverse_complement_even() {
        let src = pack_bases(b"AACG");
        let mut dst = vec![0xFF; src.len()];
        reverse_complement_packed(&mut dst, &src, 4);
        assert_eq!(unpack_bases(&dst, 4), b"CGTT".to_vec());
    }

    #[test]
    fn test_reverse_complement_odd_clears_padding() {
        let src = pack_bases(b"ACGTA");
        let mut dst = vec![0xFF; src.len()];
        reverse_complement_packed(&mut dst, &src, 5);
        assert_eq!(unpack_bases(&dst, 5), b"TACGT".to_vec());
        assert_eq!(dst[2] & 0x0F, 0);
    }

    #[test]
    fn test_reverse_into() {
        let mut dst = [0u8; 4];
        reverse_into(&mut dst, &[10, 20, 30, 40]);
        assert_eq!(dst, [40, 30, 20, 10]);
    }
}
