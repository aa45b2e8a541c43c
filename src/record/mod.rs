//! # record
//!
//! In-memory alignment records and the pieces they are made of.
//!
//! An [`AlignmentRecord`] keeps its fixed-size fields in a [`RecordCore`] and every
//! variable-length field in one contiguous byte buffer:
//!
//! ```text
//! | name + NUL + padding NULs | CIGAR (n × u32) | packed bases | qualities | aux tags |
//! ```
//!
//! The name slot is padded with up to three extra NULs so that the CIGAR block starts on a
//! 4-byte boundary. Padding only exists in memory: it is added when a record is decoded from a
//! raw stream and dropped again when the record is encoded.
//!
//! ## Raw record layout
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0-3     4     refID (i32)
//! 4-7     4     pos (i32)
//! 8       1     l_read_name (u8) - length of read name + NUL
//! 9       1     mapq (u8)
//! 10-11   2     bin (u16)
//! 12-13   2     n_cigar_op (u16)
//! 14-15   2     flag (u16)
//! 16-19   4     l_seq (u32)
//! 20-23   4     next_refID (i32)
//! 24-27   4     next_pos (i32)
//! 28-31   4     tlen (i32)
//! 32+     var   read_name, cigar, seq, qual, aux
//! ```

mod alignment;
mod builder;
mod cigar;

pub use alignment::{AlignmentRecord, RecordCore, RAW_HEADER_SIZE};
pub use builder::RecordBuilder;
pub use cigar::{parse_cigar, Cigar, CigarOp, Kind};

/// Alignment flag bits.
pub mod flags {
    /// Read is paired in sequencing.
    pub const PAIRED: u16 = 0x1;
    /// Read is mapped in a proper pair.
    pub const PROPER_PAIR: u16 = 0x2;
    /// Read is unmapped.
    pub const UNMAPPED: u16 = 0x4;
    /// Mate is unmapped.
    pub const MATE_UNMAPPED: u16 = 0x8;
    /// Read is reverse complemented.
    pub const REVERSE: u16 = 0x10;
    /// Mate is reverse complemented.
    pub const MATE_REVERSE: u16 = 0x20;
    /// First segment in template (R1).
    pub const FIRST_SEGMENT: u16 = 0x40;
    /// Last segment in template (R2).
    pub const LAST_SEGMENT: u16 = 0x80;
    /// Secondary alignment.
    pub const SECONDARY: u16 = 0x100;
    /// Not passing quality controls.
    pub const QC_FAIL: u16 = 0x200;
    /// PCR or optical duplicate.
    pub const DUPLICATE: u16 = 0x400;
    /// Supplementary alignment.
    pub const SUPPLEMENTARY: u16 = 0x800;

    /// Both mate-identity bits.
    pub const MATE_MASK: u16 = FIRST_SEGMENT | LAST_SEGMENT;
}
