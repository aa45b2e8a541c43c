//! # unit
//!
//! Logical alignment units: one record for an unpaired read, or both mates of a paired read
//! with mate 1 always in the first slot.
//!
//! A [`LogicalUnit`] owns two reusable record buffers. [`UnitReader::read_unit`] refills them
//! from a [`RecordSource`](crate::io::RecordSource) and [`UnitWriter::write_unit`] rewrites them
//! in place before forwarding them to a [`RecordSink`](crate::io::RecordSink), so a caller can
//! keep one unit as the donor while streaming others.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::VecDeque;
//! use bamslim::record::{parse_cigar, RecordBuilder};
//! use bamslim::{Action, LogicalUnit, NoHint, UnitReaderBuilder, UnitWriterBuilder};
//!
//! let alignment = |pos| {
//!     RecordBuilder::default()
//!         .name(b"read1")
//!         .ref_id(0)
//!         .pos(pos)
//!         .cigar(&parse_cigar("4M").unwrap())
//!         .sequence(b"ACGT")
//!         .qualities(&[30; 4])
//!         .build()
//! };
//! let source: VecDeque<_> = [alignment(10), alignment(90)].into_iter().collect();
//!
//! let mut reader = UnitReaderBuilder::default().build(source);
//! let mut writer = UnitWriterBuilder::default().build(Vec::new());
//!
//! // the first alignment keeps its payload and serves as the donor
//! let mut donor = LogicalUnit::default();
//! reader.read_unit(&mut donor, &NoHint).unwrap();
//! writer.write_unit(&mut donor, Action::None, None).unwrap();
//!
//! // later alignments of the same read are stripped
//! let mut unit = LogicalUnit::default();
//! while reader.read_unit(&mut unit, &donor).unwrap() {
//!     writer.write_unit(&mut unit, Action::Compress, None).unwrap();
//! }
//!
//! let written = writer.finish().unwrap();
//! assert!(!written[0].is_compacted());
//! assert!(written[1].is_compacted());
//! ```

mod action;
mod reader;
mod writer;

use std::fmt;

use auto_impl::auto_impl;

use crate::record::AlignmentRecord;

pub use action::Action;
pub use reader::{UnitReader, UnitReaderBuilder};
pub use writer::{UnitWriter, UnitWriterBuilder};

/// Logical position of a read within its fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mate {
    First,
    Second,
}
impl Mate {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}
impl fmt::Display for Mate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mate {}", self.index() + 1)
    }
}

/// Two-bit summary of which mates of a unit are mapped
///
/// Bit 0 is set if mate 1 is mapped, bit 1 if mate 2 is mapped. Bit 1 is never set for an
/// unpaired unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AlignmentStatus(u8);
impl AlignmentStatus {
    pub const MATE1_MAPPED: u8 = 0x1;
    pub const MATE2_MAPPED: u8 = 0x2;

    #[must_use]
    pub fn new(mate1_mapped: bool, mate2_mapped: bool) -> Self {
        let mut bits = 0;
        if mate1_mapped {
            bits |= Self::MATE1_MAPPED;
        }
        if mate2_mapped {
            bits |= Self::MATE2_MAPPED;
        }
        Self(bits)
    }

    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_mapped(self, mate: Mate) -> bool {
        let mask = match mate {
            Mate::First => Self::MATE1_MAPPED,
            Mate::Second => Self::MATE2_MAPPED,
        };
        self.0 & mask != 0
    }

    /// Returns true if any mate is mapped
    #[must_use]
    pub fn is_aligned(self) -> bool {
        self.0 != 0
    }
}

/// Supplies the expected sequence length of a mate whose own record has it elided
#[auto_impl(&, &mut, Box, Rc, Arc)]
pub trait SeqLengthHint {
    /// Expected sequence length of `mate`; values <= 0 mean "unknown"
    fn seq_length(&self, mate: Mate) -> i32;
}

/// A length hint that knows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHint;
impl SeqLengthHint for NoHint {
    fn seq_length(&self, _mate: Mate) -> i32 {
        0
    }
}

impl SeqLengthHint for [i32; 2] {
    fn seq_length(&self, mate: Mate) -> i32 {
        self[mate.index()]
    }
}

/// One unpaired record or a normalized pair of mate records
#[derive(Debug, Clone, Default)]
pub struct LogicalUnit {
    /// Record buffers: mate 1 (or the unpaired record) then mate 2
    records: [AlignmentRecord; 2],
    is_paired: bool,
    /// Resolved by a successful read; `None` until then
    status: Option<AlignmentStatus>,
    /// Effective sequence length per mate
    seq_lengths: [i32; 2],
}
impl LogicalUnit {
    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.is_paired
    }

    /// Alignment status, `None` if the unit has not been filled by a read
    #[must_use]
    pub fn status(&self) -> Option<AlignmentStatus> {
        self.status
    }

    /// The record for `mate`, `None` for mate 2 of an unpaired unit
    #[must_use]
    pub fn mate(&self, mate: Mate) -> Option<&AlignmentRecord> {
        match mate {
            Mate::First => Some(&self.records[0]),
            Mate::Second if self.is_paired => Some(&self.records[1]),
            Mate::Second => None,
        }
    }

    /// Mate 1, or the only record of an unpaired unit
    #[must_use]
    pub fn first(&self) -> &AlignmentRecord {
        &self.records[0]
    }

    #[must_use]
    pub fn second(&self) -> Option<&AlignmentRecord> {
        self.mate(Mate::Second)
    }

    /// Records in the unit, mate 1 first
    #[must_use]
    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records[..self.len()]
    }

    pub(crate) fn records_mut(&mut self) -> &mut [AlignmentRecord] {
        let len = self.len();
        &mut self.records[..len]
    }

    /// Number of records in the unit (1 or 2)
    #[must_use]
    pub fn len(&self) -> usize {
        if self.is_paired {
            2
        } else {
            1
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
    }

    pub(crate) fn buffers_mut(&mut self) -> &mut [AlignmentRecord; 2] {
        &mut self.records
    }

    pub(crate) fn resolve(&mut self, is_paired: bool, status: AlignmentStatus, seq_lengths: [i32; 2]) {
        self.is_paired = is_paired;
        self.status = Some(status);
        self.seq_lengths = seq_lengths;
    }

    pub(crate) fn invalidate(&mut self) {
        self.status = None;
    }
}
impl SeqLengthHint for LogicalUnit {
    /// Effective sequence length resolved when the unit was read
    fn seq_length(&self, mate: Mate) -> i32 {
        self.seq_lengths[mate.index()]
    }
}
