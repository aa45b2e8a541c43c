//! # bamslim
//!
//! Reversible removal of redundant payloads from multi-mapping alignment records.
//!
//! Aligners that report several alignments per read repeat the read name, bases, and quality
//! string in every one of them. This crate strips that payload from all but one alignment of
//! a read (*compress*) and restores it later from the alignment that kept it (*decompress*),
//! reverse complementing the bases when the two alignments lie on opposite strands.
//!
//! The work happens on [`LogicalUnit`]s: a single record for an unpaired read, or both mates
//! of a paired read with mate 1 first. A [`UnitReader`] fills units from any
//! [`RecordSource`](io::RecordSource) and a [`UnitWriter`] applies an [`Action`] before
//! handing the records to a [`RecordSink`](io::RecordSink).
//!
//! ## Modules
//!
//! - [`complement`]: 4-bit nucleotide complement table and packed reverse complement
//! - [`record`]: in-memory alignment records, CIGAR view, and record builder
//! - [`codec`]: in-place [`compress`](codec::compress) and [`decompress`](codec::decompress)
//! - [`io`]: record source and sink traits, raw record stream reader and writer
//!
//! ## Errors
//!
//! Pairing violations, CIGAR/length disagreements, codec precondition violations, and invalid
//! write requests are returned as [`Error`] values for which [`Error::is_fatal_defect`] is
//! true. End of input is never an error: readers return `Ok(false)`.

pub mod codec;
pub mod complement;
mod error;
pub mod io;
pub mod record;
mod unit;

pub use error::{
    CodecError, ConsistencyError, Error, PairingError, ReadError, Result, WriteError,
};
pub use record::AlignmentRecord;
pub use unit::{
    Action, AlignmentStatus, LogicalUnit, Mate, NoHint, SeqLengthHint, UnitReader,
    UnitReaderBuilder, UnitWriter, UnitWriterBuilder,
};
