use crate::Mate;

/// Custom Result type for bamslim operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the bamslim library, encompassing all possible error cases
/// that can occur while reading, rewriting, or writing alignment units.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors that occur while decoding raw records from a stream
    ReadError(#[from] ReadError),
    /// Mate-pairing invariant violations
    PairingError(#[from] PairingError),
    /// Disagreement between a record's sequence length and its CIGAR
    ConsistencyError(#[from] ConsistencyError),
    /// Payload codec precondition violations
    CodecError(#[from] CodecError),
    /// Errors that occur during write operations
    WriteError(#[from] WriteError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// Generic errors raised by external record sources or sinks
    AnyhowError(#[from] anyhow::Error),
}
impl Error {
    /// Returns true if the error reflects a structurally invalid unit or pipeline state
    /// rather than an I/O failure or an undecodable byte stream.
    ///
    /// Continuing after one of these would silently produce wrong alignments, so callers
    /// are expected to stop processing.
    #[must_use]
    pub fn is_fatal_defect(&self) -> bool {
        matches!(
            self,
            Self::PairingError(_)
                | Self::ConsistencyError(_)
                | Self::CodecError(_)
                | Self::WriteError(_)
        )
    }
}

/// Errors that can occur while decoding raw alignment records
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The stream ended in the middle of a record
    ///
    /// # Arguments
    /// * `std::io::Error` - The underlying I/O error
    /// * `usize` - The number of records read before the truncation
    #[error("Unexpected end of stream after {1} records: {0}")]
    UnexpectedEndOfStream(std::io::Error, usize),

    /// The record framing is inconsistent with its own length fields
    ///
    /// # Arguments
    /// * First `usize` - The declared block size
    /// * Second `usize` - The number of bytes the header fields require
    #[error("Invalid record: block size {0} cannot hold the {1} bytes declared by its header")]
    InvalidRecord(usize, usize),

    /// The declared read-name length is zero (the name must at least hold its NUL terminator)
    #[error("Invalid record: read name length is zero")]
    EmptyReadName,
}

/// Mate-pairing invariant violations detected while assembling a logical unit
#[derive(thiserror::Error, Debug)]
pub enum PairingError {
    /// The stream ended after the first record of a paired read
    ///
    /// # Arguments
    /// * `usize` - The number of units read before the truncated pair
    #[error("Failed to read the other mate of a paired-end alignment (after {0} units)")]
    TruncatedPair(usize),

    /// The record following a paired record is not itself flagged as paired
    ///
    /// # Arguments
    /// * `u16` - The flag of the offending record
    #[error("Expected the other mate of a paired-end alignment, found an unpaired record (flag {0:#06x})")]
    UnpairedMate(u16),

    /// The two records are not one first-in-pair and one last-in-pair
    #[error("Cannot detect both mates of a paired-end alignment (flags {first:#06x} and {second:#06x})")]
    MateFlags { first: u16, second: u16 },
}

/// Internal consistency failures between a record and its CIGAR
#[derive(thiserror::Error, Debug)]
pub enum ConsistencyError {
    /// The effective sequence length of a mapped mate disagrees with its CIGAR query length
    #[error("{mate} is mapped with sequence length {seq_length} but its CIGAR consumes {cigar_length} query bases")]
    QueryLengthMismatch {
        mate: Mate,
        seq_length: i32,
        cigar_length: usize,
    },
}

/// Precondition violations of the payload codec
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// `compress` was called on a record whose payload is already stripped
    #[error("Record is already compacted")]
    AlreadyCompacted,

    /// `decompress` was called on a record that still carries its payload
    #[error("Record is not compacted (logical name length {0})")]
    NotCompacted(usize),

    /// The donor passed to `decompress` carries no payload to copy
    #[error("Donor record is compacted and cannot restore a payload")]
    DonorCompacted,
}

/// Errors that can occur while writing logical units
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// An action code outside of the known set was requested
    ///
    /// # Arguments
    /// * `String` - The offending code or name
    #[error("Invalid write action: {0}")]
    InvalidAction(String),

    /// The unit has not been filled by a successful read
    #[error("Attempted to write a unit that was never read")]
    UnresolvedUnit,

    /// A decompress action was requested without a donor unit
    #[error("Decompress requires a donor unit")]
    MissingDonor,

    /// The donor unit lacks the mate required to restore the target
    #[error("Donor unit has no {0} to restore from")]
    MissingMate(Mate),
}
