use log::trace;

use super::{AlignmentStatus, LogicalUnit, Mate, SeqLengthHint};
use crate::error::{ConsistencyError, PairingError, Result};
use crate::io::RecordSource;
use crate::record::AlignmentRecord;

/// A builder for creating configured [`UnitReader`] instances
///
/// # Examples
///
/// ```rust
/// use std::collections::VecDeque;
/// use bamslim::UnitReaderBuilder;
///
/// let reader = UnitReaderBuilder::default()
///     .verify_query_length(false)
///     .build(VecDeque::new());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UnitReaderBuilder {
    /// Check mapped mates' sequence lengths against their CIGAR
    verify_query_length: bool,
    /// Require the record following a paired record to be flagged as paired
    require_paired_mate: bool,
}
impl Default for UnitReaderBuilder {
    fn default() -> Self {
        Self {
            verify_query_length: true,
            require_paired_mate: true,
        }
    }
}
impl UnitReaderBuilder {
    /// Sets whether the sequence length of every mapped mate is checked against the number of
    /// query bases its CIGAR consumes (default: `true`)
    #[must_use]
    pub fn verify_query_length(mut self, verify: bool) -> Self {
        self.verify_query_length = verify;
        self
    }

    /// Sets whether the second record of a pair must carry the paired flag (default: `true`)
    #[must_use]
    pub fn require_paired_mate(mut self, require: bool) -> Self {
        self.require_paired_mate = require;
        self
    }

    pub fn build<S: RecordSource>(self, source: S) -> UnitReader<S> {
        UnitReader {
            inner: source,
            config: self,
            n_units: 0,
            n_records: 0,
        }
    }
}

/// Assembles logical units from a record source
///
/// Each call to [`read_unit`](Self::read_unit) reads one record, or two for a paired read,
/// into the buffers of the unit passed in and validates the pair.
#[derive(Debug)]
pub struct UnitReader<S: RecordSource> {
    /// Inner record source
    inner: S,

    /// Reader configuration
    config: UnitReaderBuilder,

    /// Number of units read
    n_units: usize,

    /// Number of records read
    n_records: usize,
}
impl<S: RecordSource> UnitReader<S> {
    pub fn new(source: S) -> Self {
        UnitReaderBuilder::default().build(source)
    }

    /// Reads the next logical unit into `unit`
    ///
    /// Returns `Ok(false)` at the end of the stream. `hint` supplies the expected sequence
    /// length of mates whose own records have it elided.
    ///
    /// On error the unit is left unresolved and must not be written.
    pub fn read_unit<H: SeqLengthHint>(&mut self, unit: &mut LogicalUnit, hint: &H) -> Result<bool> {
        unit.invalidate();

        let [first, second] = unit.buffers_mut();
        if !self.inner.read_record(first)? {
            return Ok(false);
        }
        self.n_records += 1;

        let is_paired = first.is_paired();
        if is_paired {
            self.read_mate(first, second)?;
        }

        let status = if is_paired {
            AlignmentStatus::new(first.is_mapped(), second.is_mapped())
        } else {
            AlignmentStatus::new(first.is_mapped(), false)
        };

        let mut seq_lengths = [0; 2];
        seq_lengths[0] = effective_seq_length(first, Mate::First, hint);
        if is_paired {
            seq_lengths[1] = effective_seq_length(second, Mate::Second, hint);
        }

        if self.config.verify_query_length {
            verify_query_length(first, Mate::First, seq_lengths[0])?;
            if is_paired {
                verify_query_length(second, Mate::Second, seq_lengths[1])?;
            }
        }

        unit.resolve(is_paired, status, seq_lengths);
        self.n_units += 1;
        Ok(true)
    }

    /// Reads the other mate of a paired record and puts mate 1 into `first`
    fn read_mate(&mut self, first: &mut AlignmentRecord, second: &mut AlignmentRecord) -> Result<()> {
        if !self.inner.read_record(second)? {
            return Err(PairingError::TruncatedPair(self.n_units).into());
        }
        self.n_records += 1;

        if self.config.require_paired_mate && !second.is_paired() {
            return Err(PairingError::UnpairedMate(second.flag()).into());
        }

        if first.is_first_mate() && second.is_last_mate() {
            Ok(())
        } else if first.is_last_mate() && second.is_first_mate() {
            trace!("Swapping mates of unit {}", self.n_units);
            std::mem::swap(first, second);
            Ok(())
        } else {
            Err(PairingError::MateFlags {
                first: first.flag(),
                second: second.flag(),
            }
            .into())
        }
    }

    /// Number of units read so far
    pub fn n_units(&self) -> usize {
        self.n_units
    }

    /// Number of records read so far
    pub fn n_records(&self) -> usize {
        self.n_records
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

fn effective_seq_length<H: SeqLengthHint>(record: &AlignmentRecord, mate: Mate, hint: &H) -> i32 {
    if record.seq_length() <= 0 {
        hint.seq_length(mate)
    } else {
        record.seq_length()
    }
}

fn verify_query_length(record: &AlignmentRecord, mate: Mate, seq_length: i32) -> Result<()> {
    if !record.is_mapped() {
        return Ok(());
    }
    let cigar_length = record.cigar().query_length();
    if usize::try_from(seq_length).ok() == Some(cigar_length) {
        Ok(())
    } else {
        Err(ConsistencyError::QueryLengthMismatch {
            mate,
            seq_length,
            cigar_length,
        }
        .into())
    }
}
