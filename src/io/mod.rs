//! # io
//!
//! Boundaries to the upstream record source and the downstream record sink.
//!
//! Container formats (BGZF blocks, file headers, reference dictionaries) stay outside of this
//! crate: anything able to produce or consume one [`AlignmentRecord`] at a time can implement
//! [`RecordSource`] or [`RecordSink`]. The [`RawRecordReader`] and [`RawRecordWriter`] provided
//! here handle the plain record stream, where each record is prefixed by its `block_size` as a
//! little-endian `u32`.

mod raw;

use std::collections::VecDeque;

use auto_impl::auto_impl;

use crate::error::Result;
use crate::record::AlignmentRecord;

pub use raw::{RawRecordReader, RawRecordWriter};

/// Produces alignment records one at a time
#[auto_impl(&mut, Box)]
pub trait RecordSource {
    /// Reads the next record into `record`, reusing its buffer
    ///
    /// Returns `Ok(false)` once the source is exhausted.
    fn read_record(&mut self, record: &mut AlignmentRecord) -> Result<bool>;
}

/// Consumes alignment records one at a time
#[auto_impl(&mut, Box)]
pub trait RecordSink {
    /// Serializes one record
    fn write_record(&mut self, record: &AlignmentRecord) -> Result<()>;

    /// Flushes any buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RecordSource for VecDeque<AlignmentRecord> {
    fn read_record(&mut self, record: &mut AlignmentRecord) -> Result<bool> {
        match self.pop_front() {
            Some(next) => {
                *record = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl RecordSink for Vec<AlignmentRecord> {
    fn write_record(&mut self, record: &AlignmentRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}
