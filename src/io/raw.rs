use std::io::{self, Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;

use super::{RecordSink, RecordSource};
use crate::error::{ReadError, Result};
use crate::record::{AlignmentRecord, RAW_HEADER_SIZE};

/// Reads `block_size`-prefixed raw records from a byte stream
///
/// The stream must be positioned at a record boundary (for a BAM body, after the header and
/// reference dictionary). Reaching the end of the stream exactly at a record boundary ends
/// the iteration; ending anywhere else is an error.
#[derive(Debug)]
pub struct RawRecordReader<R: Read> {
    /// Inner reader
    inner: R,

    /// Reusable buffer for the raw bytes of the current record
    buffer: Vec<u8>,

    /// Number of records read
    n_processed: usize,
}
impl<R: Read> RawRecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            n_processed: 0,
        }
    }

    /// Reads the next `block_size`, or `None` at a clean end of stream
    fn next_block_size(&mut self) -> Result<Option<usize>> {
        let mut bytes = [0u8; 4];
        let mut filled = 0;
        while filled < bytes.len() {
            match self.inner.read(&mut bytes[filled..]) {
                Ok(0) if filled == 0 => {
                    debug!("End of record stream after {} records", self.n_processed);
                    return Ok(None);
                }
                Ok(0) => {
                    let err = io::Error::from(io::ErrorKind::UnexpectedEof);
                    return Err(ReadError::UnexpectedEndOfStream(err, self.n_processed).into());
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Some(u32::from_le_bytes(bytes) as usize))
    }

    pub fn n_processed(&self) -> usize {
        self.n_processed
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
impl<R: Read> RecordSource for RawRecordReader<R> {
    fn read_record(&mut self, record: &mut AlignmentRecord) -> Result<bool> {
        let Some(block_size) = self.next_block_size()? else {
            return Ok(false);
        };

        if block_size < RAW_HEADER_SIZE {
            return Err(ReadError::InvalidRecord(block_size, RAW_HEADER_SIZE).into());
        }

        // the buffer only grows with bytes that actually arrive
        self.buffer.clear();
        let n_read = (&mut self.inner)
            .take(block_size as u64)
            .read_to_end(&mut self.buffer)?;
        if n_read < block_size {
            let err = io::Error::from(io::ErrorKind::UnexpectedEof);
            return Err(ReadError::UnexpectedEndOfStream(err, self.n_processed).into());
        }
        record.decode_raw(&self.buffer)?;

        self.n_processed += 1;
        Ok(true)
    }
}

/// Writes records as a `block_size`-prefixed raw record stream
#[derive(Debug)]
pub struct RawRecordWriter<W: Write> {
    /// Inner writer
    inner: W,

    /// Number of records written
    records_written: usize,
}
impl<W: Write> RawRecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
impl<W: Write> RecordSink for RawRecordWriter<W> {
    fn write_record(&mut self, record: &AlignmentRecord) -> Result<()> {
        self.inner
            .write_u32::<LittleEndian>(record.raw_len() as u32)?;
        record.encode_raw(&mut self.inner)?;
        self.records_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        debug!("Flushing record stream after {} records", self.records_written);
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compress;
    use crate::record::{flags, parse_cigar, RecordBuilder};
    use crate::Error;
    use anyhow::Result;
    use std::io::Cursor;

    fn records() -> Vec<AlignmentRecord> {
        let mut compacted = RecordBuilder::default()
            .name(b"read-2")
            .flag(flags::UNMAPPED)
            .sequence(b"GGGCA")
            .aux(b"ZZZhello\0")
            .build();
        compress(&mut compacted).unwrap();
        vec![
            RecordBuilder::default()
                .name(b"read-1")
                .ref_id(1)
                .pos(5)
                .cigar(&parse_cigar("3M1D2M").unwrap())
                .sequence(b"ACGTA")
                .qualities(&[1, 2, 3, 4, 5])
                .build(),
            compacted,
        ]
    }

    fn write_all(records: &[AlignmentRecord]) -> Result<Vec<u8>> {
        let mut writer = RawRecordWriter::new(Cursor::new(Vec::new()));
        for record in records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        assert_eq!(writer.records_written(), records.len());
        Ok(writer.into_inner().into_inner())
    }

    #[test]
    fn test_stream_preserves_records() -> Result<()> {
        let expected = records();
        let bytes = write_all(&expected)?;

        let mut reader = RawRecordReader::new(bytes.as_slice());
        let mut record = AlignmentRecord::default();
        for original in &expected {
            assert!(reader.read_record(&mut record)?);
            assert_eq!(record.core(), original.core());
            assert_eq!(record.data(), original.data());
        }
        assert!(!reader.read_record(&mut record)?);
        assert_eq!(reader.n_processed(), 2);
        Ok(())
    }

    #[test]
    fn test_compacted_record_on_the_wire() -> Result<()> {
        let expected = records();
        let bytes = write_all(&expected[1..])?;
        // block_size + 32 byte header + a single NUL name + aux
        assert_eq!(bytes.len(), 4 + 32 + 1 + 9);
        assert_eq!(bytes[4 + 8], 1);
        Ok(())
    }

    #[test]
    fn test_truncated_stream() -> Result<()> {
        let bytes = write_all(&records())?;
        let mut record = AlignmentRecord::default();

        // cut inside the second record's body
        let mut reader = RawRecordReader::new(&bytes[..bytes.len() - 3]);
        assert!(reader.read_record(&mut record)?);
        assert!(matches!(
            reader.read_record(&mut record),
            Err(Error::ReadError(ReadError::UnexpectedEndOfStream(_, 1)))
        ));

        // cut inside the first block size
        let mut reader = RawRecordReader::new(&bytes[..2]);
        assert!(matches!(
            reader.read_record(&mut record),
            Err(Error::ReadError(ReadError::UnexpectedEndOfStream(_, 0)))
        ));
        Ok(())
    }

    #[test]
    fn test_block_size_below_header_is_rejected() {
        let mut bytes = 16u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        let mut reader = RawRecordReader::new(bytes.as_slice());
        let mut record = AlignmentRecord::default();
        assert!(matches!(
            reader.read_record(&mut record),
            Err(Error::ReadError(ReadError::InvalidRecord(16, RAW_HEADER_SIZE)))
        ));
    }

    #[test]
    fn test_oversized_block_size_with_short_body() {
        let mut bytes = u32::MAX.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 40]);
        let mut reader = RawRecordReader::new(bytes.as_slice());
        let mut record = AlignmentRecord::default();
        assert!(matches!(
            reader.read_record(&mut record),
            Err(Error::ReadError(ReadError::UnexpectedEndOfStream(_, 0)))
        ));
        // only the bytes present in the stream were buffered
        assert!(reader.buffer.len() <= 40);
    }
}
