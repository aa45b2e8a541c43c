use log::info;

use super::{Action, LogicalUnit, Mate};
use crate::codec::{compress, decompress};
use crate::error::{CodecError, Result, WriteError};
use crate::io::RecordSink;

/// A builder for creating configured [`UnitWriter`] instances
#[derive(Debug, Clone, Copy)]
pub struct UnitWriterBuilder {
    /// Zero the sequence length of compacted records before writing
    normalize_compacted: bool,
}
impl Default for UnitWriterBuilder {
    fn default() -> Self {
        Self {
            normalize_compacted: true,
        }
    }
}
impl UnitWriterBuilder {
    /// Sets whether compacted records get their sequence length field reset to 0 before they
    /// are written, so that no elided length leaks into the output (default: `true`)
    #[must_use]
    pub fn normalize_compacted(mut self, normalize: bool) -> Self {
        self.normalize_compacted = normalize;
        self
    }

    pub fn build<K: RecordSink>(self, sink: K) -> UnitWriter<K> {
        UnitWriter {
            inner: sink,
            config: self,
            units_written: 0,
            records_compressed: 0,
            records_decompressed: 0,
        }
    }
}

/// Applies payload actions to logical units and forwards their records to a sink
#[derive(Debug)]
pub struct UnitWriter<K: RecordSink> {
    /// Inner record sink
    inner: K,

    /// Writer configuration
    config: UnitWriterBuilder,

    /// Number of units written
    units_written: usize,

    /// Number of records stripped by [`Action::Compress`]
    records_compressed: usize,

    /// Number of records restored by [`Action::Decompress`]
    records_decompressed: usize,
}
impl<K: RecordSink> UnitWriter<K> {
    pub fn new(sink: K) -> Self {
        UnitWriterBuilder::default().build(sink)
    }

    /// Applies `action` to each record of `unit` and writes mate 1, then mate 2
    ///
    /// * [`Action::None`] forwards the records unchanged.
    /// * [`Action::Compress`] strips every record that still carries its payload.
    /// * [`Action::Decompress`] restores every compacted record from the same mate of `donor`;
    ///   the donor is only required if the unit holds a compacted record.
    ///
    /// The records are rewritten in place, so `unit` holds what was written afterwards.
    ///
    /// # Errors
    ///
    /// Fails if `unit` was never filled by a read, if a decompress is requested without a
    /// donor or with a donor lacking the needed mate, and on sink errors.
    pub fn write_unit(
        &mut self,
        unit: &mut LogicalUnit,
        action: Action,
        donor: Option<&LogicalUnit>,
    ) -> Result<()> {
        if unit.status().is_none() {
            return Err(WriteError::UnresolvedUnit.into());
        }

        if self.config.normalize_compacted {
            unit.records_mut()
                .iter_mut()
                .filter(|record| record.is_compacted())
                .for_each(|record| record.set_seq_length(0));
        }

        match action {
            Action::None => {}
            Action::Compress => {
                for record in unit.records_mut() {
                    if !record.is_compacted() {
                        compress(record)?;
                        self.records_compressed += 1;
                    }
                }
            }
            Action::Decompress => {
                // resolve every donor mate before touching the unit
                let mut sources = [None, None];
                for (index, record) in unit.records().iter().enumerate() {
                    if record.is_compacted() {
                        let mate = if index == 0 { Mate::First } else { Mate::Second };
                        let source = donor
                            .ok_or(WriteError::MissingDonor)?
                            .mate(mate)
                            .ok_or(WriteError::MissingMate(mate))?;
                        if source.is_compacted() {
                            return Err(CodecError::DonorCompacted.into());
                        }
                        sources[index] = Some(source);
                    }
                }
                for (record, source) in unit.records_mut().iter_mut().zip(sources) {
                    if let Some(source) = source {
                        decompress(record, source)?;
                        self.records_decompressed += 1;
                    }
                }
            }
        }

        for record in unit.records() {
            self.inner.write_record(record)?;
        }
        self.units_written += 1;
        Ok(())
    }

    /// Number of units written so far
    pub fn units_written(&self) -> usize {
        self.units_written
    }

    pub fn records_compressed(&self) -> usize {
        self.records_compressed
    }

    pub fn records_decompressed(&self) -> usize {
        self.records_decompressed
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    /// Flushes the sink and returns it
    pub fn finish(mut self) -> Result<K> {
        self.flush()?;
        info!(
            "Wrote {} units ({} records compressed, {} records decompressed)",
            self.units_written, self.records_compressed, self.records_decompressed
        );
        Ok(self.inner)
    }
}
