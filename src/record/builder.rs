use super::{AlignmentRecord, CigarOp, RecordCore};
use crate::complement::pack_bases;

/// A builder for assembling [`AlignmentRecord`]s from their logical fields
///
/// An empty name produces a compacted record (a lone NUL padded to four bytes).
///
/// # Examples
///
/// ```rust
/// use bamslim::record::{flags, parse_cigar, RecordBuilder};
///
/// let record = RecordBuilder::default()
///     .name(b"read1")
///     .flag(flags::PAIRED | flags::FIRST_SEGMENT)
///     .cigar(&parse_cigar("4M").unwrap())
///     .sequence(b"ACGT")
///     .qualities(&[30, 30, 30, 30])
///     .build();
///
/// assert_eq!(record.name(), b"read1");
/// assert_eq!(record.cigar().query_length(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    core: RecordCore,
    name: Vec<u8>,
    cigar: Vec<CigarOp>,
    sequence: Vec<u8>,
    qualities: Vec<u8>,
    aux: Vec<u8>,
}
impl Default for RecordBuilder {
    fn default() -> Self {
        Self {
            core: RecordCore {
                ref_id: -1,
                pos: -1,
                mate_ref_id: -1,
                mate_pos: -1,
                ..RecordCore::default()
            },
            name: Vec::new(),
            cigar: Vec::new(),
            sequence: Vec::new(),
            qualities: Vec::new(),
            aux: Vec::new(),
        }
    }
}
impl RecordBuilder {
    /// Sets the read name (without NUL terminator)
    #[must_use]
    pub fn name(mut self, name: &[u8]) -> Self {
        self.name = name.to_vec();
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: u16) -> Self {
        self.core.flag = flag;
        self
    }

    #[must_use]
    pub fn ref_id(mut self, ref_id: i32) -> Self {
        self.core.ref_id = ref_id;
        self
    }

    #[must_use]
    pub fn pos(mut self, pos: i32) -> Self {
        self.core.pos = pos;
        self
    }

    #[must_use]
    pub fn mapq(mut self, mapq: u8) -> Self {
        self.core.mapq = mapq;
        self
    }

    #[must_use]
    pub fn bin(mut self, bin: u16) -> Self {
        self.core.bin = bin;
        self
    }

    #[must_use]
    pub fn mate(mut self, mate_ref_id: i32, mate_pos: i32, tlen: i32) -> Self {
        self.core.mate_ref_id = mate_ref_id;
        self.core.mate_pos = mate_pos;
        self.core.tlen = tlen;
        self
    }

    #[must_use]
    pub fn cigar(mut self, ops: &[CigarOp]) -> Self {
        self.cigar = ops.to_vec();
        self
    }

    /// Sets the bases as ASCII (`=ACMGRSVTWYHKDBN`, anything else becomes `N`)
    #[must_use]
    pub fn sequence(mut self, bases: &[u8]) -> Self {
        self.sequence = bases.to_vec();
        self
    }

    /// Sets the raw (not phred+33) quality scores
    ///
    /// If left unset, qualities default to `0xFF` (missing) for every base.
    #[must_use]
    pub fn qualities(mut self, qualities: &[u8]) -> Self {
        self.qualities = qualities.to_vec();
        self
    }

    /// Sets the encoded auxiliary tag block
    #[must_use]
    pub fn aux(mut self, aux: &[u8]) -> Self {
        self.aux = aux.to_vec();
        self
    }

    #[must_use]
    pub fn build(self) -> AlignmentRecord {
        let l_read_name = self.name.len() + 1;
        let l_extranul = (4 - l_read_name % 4) % 4;
        let l_qname = l_read_name + l_extranul;
        let n_bases = self.sequence.len();

        let mut data = Vec::with_capacity(
            l_qname + 4 * self.cigar.len() + n_bases.div_ceil(2) + n_bases + self.aux.len(),
        );
        data.extend_from_slice(&self.name);
        data.resize(l_qname, 0);
        self.cigar
            .iter()
            .for_each(|op| data.extend_from_slice(&op.raw().to_le_bytes()));
        data.extend_from_slice(&pack_bases(&self.sequence));
        if self.qualities.is_empty() {
            data.resize(data.len() + n_bases, 0xFF);
        } else {
            debug_assert_eq!(self.qualities.len(), n_bases);
            data.extend_from_slice(&self.qualities);
        }
        data.extend_from_slice(&self.aux);

        let core = RecordCore {
            l_qname: l_qname as u16,
            l_extranul: l_extranul as u8,
            n_cigar: self.cigar.len() as u16,
            l_seq: n_bases as i32,
            ..self.core
        };
        AlignmentRecord::from_parts(core, data)
    }
}
