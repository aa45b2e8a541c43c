use std::io::Write;
use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use super::{flags, Cigar};
use crate::error::{ReadError, Result};

/// Size of the fixed-length portion of a raw record in bytes
pub const RAW_HEADER_SIZE: usize = 32;

/// Fixed-size fields of an alignment record
///
/// The layout fields (`l_qname`, `l_extranul`, `n_cigar`, `l_seq`) describe how the record's
/// data buffer is segmented and are only changed by the crate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordCore {
    /// Reference sequence id (-1 for none)
    pub ref_id: i32,
    /// 0-based leftmost position (-1 for none)
    pub pos: i32,
    /// BAI bin
    pub bin: u16,
    /// Mapping quality
    pub mapq: u8,
    /// Bitwise flags, see [`flags`]
    pub flag: u16,
    /// Mate reference sequence id
    pub mate_ref_id: i32,
    /// Mate 0-based position
    pub mate_pos: i32,
    /// Template length
    pub tlen: i32,
    /// Bytes used by the name slot, including the NUL and the padding NULs
    pub(crate) l_qname: u16,
    /// Padding NULs at the end of the name slot
    pub(crate) l_extranul: u8,
    /// Number of CIGAR operations
    pub(crate) n_cigar: u16,
    /// Sequence length
    pub(crate) l_seq: i32,
}

/// A single alignment record backed by one growable byte buffer
///
/// The buffer may be longer than the record's logical extent (`l_data`): bytes past `l_data`
/// are spare capacity left behind by earlier, larger records and carry no meaning.
#[derive(Debug, Clone, Default)]
pub struct AlignmentRecord {
    core: RecordCore,
    data: Vec<u8>,
    l_data: usize,
}
impl AlignmentRecord {
    pub(crate) fn from_parts(core: RecordCore, data: Vec<u8>) -> Self {
        let l_data = data.len();
        Self { core, data, l_data }
    }

    #[must_use]
    pub fn core(&self) -> &RecordCore {
        &self.core
    }

    pub(crate) fn core_mut(&mut self) -> &mut RecordCore {
        &mut self.core
    }

    #[must_use]
    pub fn flag(&self) -> u16 {
        self.core.flag
    }

    pub fn set_flag(&mut self, flag: u16) {
        self.core.flag = flag;
    }

    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.core.flag & flags::PAIRED != 0
    }

    #[must_use]
    pub fn is_first_mate(&self) -> bool {
        self.core.flag & flags::MATE_MASK == flags::FIRST_SEGMENT
    }

    #[must_use]
    pub fn is_last_mate(&self) -> bool {
        self.core.flag & flags::MATE_MASK == flags::LAST_SEGMENT
    }

    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.core.flag & flags::UNMAPPED == 0
    }

    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.core.flag & flags::REVERSE != 0
    }

    /// Length of the name including its NUL terminator but excluding padding
    #[must_use]
    pub fn logical_name_len(&self) -> usize {
        usize::from(self.core.l_qname) - usize::from(self.core.l_extranul)
    }

    /// Returns true if the name, sequence, and qualities have been stripped
    #[must_use]
    pub fn is_compacted(&self) -> bool {
        self.logical_name_len() == 1
    }

    /// The sequence length field as stored (may be zero or negative when elided)
    #[must_use]
    pub fn seq_length(&self) -> i32 {
        self.core.l_seq
    }

    pub(crate) fn set_seq_length(&mut self, l_seq: i32) {
        self.core.l_seq = l_seq;
    }

    /// Number of bases actually present in the buffer
    #[must_use]
    pub fn n_bases(&self) -> usize {
        self.core.l_seq.max(0) as usize
    }

    #[must_use]
    pub fn n_cigar(&self) -> usize {
        usize::from(self.core.n_cigar)
    }

    /// Logical length of the data buffer
    #[must_use]
    pub fn l_data(&self) -> usize {
        self.l_data
    }

    /// The record's variable-length data (name slot through aux tags)
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.l_data]
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.l_data]
    }

    /// Read name without the NUL terminator
    #[must_use]
    pub fn name(&self) -> &[u8] {
        let l = self.logical_name_len();
        if l > 1 {
            &self.data[..l - 1]
        } else {
            &[]
        }
    }

    pub(crate) fn cigar_offset(&self) -> usize {
        usize::from(self.core.l_qname)
    }

    pub(crate) fn seq_offset(&self) -> usize {
        self.cigar_offset() + 4 * self.n_cigar()
    }

    pub(crate) fn qual_offset(&self) -> usize {
        self.seq_offset() + self.n_bases().div_ceil(2)
    }

    pub(crate) fn aux_offset(&self) -> usize {
        self.qual_offset() + self.n_bases()
    }

    /// Length of the auxiliary tag block
    #[must_use]
    pub fn l_aux(&self) -> usize {
        self.l_data.saturating_sub(self.aux_offset())
    }

    /// Raw little-endian CIGAR bytes
    #[must_use]
    pub fn cigar_bytes(&self) -> &[u8] {
        &self.data[self.cigar_offset()..self.seq_offset()]
    }

    #[must_use]
    pub fn cigar(&self) -> Cigar<'_> {
        Cigar::new(self.cigar_bytes())
    }

    /// Packed 4-bit bases, two per byte
    #[must_use]
    pub fn sequence(&self) -> &[u8] {
        &self.data[self.seq_offset()..self.qual_offset()]
    }

    /// Decodes the packed bases into ASCII
    #[must_use]
    pub fn bases(&self) -> Vec<u8> {
        crate::complement::unpack_bases(self.sequence(), self.n_bases())
    }

    #[must_use]
    pub fn qualities(&self) -> &[u8] {
        &self.data[self.qual_offset()..self.aux_offset()]
    }

    #[must_use]
    pub fn aux(&self) -> &[u8] {
        &self.data[self.aux_offset()..self.l_data]
    }

    /// Layout length implied by the current core fields and a given aux length
    pub(crate) fn layout_len(&self, l_aux: usize) -> usize {
        usize::from(self.core.l_qname)
            + 4 * self.n_cigar()
            + self.n_bases().div_ceil(2)
            + self.n_bases()
            + l_aux
    }

    /// Sets the logical length of the buffer, growing the allocation if needed
    ///
    /// Existing bytes are preserved; newly exposed bytes are zeroed.
    pub(crate) fn resize_data(&mut self, l_data: usize) {
        if self.data.len() < l_data {
            self.data.resize(l_data, 0);
        }
        self.l_data = l_data;
    }

    /// Moves a byte range within the buffer (overlap-safe)
    pub(crate) fn move_bytes(&mut self, src: Range<usize>, dest: usize) {
        self.data.copy_within(src, dest);
    }

    /// Replaces this record's contents with a raw record (without its `block_size` prefix)
    ///
    /// The existing allocation is reused. The name slot is padded with NULs so that the CIGAR
    /// block is 4-byte aligned.
    pub fn decode_raw(&mut self, raw: &[u8]) -> Result<()> {
        if raw.len() < RAW_HEADER_SIZE {
            return Err(ReadError::InvalidRecord(raw.len(), RAW_HEADER_SIZE).into());
        }
        let l_read_name = usize::from(raw[8]);
        if l_read_name == 0 {
            return Err(ReadError::EmptyReadName.into());
        }
        let n_cigar = LittleEndian::read_u16(&raw[12..14]);
        let l_seq = LittleEndian::read_i32(&raw[16..20]);
        let n_bases = l_seq.max(0) as usize;
        let required = RAW_HEADER_SIZE
            + l_read_name
            + 4 * usize::from(n_cigar)
            + n_bases.div_ceil(2)
            + n_bases;
        if raw.len() < required {
            return Err(ReadError::InvalidRecord(raw.len(), required).into());
        }

        let l_extranul = (4 - l_read_name % 4) % 4;
        let l_qname = l_read_name + l_extranul;
        self.core = RecordCore {
            ref_id: LittleEndian::read_i32(&raw[0..4]),
            pos: LittleEndian::read_i32(&raw[4..8]),
            mapq: raw[9],
            bin: LittleEndian::read_u16(&raw[10..12]),
            flag: LittleEndian::read_u16(&raw[14..16]),
            mate_ref_id: LittleEndian::read_i32(&raw[20..24]),
            mate_pos: LittleEndian::read_i32(&raw[24..28]),
            tlen: LittleEndian::read_i32(&raw[28..32]),
            l_qname: l_qname as u16,
            l_extranul: l_extranul as u8,
            n_cigar,
            l_seq,
        };

        let body = &raw[RAW_HEADER_SIZE..];
        self.resize_data(body.len() + l_extranul);
        self.data[..l_read_name].copy_from_slice(&body[..l_read_name]);
        self.data[l_read_name..l_qname].fill(0);
        self.data[l_qname..self.l_data].copy_from_slice(&body[l_read_name..]);
        Ok(())
    }

    /// Size of the raw encoding of this record, excluding the `block_size` prefix
    #[must_use]
    pub fn raw_len(&self) -> usize {
        RAW_HEADER_SIZE + self.l_data - usize::from(self.core.l_extranul)
    }

    /// Writes the raw encoding of this record (without its `block_size` prefix)
    ///
    /// Padding NULs in the name slot are not written.
    pub fn encode_raw<W: Write>(&self, writer: &mut W) -> Result<()> {
        let l_read_name = self.logical_name_len();
        writer.write_i32::<LittleEndian>(self.core.ref_id)?;
        writer.write_i32::<LittleEndian>(self.core.pos)?;
        writer.write_u8(l_read_name as u8)?;
        writer.write_u8(self.core.mapq)?;
        writer.write_u16::<LittleEndian>(self.core.bin)?;
        writer.write_u16::<LittleEndian>(self.core.n_cigar)?;
        writer.write_u16::<LittleEndian>(self.core.flag)?;
        writer.write_i32::<LittleEndian>(self.core.l_seq)?;
        writer.write_i32::<LittleEndian>(self.core.mate_ref_id)?;
        writer.write_i32::<LittleEndian>(self.core.mate_pos)?;
        writer.write_i32::<LittleEndian>(self.core.tlen)?;
        writer.write_all(&self.data[..l_read_name])?;
        writer.write_all(&self.data[self.cigar_offset()..self.l_data])?;
        Ok(())
    }
}
