//! Payload codec
//!
//! [`compress`] strips the read name, sequence, and qualities from a record in place, keeping
//! only a placeholder name, the CIGAR, and the aux tags. [`decompress`] restores them from a
//! donor record of the same read, reverse complementing when the two records lie on opposite
//! strands.
//!
//! Both operations rewrite the record's own buffer: byte ranges are shifted with
//! [`slice::copy_within`], which is safe for overlapping source and destination ranges.

use crate::complement::{reverse_complement_packed, reverse_into};
use crate::error::{CodecError, Result};
use crate::record::AlignmentRecord;

/// Bytes used by the placeholder name slot of a compacted record (NUL + 3 padding NULs)
const PLACEHOLDER_LEN: usize = 4;

/// Strips the name, sequence, and qualities of an uncompacted record
///
/// After this call the record holds a 4-byte placeholder name slot, its original CIGAR, and
/// its original aux block; `seq_length()` is 0.
///
/// # Errors
///
/// Returns [`CodecError::AlreadyCompacted`] if the record carries no payload.
pub fn compress(record: &mut AlignmentRecord) -> Result<()> {
    if record.is_compacted() {
        return Err(CodecError::AlreadyCompacted.into());
    }
    let cigar = record.cigar_offset()..record.seq_offset();
    let aux = record.aux_offset()..record.l_data();
    let l_cigar = cigar.len();
    let l_aux = aux.len();

    // both blocks only ever move towards the front
    record.move_bytes(cigar, PLACEHOLDER_LEN);
    record.move_bytes(aux, PLACEHOLDER_LEN + l_cigar);
    record.resize_data(PLACEHOLDER_LEN + l_cigar + l_aux);
    record.data_mut()[..PLACEHOLDER_LEN].fill(0);

    let core = record.core_mut();
    core.l_qname = PLACEHOLDER_LEN as u16;
    core.l_extranul = (PLACEHOLDER_LEN - 1) as u8;
    core.l_seq = 0;
    Ok(())
}

/// Restores the name, sequence, and qualities of a compacted record from `donor`
///
/// The donor must be an uncompacted record of the same read. If the two records disagree on
/// the reverse-strand flag, the donor's bases are reverse complemented and its qualities
/// reversed. The donor is left untouched.
///
/// # Errors
///
/// Returns [`CodecError::NotCompacted`] if `record` still carries a payload and
/// [`CodecError::DonorCompacted`] if `donor` does not.
pub fn decompress(record: &mut AlignmentRecord, donor: &AlignmentRecord) -> Result<()> {
    if !record.is_compacted() {
        return Err(CodecError::NotCompacted(record.logical_name_len()).into());
    }
    if donor.is_compacted() {
        return Err(CodecError::DonorCompacted.into());
    }
    let cigar = record.cigar_offset()..record.seq_offset();
    let aux = record.aux_offset()..record.l_data();
    let l_aux = aux.len();

    let donor_core = donor.core();
    let core = record.core_mut();
    core.l_qname = donor_core.l_qname;
    core.l_extranul = donor_core.l_extranul;
    core.l_seq = donor_core.l_seq;
    record.resize_data(record.layout_len(l_aux));

    // aux first: the new CIGAR range can cover the old aux range
    record.move_bytes(aux, record.aux_offset());
    record.move_bytes(cigar, record.cigar_offset());

    let l_qname = record.cigar_offset();
    let seq = record.seq_offset()..record.qual_offset();
    let qual = record.qual_offset()..record.aux_offset();
    let n_bases = record.n_bases();
    let same_strand = record.is_reverse() == donor.is_reverse();

    let data = record.data_mut();
    data[..l_qname].copy_from_slice(&donor.data()[..l_qname]);
    if same_strand {
        data[seq].copy_from_slice(donor.sequence());
        data[qual].copy_from_slice(donor.qualities());
    } else {
        reverse_complement_packed(&mut data[seq], donor.sequence(), n_bases);
        reverse_into(&mut data[qual], donor.qualities());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complement::{pack_bases, NT16_BASES};
    use crate::record::{flags, parse_cigar, CigarOp, Kind, RecordBuilder};
    use anyhow::Result;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    const RNG_SEED: u64 = 42;

    fn donor(flag: u16) -> AlignmentRecord {
        RecordBuilder::default()
            .name(b"frag/7")
            .flag(flag)
            .ref_id(0)
            .pos(17)
            .cigar(&parse_cigar("1S2M1I").unwrap())
            .sequence(b"ACGT")
            .qualities(&[10, 20, 30, 40])
            .aux(b"NHi\x02\x00\x00\x00")
            .build()
    }

    fn random_record<R: Rng>(rng: &mut R) -> AlignmentRecord {
        let name_len = rng.random_range(1..40);
        let name: Vec<u8> = (0..name_len).map(|_| rng.random_range(b'!'..=b'~')).collect();
        let n_bases = rng.random_range(0..160);
        let bases: Vec<u8> = (0..n_bases)
            .map(|_| NT16_BASES[rng.random_range(0..16usize)])
            .collect();
        let quals: Vec<u8> = (0..n_bases).map(|_| rng.random_range(0..94)).collect();
        let aux: Vec<u8> = (0..rng.random_range(0..64)).map(|_| rng.random()).collect();
        let cigar = if n_bases > 0 {
            vec![CigarOp::new(Kind::Match, n_bases as u32)]
        } else {
            Vec::new()
        };
        let flag = if rng.random_bool(0.5) { flags::REVERSE } else { 0 };
        RecordBuilder::default()
            .name(&name)
            .flag(flag)
            .cigar(&cigar)
            .sequence(&bases)
            .qualities(&quals)
            .aux(&aux)
            .build()
    }

    #[test]
    fn test_compress_layout() -> Result<()> {
        let original = donor(0);
        let mut record = original.clone();
        compress(&mut record)?;

        assert!(record.is_compacted());
        assert_eq!(record.logical_name_len(), 1);
        assert_eq!(record.core().l_qname, 4);
        assert_eq!(record.core().l_extranul, 3);
        assert_eq!(record.seq_length(), 0);
        assert_eq!(record.l_data(), 4 + original.cigar_bytes().len() + original.l_aux());
        assert_eq!(&record.data()[..4], &[0, 0, 0, 0]);
        assert_eq!(record.cigar_bytes(), original.cigar_bytes());
        assert_eq!(record.aux(), original.aux());
        assert!(record.name().is_empty());
        assert!(record.sequence().is_empty());
        assert!(record.qualities().is_empty());
        Ok(())
    }

    #[test]
    fn test_compress_rejects_compacted() -> Result<()> {
        let mut record = donor(0);
        compress(&mut record)?;
        assert!(matches!(
            compress(&mut record),
            Err(crate::Error::CodecError(CodecError::AlreadyCompacted))
        ));
        Ok(())
    }

    #[test]
    fn test_decompress_preconditions() -> Result<()> {
        let full = donor(0);
        let mut target = full.clone();
        assert!(matches!(
            decompress(&mut target, &full),
            Err(crate::Error::CodecError(CodecError::NotCompacted(7)))
        ));

        let mut empty_donor = full.clone();
        compress(&mut empty_donor)?;
        compress(&mut target)?;
        assert!(matches!(
            decompress(&mut target, &empty_donor),
            Err(crate::Error::CodecError(CodecError::DonorCompacted))
        ));
        Ok(())
    }

    #[test]
    fn test_round_trip_same_strand() -> Result<()> {
        let original = donor(flags::REVERSE);
        let mut record = original.clone();
        compress(&mut record)?;
        decompress(&mut record, &original)?;

        assert_eq!(record.core(), original.core());
        assert_eq!(record.data(), original.data());
        Ok(())
    }

    #[test]
    fn test_round_trip_opposite_strand() -> Result<()> {
        let original = donor(0);
        let mut record = original.clone();
        compress(&mut record)?;
        record.set_flag(flags::REVERSE);
        decompress(&mut record, &original)?;

        assert_eq!(record.name(), b"frag/7");
        // reversed: T G C A, complemented: A C G T
        assert_eq!(record.bases(), b"ACGT".to_vec());
        assert_eq!(record.sequence(), pack_bases(b"ACGT").as_slice());
        assert_eq!(record.qualities(), &[40, 30, 20, 10]);
        assert_eq!(record.cigar_bytes(), original.cigar_bytes());
        assert_eq!(record.aux(), original.aux());
        Ok(())
    }

    #[test]
    fn test_decompress_grows_fresh_buffer() -> Result<()> {
        let original = donor(0);
        let mut compacted = original.clone();
        compress(&mut compacted)?;

        // a tightly sized copy forces the buffer to grow
        let mut raw = Vec::new();
        compacted.encode_raw(&mut raw)?;
        let mut fresh = AlignmentRecord::default();
        fresh.decode_raw(&raw)?;
        assert_eq!(fresh.data().len(), compacted.l_data());

        decompress(&mut fresh, &original)?;
        assert_eq!(fresh.data(), original.data());
        Ok(())
    }

    #[test]
    fn test_random_round_trips() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(RNG_SEED);
        for _ in 0..500 {
            let original = random_record(&mut rng);
            let flip = rng.random_bool(0.5);

            let mut record = original.clone();
            compress(&mut record)?;
            assert_eq!(record.cigar_bytes(), original.cigar_bytes());
            assert_eq!(record.aux(), original.aux());
            if flip {
                record.set_flag(original.flag() ^ flags::REVERSE);
            }
            decompress(&mut record, &original)?;

            assert_eq!(record.name(), original.name());
            assert_eq!(record.cigar_bytes(), original.cigar_bytes());
            assert_eq!(record.aux(), original.aux());
            if flip {
                let mut expected: Vec<u8> = original.bases();
                expected.reverse();
                let expected: Vec<u8> = expected
                    .iter()
                    .map(|&b| NT16_BASES[crate::complement::complement(
                        crate::complement::encode_base(b),
                    ) as usize])
                    .collect();
                assert_eq!(record.bases(), expected);
                let mut quals = original.qualities().to_vec();
                quals.reverse();
                assert_eq!(record.qualities(), quals.as_slice());
            } else {
                assert_eq!(record.data(), original.data());
            }
        }
        Ok(())
    }
}
