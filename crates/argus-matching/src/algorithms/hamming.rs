//! Normalized Hamming distance over perceptual hashes.

use argus_core::errors::{ArgusResult, MatchError};

/// Fraction of mismatched bits between two equal-length byte hashes.
///
/// Returns 0.0 for identical hashes and 1.0 when every bit differs.
/// Unequal lengths are an error, never a silent truncation.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> ArgusResult<f64> {
    if a.len() != b.len() {
        return Err(MatchError::HashLengthMismatch {
            left: a.len(),
            right: b.len(),
        }
        .into());
    }
    if a.is_empty() {
        return Ok(0.0);
    }
    let mismatched: u32 = a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum();
    Ok(f64::from(mismatched) / (a.len() as f64 * 8.0))
}

/// Hamming distance over 0/1 float vectors, the storage form of
/// perceptual hashes. Values above 0.5 count as set bits.
pub fn hamming_distance_bits(a: &[f32], b: &[f32]) -> ArgusResult<f64> {
    if a.len() != b.len() {
        return Err(MatchError::HashLengthMismatch {
            left: a.len(),
            right: b.len(),
        }
        .into());
    }
    if a.is_empty() {
        return Ok(0.0);
    }
    let mismatched = a
        .iter()
        .zip(b)
        .filter(|(x, y)| (**x > 0.5) != (**y > 0.5))
        .count();
    Ok(mismatched as f64 / a.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_hashes_have_zero_distance() {
        let h = [0xAB, 0xCD, 0xEF, 0x01];
        assert_eq!(hamming_distance(&h, &h).unwrap(), 0.0);
    }

    #[test]
    fn fully_flipped_hashes_have_distance_one() {
        let h = [0xF0, 0x0F, 0xAA];
        let flipped: Vec<u8> = h.iter().map(|b| !b).collect();
        assert_eq!(hamming_distance(&h, &flipped).unwrap(), 1.0);
    }

    #[test]
    fn single_bit_difference() {
        let a = [0b0000_0000];
        let b = [0b0000_0001];
        assert_eq!(hamming_distance(&a, &b).unwrap(), 1.0 / 8.0);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = hamming_distance(&[0u8; 8], &[0u8; 16]).unwrap_err();
        assert!(err.to_string().contains("8"));
        assert!(err.to_string().contains("16"));
    }

    #[test]
    fn bit_vector_distance_matches_definition() {
        let a = [1.0, 0.0, 1.0, 0.0];
        let b = [1.0, 1.0, 0.0, 0.0];
        assert_eq!(hamming_distance_bits(&a, &b).unwrap(), 0.5);
        assert_eq!(hamming_distance_bits(&a, &a).unwrap(), 0.0);
    }
}
