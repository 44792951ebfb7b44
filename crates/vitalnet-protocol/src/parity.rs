//! Even-parity byte codec.
//!
//! The link transmits 7-bit ASCII with the eighth bit carrying even parity.
//! Outbound payloads pass through [`apply_even_parity`] immediately before
//! transmission; inbound payloads pass through [`strip_parity`] before any
//! parsing.
//!
//! Inbound parity is cleared, never checked: a corrupted byte surfaces later
//! as a response that matches none of the known shapes.
//!
//! # Example
//!
//! ```
//! use vitalnet_protocol::parity::{apply_even_parity, strip_parity};
//!
//! let wire = apply_even_parity(b"C");
//! assert_eq!(wire[0], 0xC3); // 'C' = 0x43 has three bits set
//! assert_eq!(strip_parity(&wire), b"C".to_vec());
//! ```

use vitalnet_core::constants::{DATA_BITS_MASK, PARITY_BIT};

/// Set or clear the parity bit of one byte so its total set-bit count is even.
#[inline]
#[must_use]
pub fn set_even_parity(byte: u8) -> u8 {
    let data = byte & DATA_BITS_MASK;
    if data.count_ones() % 2 == 1 {
        data | PARITY_BIT
    } else {
        data
    }
}

/// Apply even parity to every byte of an outbound payload.
#[must_use]
pub fn apply_even_parity(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|&b| set_even_parity(b)).collect()
}

/// Clear the parity bit of every byte of an inbound payload.
#[must_use]
pub fn strip_parity(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|&b| b & DATA_BITS_MASK).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::stx(0x02, 0x82)] // one bit
    #[case::etx(0x03, 0x03)] // two bits
    #[case::fs(0x1C, 0x9C)] // three bits
    #[case::digit_zero(b'0', b'0')] // 0x30, two bits
    #[case::letter_c(b'C', 0xC3)] // three bits
    #[case::letter_d(b'D', b'D')] // two bits
    #[case::nul(0x00, 0x00)]
    #[case::del(0x7F, 0xFF)] // seven bits
    fn test_set_even_parity(#[case] input: u8, #[case] expected: u8) {
        assert_eq!(set_even_parity(input), expected);
        assert_eq!((set_even_parity(input).count_ones()) % 2, 0);
    }

    #[test]
    fn test_parity_roundtrip_all_bytes() {
        for b in 0..=255u8 {
            let encoded = apply_even_parity(&[b]);
            assert_eq!(strip_parity(&encoded)[0], b & 0x7F, "byte {b:#04X}");
            assert_eq!(encoded[0].count_ones() % 2, 0, "byte {b:#04X}");
        }
    }

    #[test]
    fn test_high_bit_input_is_recomputed() {
        // 0x80 carries no data bits, so parity stays clear
        assert_eq!(set_even_parity(0x80), 0x00);
        assert_eq!(set_even_parity(0x81), 0x81);
    }

    #[test]
    fn test_strip_parity_is_unconditional() {
        assert_eq!(strip_parity(&[0xC3, 0x43, 0xFF]), vec![0x43, 0x43, 0x7F]);
    }

    #[test]
    fn test_empty_payload() {
        assert!(apply_even_parity(&[]).is_empty());
        assert!(strip_parity(&[]).is_empty());
    }
}
