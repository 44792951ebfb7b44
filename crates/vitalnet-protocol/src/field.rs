//! Fixed-width field formatting.
//!
//! Every record on the link is a run of fixed-width fields. A field is
//! always exactly its declared width: longer values keep their leading
//! characters, shorter values are padded with the fill character on the
//! side opposite the justification.

use vitalnet_core::{Error, Result};

/// Which edge of the field the value is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    /// Value first, fill on the right
    Left,
    /// Fill first, value on the right
    Right,
}

/// Pack `value` into exactly `width` characters.
///
/// # Example
/// ```
/// use vitalnet_protocol::field::{Justify, pack_field};
///
/// assert_eq!(pack_field("7", 3, Justify::Right, '0'), "007");
/// assert_eq!(pack_field("AB", 4, Justify::Left, ' '), "AB  ");
/// assert_eq!(pack_field("GAINESVILLE FL", 5, Justify::Left, ' '), "GAINE");
/// ```
#[must_use]
pub fn pack_field(value: &str, width: usize, justify: Justify, fill: char) -> String {
    let kept: String = value.chars().take(width).collect();
    let padding = width - kept.chars().count();

    let mut out = String::with_capacity(width);
    match justify {
        Justify::Left => {
            out.push_str(&kept);
            out.extend(std::iter::repeat_n(fill, padding));
        }
        Justify::Right => {
            out.extend(std::iter::repeat_n(fill, padding));
            out.push_str(&kept);
        }
    }
    out
}

/// Check that a finished segment has exactly `expected` characters.
///
/// Counts characters, the same unit [`pack_field`] pads to.
///
/// # Errors
/// Returns `Error::LengthMismatch` naming `segment`.
pub fn expect_length(segment: &str, value: &str, expected: usize) -> Result<()> {
    let actual = value.chars().count();
    if actual != expected {
        return Err(Error::length_mismatch(segment, expected, actual));
    }
    Ok(())
}

/// Reject the first named value that is not US-ASCII.
///
/// # Errors
/// Returns `Error::InvalidField` naming the field.
pub fn ensure_ascii<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<()> {
    match fields.into_iter().find(|(_, value)| !value.is_ascii()) {
        Some((field, _)) => Err(Error::invalid_field(field, "must be US-ASCII")),
        None => Ok(()),
    }
}

/// Keep only ASCII letters and digits.
///
/// Used for the free-text address before it is packed into the AVS block.
#[must_use]
pub fn alphanumeric(value: &str) -> String {
    value.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Mask a card number for logs, keeping only the last four characters.
///
/// # Example
/// ```
/// use vitalnet_protocol::field::mask_card;
///
/// assert_eq!(mask_card("4111111111111111"), "************1111");
/// assert_eq!(mask_card("123"), "***");
/// ```
#[must_use]
pub fn mask_card(card: &str) -> String {
    let len = card.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let visible: String = card.chars().skip(len - 4).collect();
    format!("{}{visible}", "*".repeat(len - 4))
}
