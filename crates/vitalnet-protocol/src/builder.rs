use crate::field::{Justify, expect_length, pack_field};
use crate::frame::{Terminator, frame};
use vitalnet_core::{Result, constants::FS};

/// Builder for one fixed-width record body with a fluent API
///
/// Consumed by value at every step, so a half-built record can never be
/// shared between two requests.
///
/// # Example
/// ```
/// use vitalnet_protocol::RecordBuilder;
///
/// let body = RecordBuilder::new()
///     .text("K1.ZT@@@@")
///     .right_zero("7", 3)
///     .left("AB", 4)
///     .build_exact("Trailer", 16)
///     .unwrap();
///
/// assert_eq!(body, "K1.ZT@@@@007AB  ");
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    body: String,
}

impl RecordBuilder {
    pub fn new() -> Self {
        RecordBuilder::default()
    }

    /// Append a literal as-is
    pub fn text(mut self, value: &str) -> Self {
        self.body.push_str(value);
        self
    }

    /// Append a single character
    pub fn char(mut self, value: char) -> Self {
        self.body.push(value);
        self
    }

    /// Append a left-justified, space-filled field
    pub fn left(self, value: &str, width: usize) -> Self {
        self.field(value, width, Justify::Left, ' ')
    }

    /// Append a right-justified, zero-filled field
    pub fn right_zero(self, value: &str, width: usize) -> Self {
        self.field(value, width, Justify::Right, '0')
    }

    /// Append a field with explicit justification and fill
    pub fn field(mut self, value: &str, width: usize, justify: Justify, fill: char) -> Self {
        self.body.push_str(&pack_field(value, width, justify, fill));
        self
    }

    /// Append a field separator
    pub fn separator(mut self) -> Self {
        self.body.push(char::from(FS));
        self
    }

    /// Append `count` field separators
    pub fn separators(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.body.push(char::from(FS));
        }
        self
    }

    /// Current body length in characters
    pub fn len(&self) -> usize {
        self.body.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Finish without a length check
    pub fn build(self) -> String {
        self.body
    }

    /// Finish, requiring the body to be exactly `expected` characters
    ///
    /// # Errors
    /// Returns `Error::LengthMismatch` naming `segment`.
    pub fn build_exact(self, segment: &str, expected: usize) -> Result<String> {
        expect_length(segment, &self.body, expected)?;
        Ok(self.body)
    }

    /// Finish with a length check and wrap the body in its frame
    ///
    /// # Errors
    /// Returns `Error::LengthMismatch` naming `segment`.
    pub fn build_framed(
        self,
        segment: &str,
        expected: usize,
        terminator: Terminator,
    ) -> Result<String> {
        let body = self.build_exact(segment, expected)?;
        Ok(frame(&body, terminator))
    }
}
