use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use vitalnet_core::{Error, Result, constants::*};

/// Record terminator placed between the body and the LRC byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// ETX: closes an authorization and the settlement trailer
    EndOfText,
    /// ETB: closes intermediate settlement records
    EndOfBlock,
}

impl Terminator {
    pub fn as_byte(self) -> u8 {
        match self {
            Terminator::EndOfText => ETX,
            Terminator::EndOfBlock => ETB,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ETX => Some(Terminator::EndOfText),
            ETB => Some(Terminator::EndOfBlock),
            _ => None,
        }
    }
}

/// Longitudinal redundancy check: XOR of every byte.
///
/// # Example
/// ```
/// use vitalnet_protocol::frame::lrc;
///
/// assert_eq!(lrc(b""), 0);
/// assert_eq!(lrc(b"AB"), b'A' ^ b'B');
/// ```
pub fn lrc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Wrap a record body in STX, the terminator and the LRC trailer.
///
/// The LRC covers the body and the terminator, not the STX.
///
/// # Example
/// ```
/// use vitalnet_protocol::frame::{Terminator, frame};
///
/// let framed = frame("K1", Terminator::EndOfText);
/// assert_eq!(framed.as_bytes(), &[0x02, b'K', b'1', 0x03, b'K' ^ b'1' ^ 0x03]);
/// ```
pub fn frame(body: &str, terminator: Terminator) -> String {
    let mut out = String::with_capacity(body.len() + FRAME_OVERHEAD);
    out.push(char::from(STX));
    out.push_str(body);
    out.push(char::from(terminator.as_byte()));

    let checksum = lrc(body.as_bytes()) ^ terminator.as_byte();
    out.push(char::from(checksum));
    out
}

/// Validate a record body's exact length, then frame it.
///
/// # Errors
/// Returns `Error::LengthMismatch` naming `segment` when the body is not
/// exactly `expected` bytes long.
pub fn frame_record(
    segment: &str,
    body: &str,
    expected: usize,
    terminator: Terminator,
) -> Result<String> {
    if body.len() != expected {
        return Err(Error::length_mismatch(segment, expected, body.len()));
    }
    Ok(frame(body, terminator))
}

/// A single inbound record split into its parts.
///
/// Produced by [`Frame::parse`] from parity-stripped bytes. The received
/// LRC is kept so a caller can opt into [`Frame::verify_checksum`]; the
/// response path does not verify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    body: Bytes,
    terminator: Terminator,
    checksum: u8,
}

impl Frame {
    /// Split `STX body terminator LRC`.
    ///
    /// The first ETX or ETB after the STX ends the body; exactly one byte
    /// must follow it.
    ///
    /// # Errors
    /// Returns `Error::UnparseableResponse` if the bytes are not one
    /// complete frame.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let unparseable = || Error::UnparseableResponse {
            raw: String::from_utf8_lossy(bytes).into_owned(),
        };

        if bytes.first() != Some(&STX) {
            return Err(unparseable());
        }

        let end = bytes
            .iter()
            .skip(1)
            .position(|&b| b == ETX || b == ETB)
            .map(|p| p + 1)
            .ok_or_else(unparseable)?;

        if bytes.len() != end + 2 {
            return Err(unparseable());
        }

        let terminator = Terminator::from_byte(bytes[end]).ok_or_else(unparseable)?;

        Ok(Frame {
            body: Bytes::copy_from_slice(&bytes[1..end]),
            terminator,
            checksum: bytes[end + 1],
        })
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn terminator(&self) -> Terminator {
        self.terminator
    }

    /// LRC byte as received.
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// LRC recomputed over body and terminator.
    pub fn calculate_checksum(&self) -> u8 {
        lrc(&self.body) ^ self.terminator.as_byte()
    }

    /// Compare the received LRC against the recomputed one.
    ///
    /// # Errors
    /// Returns `Error::ChecksumMismatch` when they differ.
    pub fn verify_checksum(&self) -> Result<()> {
        let calculated = self.calculate_checksum();
        if calculated != self.checksum {
            return Err(Error::ChecksumMismatch {
                expected: calculated,
                actual: self.checksum,
            });
        }
        Ok(())
    }

    /// Re-assemble the wire bytes.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.body.len() + FRAME_OVERHEAD);
        buf.put_u8(STX);
        buf.put_slice(&self.body);
        buf.put_u8(self.terminator.as_byte());
        buf.put_u8(self.checksum);
        buf.freeze()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[size={}, terminator={:?}, lrc={:02X}, body='{}']",
            self.body.len(),
            self.terminator,
            self.checksum,
            String::from_utf8_lossy(&self.body)
        )
    }
}
