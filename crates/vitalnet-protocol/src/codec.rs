//! Tokio codec for point-to-point VitalNet links.
//!
//! The codec applies even parity on the way out and strips it on the way
//! in, so the rest of the stack only ever sees 7-bit text.
//!
//! ```text
//! String -> Encoder -> parity -> wire
//! wire -> Decoder -> strip parity -> STX ... ETX LRC -> String
//! ```
//!
//! The decoder discards noise before the first STX and yields one frame
//! once its ETX and LRC byte have both arrived. Text still buffered when
//! the peer closes the stream (a bare gateway error line, say) is yielded
//! as-is so the response parser can classify it.
//!
//! # Usage with Tokio Framed
//!
//! ```rust,no_run
//! use futures::{SinkExt, StreamExt};
//! use tokio::net::TcpStream;
//! use tokio_util::codec::Framed;
//! use vitalnet_protocol::{ResponseParser, VitalNetCodec};
//!
//! # async fn example(request: String) -> vitalnet_core::Result<()> {
//! let stream = TcpStream::connect("127.0.0.1:5000").await?;
//! let mut framed = Framed::new(stream, VitalNetCodec::new());
//!
//! framed.send(request).await?;
//! if let Some(Ok(text)) = framed.next().await {
//!     println!("{:?}", ResponseParser::parse(&text));
//! }
//! # Ok(())
//! # }
//! ```

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::parity::{apply_even_parity, strip_parity};
use vitalnet_core::{
    Error, Result,
    constants::{DATA_BITS_MASK, ETX, MAX_FRAME_SIZE, STX},
};

/// Tokio codec for parity-encoded, STX/ETX framed records.
#[derive(Debug, Clone)]
pub struct VitalNetCodec {
    /// Frames longer than this are rejected
    max_frame_size: usize,
}

impl VitalNetCodec {
    pub fn new() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Create a codec with a custom frame size limit.
    ///
    /// ```
    /// use vitalnet_protocol::VitalNetCodec;
    ///
    /// let codec = VitalNetCodec::with_max_frame_size(512);
    /// assert_eq!(codec.max_frame_size(), 512);
    /// ```
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl Default for VitalNetCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn position(src: &[u8], target: u8) -> Option<usize> {
    src.iter().position(|&b| b & DATA_BITS_MASK == target)
}

fn into_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&strip_parity(bytes)).into_owned()
}

impl Decoder for VitalNetCodec {
    type Item = String;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        let Some(start) = position(src, STX) else {
            // Keep non-frame text for decode_eof, within the limit
            if src.len() > self.max_frame_size {
                return Err(Error::FrameTooLarge {
                    size: src.len(),
                    max_size: self.max_frame_size,
                });
            }
            return Ok(None);
        };

        if start > 0 {
            src.advance(start);
        }

        // ETX plus the LRC byte after it
        match position(&src[1..], ETX).map(|p| p + 1) {
            Some(end) if end + 1 < src.len() => {
                let frame = src.split_to(end + 2);
                Ok(Some(into_text(&frame)))
            }
            Some(end) if end + 2 > self.max_frame_size => Err(Error::FrameTooLarge {
                size: end + 2,
                max_size: self.max_frame_size,
            }),
            Some(_) => Ok(None),
            None if src.len() > self.max_frame_size => Err(Error::FrameTooLarge {
                size: src.len(),
                max_size: self.max_frame_size,
            }),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if let Some(text) = self.decode(src)? {
            return Ok(Some(text));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let rest = src.split();
        Ok(Some(into_text(&rest)))
    }
}

impl Encoder<String> for VitalNetCodec {
    type Error = Error;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<()> {
        if item.len() > self.max_frame_size {
            return Err(Error::FrameTooLarge {
                size: item.len(),
                max_size: self.max_frame_size,
            });
        }

        dst.reserve(item.len());
        dst.extend_from_slice(&apply_even_parity(item.as_bytes()));
        Ok(())
    }
}
