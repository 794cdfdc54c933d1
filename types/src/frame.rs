//! Length-prefixed framing over a byte stream.
//!
//! A frame is an 8-byte big-endian length followed by exactly that many payload
//! bytes. Reads loop until the full header and body have arrived, because a
//! single read may return fewer bytes than requested. A stream that closes
//! before the declared length is reached is a [`WireError::TruncatedFrame`];
//! a short buffer is never handed to the payload decoder.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::message::WireMessage;
use crate::WireError;

/// Size of the length prefix.
pub const HEADER_LEN: usize = 8;

/// Default upper bound on a frame body (1 GiB).
pub const DEFAULT_MAX_FRAME_LEN: u64 = 1 << 30;

/// Encodes and decodes framed [`WireMessage`]s.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_frame_len: u64,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCodec {
    pub fn new() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }

    pub fn with_max_frame_len(mut self, max_frame_len: u64) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// Serializes `message` into a complete frame, header included.
    pub fn encode<M: WireMessage>(&self, message: &M) -> Result<Vec<u8>, WireError> {
        let payload = message.encode_payload();
        let len = payload.len() as u64;
        self.check_len(len)?;

        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Writes `message` as one frame and flushes the stream.
    pub async fn write<W, M>(&self, io: &mut W, message: &M) -> Result<(), WireError>
    where
        W: AsyncWrite + Unpin,
        M: WireMessage,
    {
        let frame = self.encode(message)?;
        io.write_all(&frame).await?;
        io.flush().await?;
        tracing::trace!(bytes = frame.len(), "frame sent");
        Ok(())
    }

    /// Reads exactly one frame and decodes its payload.
    pub async fn read<R, M>(&self, io: &mut R) -> Result<M, WireError>
    where
        R: AsyncRead + Unpin,
        M: WireMessage,
    {
        let body = self.read_frame(io).await?;
        M::decode_payload(&body)
    }

    /// Reads exactly one frame and returns its raw body.
    pub async fn read_frame<R>(&self, io: &mut R) -> Result<Vec<u8>, WireError>
    where
        R: AsyncRead + Unpin,
    {
        let mut header = [0u8; HEADER_LEN];
        read_full(io, &mut header).await?;

        let len = u64::from_be_bytes(header);
        self.check_len(len)?;
        let len = usize::try_from(len).map_err(|_| WireError::FrameTooLarge {
            len,
            limit: self.max_frame_len,
        })?;

        let mut body = vec![0u8; len];
        read_full(io, &mut body).await?;
        tracing::trace!(bytes = HEADER_LEN + len, "frame received");
        Ok(body)
    }

    fn check_len(&self, len: u64) -> Result<(), WireError> {
        if len > self.max_frame_len {
            return Err(WireError::FrameTooLarge {
                len,
                limit: self.max_frame_len,
            });
        }
        Ok(())
    }
}

/// Fills `buf` completely, or fails with `TruncatedFrame` if the stream ends first.
async fn read_full<R>(io: &mut R, buf: &mut [u8]) -> Result<(), WireError>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = io.read(&mut buf[filled..]).await?;
        if n == 0 {
            return Err(WireError::TruncatedFrame {
                expected: buf.len(),
                received: filled,
            });
        }
        filled += n;
    }
    Ok(())
}
