//! Transport framing around the DIRECT2 codec.
//!
//! Every frame starts with a fixed 8-byte header (all fields little-endian):
//!
//! ```text
//! bytes 0-1  version      opaque, passed through unchanged
//! bytes 2-3  flags        bit0 COMPRESSED, bit1 XOR_MAGIC, bit2 LAST
//! bytes 4-5  size         length of the payload that follows
//! bytes 6-7  size_actual  uncompressed length, meaningful when compressed
//! ```
//!
//! The payload is a DIRECT2 token stream when COMPRESSED is set and the raw
//! bytes otherwise; XOR_MAGIC marks a payload that has additionally been
//! XOR-masked. Transport framing beyond these 8 bytes is the caller's
//! concern.

use alloc::vec::Vec;

use crate::compress::compress;
use crate::decompress::decompress;
use crate::error::{CompressionError, DecompressionError};

/// Size of the fixed frame header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Flag bits carried in the 16-bit `flags` field of a [`FrameHeader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFlags(u16);

impl FrameFlags {
    /// Payload is a DIRECT2 token stream.
    pub const COMPRESSED: u16 = 1 << 0;
    /// Payload bytes are XOR-masked.
    pub const XOR_MAGIC: u16 = 1 << 1;
    /// Frame is the last of its sequence.
    pub const LAST: u16 = 1 << 2;

    /// Creates an empty flag set.
    pub fn new() -> Self {
        Self(0)
    }

    /// Creates a flag set from raw bits. Reserved bits are preserved.
    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Sets a flag.
    pub fn set(&mut self, flag: u16) {
        self.0 |= flag;
    }

    /// Clears a flag.
    pub fn clear(&mut self, flag: u16) {
        self.0 &= !flag;
    }

    /// Checks whether a flag is set.
    pub fn has(&self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    /// Checks the COMPRESSED flag.
    pub fn is_compressed(&self) -> bool {
        self.has(Self::COMPRESSED)
    }

    /// Checks the XOR_MAGIC flag.
    pub fn is_obfuscated(&self) -> bool {
        self.has(Self::XOR_MAGIC)
    }

    /// Checks the LAST flag.
    pub fn is_last(&self) -> bool {
        self.has(Self::LAST)
    }
}

/// Fixed 8-byte header prefixed to every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u16,
    pub flags: FrameFlags,
    /// Length of the payload that follows the header: the compressed
    /// length when COMPRESSED is set, the actual length otherwise.
    pub size: u16,
    /// Uncompressed payload length; equals `size` when not compressed.
    pub size_actual: u16,
}

impl FrameHeader {
    /// Creates a header with zeroed size fields; `compress_payload` fills
    /// them in.
    pub fn new(version: u16, flags: FrameFlags) -> Self {
        Self {
            version,
            flags,
            size: 0,
            size_actual: 0,
        }
    }

    /// Encodes the header as 8 little-endian bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..2].copy_from_slice(&self.version.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.flags.bits().to_le_bytes());
        bytes[4..6].copy_from_slice(&self.size.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.size_actual.to_le_bytes());
        bytes
    }

    /// Decodes a header from the first 8 bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecompressionError> {
        if bytes.len() < HEADER_SIZE {
            return Err(DecompressionError::HeaderTooShort(bytes.len()));
        }
        Ok(Self {
            version: u16::from_le_bytes([bytes[0], bytes[1]]),
            flags: FrameFlags::from_bits(u16::from_le_bytes([bytes[2], bytes[3]])),
            size: u16::from_le_bytes([bytes[4], bytes[5]]),
            size_actual: u16::from_le_bytes([bytes[6], bytes[7]]),
        })
    }
}

/// Compresses a frame payload, falling back to the raw bytes whenever the
/// token stream would not be smaller.
///
/// On success the returned header carries the final COMPRESSED flag and
/// both size fields; the returned vector is the wire payload. The fallback
/// guarantees compression never inflates the wire size.
///
/// # Errors
/// [`CompressionError::PayloadTooLarge`] when the payload length does not
/// fit the 16-bit size fields.
pub fn compress_payload(
    header: FrameHeader,
    payload: &[u8],
) -> Result<(FrameHeader, Vec<u8>), CompressionError> {
    if payload.len() > u16::MAX as usize {
        return Err(CompressionError::PayloadTooLarge(payload.len()));
    }

    let mut header = header;
    let mut encoded = Vec::with_capacity(payload.len());
    compress(payload, &mut encoded);

    if encoded.len() < payload.len() {
        header.flags.set(FrameFlags::COMPRESSED);
        header.size = encoded.len() as u16;
        header.size_actual = payload.len() as u16;
        Ok((header, encoded))
    } else {
        header.flags.clear(FrameFlags::COMPRESSED);
        header.size = payload.len() as u16;
        header.size_actual = payload.len() as u16;
        Ok((header, payload.to_vec()))
    }
}

/// Reverses [`compress_payload`].
///
/// A frame without COMPRESSED passes through unchanged. Otherwise the token
/// stream is decoded against `size_actual`, COMPRESSED is cleared and
/// `size` is rewritten to the now-uncompressed length.
///
/// # Errors
/// Any [`DecompressionError`] from the DIRECT2 decoder.
pub fn decompress_payload(
    header: FrameHeader,
    payload: &[u8],
) -> Result<(FrameHeader, Vec<u8>), DecompressionError> {
    let mut header = header;
    if !header.flags.is_compressed() {
        return Ok((header, payload.to_vec()));
    }

    let actual_size = header.size_actual as usize;
    let mut output = Vec::with_capacity(actual_size);
    decompress(payload, actual_size, &mut output)?;

    header.flags.clear(FrameFlags::COMPRESSED);
    header.size = header.size_actual;
    Ok((header, output))
}

/// Prepares a whole frame (header + payload) for the wire.
///
/// The buffer must already start with an 8-byte header; its version, LAST
/// and reserved flag bits pass through unchanged. Compression runs first
/// and masking second, each rewriting the relevant header fields.
///
/// # Errors
/// [`CompressionError::HeaderTooShort`] when the buffer cannot hold a
/// header, [`CompressionError::PayloadTooLarge`] when the payload exceeds
/// the 16-bit size fields.
pub fn compress_and_obfuscate(
    buffer: &[u8],
    compress: bool,
    obfuscate: bool,
) -> Result<Vec<u8>, CompressionError> {
    let header = FrameHeader::from_bytes(buffer)
        .map_err(|_| CompressionError::HeaderTooShort(buffer.len()))?;
    let payload = &buffer[HEADER_SIZE..];

    let (mut header, mut body) = if compress {
        compress_payload(header, payload)?
    } else {
        if payload.len() > u16::MAX as usize {
            return Err(CompressionError::PayloadTooLarge(payload.len()));
        }
        let mut header = header;
        header.flags.clear(FrameFlags::COMPRESSED);
        header.size = payload.len() as u16;
        header.size_actual = payload.len() as u16;
        (header, payload.to_vec())
    };

    if obfuscate {
        crate::obfuscate::obfuscate(&mut body);
        header.flags.set(FrameFlags::XOR_MAGIC);
    }

    let mut frame = Vec::with_capacity(HEADER_SIZE + body.len());
    frame.extend_from_slice(&header.to_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Reverses [`compress_and_obfuscate`], driven by the header flags.
///
/// Masking is removed before decompression, mirroring the send order. The
/// returned frame carries the restored payload with COMPRESSED and
/// XOR_MAGIC cleared and `size` equal to `size_actual`.
///
/// # Errors
/// [`DecompressionError::HeaderTooShort`] for sub-header buffers, plus any
/// DIRECT2 decoder failure.
pub fn decompress_and_deobfuscate(buffer: &[u8]) -> Result<Vec<u8>, DecompressionError> {
    let mut header = FrameHeader::from_bytes(buffer)?;
    let mut body = buffer[HEADER_SIZE..].to_vec();

    if header.flags.is_obfuscated() {
        crate::obfuscate::obfuscate(&mut body);
        header.flags.clear(FrameFlags::XOR_MAGIC);
    }

    let (header, payload) = decompress_payload(header, &body)?;

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
    frame.extend_from_slice(&header.to_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{FrameFlags, FrameHeader, HEADER_SIZE, compress_payload};
    use crate::error::{CompressionError, DecompressionError};

    #[test]
    fn header_round_trip() {
        let mut flags = FrameFlags::new();
        flags.set(FrameFlags::COMPRESSED);
        flags.set(FrameFlags::LAST);

        let header = FrameHeader {
            version: 0x1234,
            flags,
            size: 42,
            size_actual: 100,
        };

        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[0..2], &[0x34, 0x12]);
        assert_eq!(&bytes[2..4], &[0x05, 0x00]);

        let decoded = FrameHeader::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, header);
        assert!(decoded.flags.is_compressed());
        assert!(decoded.flags.is_last());
        assert!(!decoded.flags.is_obfuscated());
    }

    #[test]
    fn header_rejects_short_buffer() {
        assert_eq!(
            FrameHeader::from_bytes(&[0u8; 7]),
            Err(DecompressionError::HeaderTooShort(7))
        );
    }

    #[test]
    fn flags_preserve_reserved_bits() {
        let mut flags = FrameFlags::from_bits(0xFF00);
        flags.set(FrameFlags::COMPRESSED);
        flags.clear(FrameFlags::COMPRESSED);
        assert_eq!(flags.bits(), 0xFF00);
    }

    #[test]
    fn incompressible_payload_falls_back_to_raw() {
        let payload: alloc::vec::Vec<u8> = (0..32).collect();
        let (header, body) =
            compress_payload(FrameHeader::new(1, FrameFlags::new()), &payload).unwrap();

        assert!(!header.flags.is_compressed());
        assert_eq!(header.size, 32);
        assert_eq!(header.size_actual, 32);
        assert_eq!(body, payload);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; u16::MAX as usize + 1];
        assert_eq!(
            compress_payload(FrameHeader::new(1, FrameFlags::new()), &payload),
            Err(CompressionError::PayloadTooLarge(payload.len()))
        );
    }
}
