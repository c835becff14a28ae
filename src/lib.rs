//! # DIRECT2 payload compression
//!
//! `direct2` is a safe, pure-Rust implementation of the LZ77 compression
//! codec with DIRECT2 metadata encoding used to shrink RPC request and
//! response bodies before transport. Payloads travel behind a fixed 8-byte
//! header carrying the compression, masking and sequencing flags together
//! with the compressed and actual sizes.
//!
//! ## Example
//!
//! ```rust
//! extern crate alloc;
//! use direct2::{FrameFlags, FrameHeader, compress_payload, decompress_payload};
//!
//! let payload = b"abcabcabcabcabcabc";
//!
//! let header = FrameHeader::new(0x0001, FrameFlags::new());
//! let (header, wire) = compress_payload(header, payload).expect("payload fits a frame");
//! assert!(header.flags.is_compressed());
//! assert!(wire.len() < payload.len());
//!
//! let (header, restored) = decompress_payload(header, &wire).expect("stream is intact");
//! assert!(!header.flags.is_compressed());
//! assert_eq!(restored, payload);
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compress;
pub mod decompress;
pub mod error;
pub mod frame;
pub mod obfuscate;

pub use compress::compress;
pub use decompress::decompress;
pub use error::{CompressionError, DecompressionError};
pub use frame::{
    FrameFlags, FrameHeader, HEADER_SIZE, compress_and_obfuscate, compress_payload,
    decompress_and_deobfuscate, decompress_payload,
};
pub use obfuscate::{XOR_MASK, obfuscate};
