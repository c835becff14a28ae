#![no_main]

use direct2::{FrameFlags, FrameHeader, compress, compress_and_obfuscate, decompress, decompress_and_deobfuscate};
use libfuzzer_sys::fuzz_target;

/// Verifies that the decoder safely handles arbitrary, potentially malformed input.
///
/// This simulates corrupted frames, malicious payloads, or random noise.
///
/// # Invariant
/// The decoder must return either `Ok(_)` or `Err(_)`. It must **never** panic
/// or cause memory safety violations, regardless of the input data.
fn verify_decompression_robustness(data: &[u8]) {
    // Whole frames first: the header is attacker-controlled too.
    let _ = decompress_and_deobfuscate(data);

    // Then the raw token stream against an arbitrary expected size taken
    // from the input itself.
    if data.len() >= 2 {
        let actual_size = u16::from_le_bytes([data[0], data[1]]) as usize;
        let mut output = Vec::new();
        let _ = decompress(&data[2..], actual_size, &mut output);
    }
}

/// Verifies the lossless "Round-Trip" property of the codec.
///
/// # Invariant
/// `decompress(compress(data)) == data`, both for the raw token stream and
/// through the whole-frame boundary with masking applied.
///
/// # Panics
/// This function panics if the restored output does not bit-match the input,
/// or if decompression rejects a stream the encoder produced. These panics
/// signal a fuzzing failure.
fn verify_round_trip(data: &[u8]) {
    let mut compressed = Vec::new();
    compress(data, &mut compressed);

    let mut decompressed = Vec::new();
    match decompress(&compressed, data.len(), &mut decompressed) {
        Ok(()) => {
            if decompressed != data {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nCompressed len: {}\nDecompressed len: {}",
                    data.len(),
                    compressed.len(),
                    decompressed.len()
                );
            }
        }
        Err(e) => {
            panic!(
                "Round-trip failed! Decoder rejected valid compressed data.\nError: {:?}\nInput len: {}",
                e,
                data.len()
            );
        }
    }

    let mut frame = FrameHeader::new(1, FrameFlags::new()).to_bytes().to_vec();
    frame.extend_from_slice(data);

    let wire = compress_and_obfuscate(&frame, true, true).expect("payload fits a frame");
    let restored = decompress_and_deobfuscate(&wire).expect("own frame must decode");
    assert_eq!(&restored[8..], data, "frame round-trip mismatch");
}

fuzz_target!(|data: &[u8]| {
    // 1. Robustness: Ensure random noise doesn't crash the decoder.
    verify_decompression_robustness(data);

    // 2. Correctness: Ensure valid data survives a compress-decompress cycle.
    if data.len() <= u16::MAX as usize {
        verify_round_trip(data);
    }
});
