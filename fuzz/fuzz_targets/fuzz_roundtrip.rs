#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let Ok(decoded) = decode_bmp_with_limits(data, &limits, enough::Unstoppable) else {
        return;
    };
    let reencoded = encode_bmp(&decoded, enough::Unstoppable).expect("decoded bitmap must encode");
    let Ok(decoded2) = decode_bmp(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.width(), decoded2.width());
    assert_eq!(decoded.height(), decoded2.height());
    // Opaque 32 bpp input comes back as 24 bpp, so compare colours, not layouts
    assert_eq!(decoded.to_rgba8(), decoded2.to_rgba8(), "roundtrip pixel mismatch");
});
