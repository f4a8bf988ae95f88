#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic, whatever the input
    let _ = zenbmp::probe_bmp(data);

    // Cap allocations so huge declared dimensions fail fast instead of OOM
    let limits = zenbmp::Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };
    let _ = zenbmp::decode_bmp_with_limits(data, &limits, enough::Unstoppable);
});
