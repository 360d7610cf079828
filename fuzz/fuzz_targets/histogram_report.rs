#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }

    let max_bucket = u16::from_le_bytes([data[0], data[1]]);
    let mut scale_bytes = [0u8; 8];
    scale_bytes.copy_from_slice(&data[2..10]);
    let scale = i64::from_le_bytes(scale_bytes);

    let samples: Vec<i64> = data[10..]
        .chunks_exact(8)
        .take(256)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            i64::from_le_bytes(bytes)
        })
        .collect();

    if let Ok(report) = pacer::fuzzing::histogram_report_input(max_bucket, scale, &samples) {
        debug_assert_eq!(report.total_requests, samples.len() as u64);
        debug_assert!(report.min <= report.median);
        debug_assert!(report.median <= report.p90);
        debug_assert!(report.p99 <= report.max);
        debug_assert!(report.max <= usize::from(max_bucket));
    }
});
