#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Raw input: exercises header parsing and the missing-terminator path
    let _ = phixps::phi::decode(data);

    // Valid header in front of the fuzz bytes, so the binary search runs
    let mut content = b"SOFH\n\
        SpectralRegDef: 1 1 C1s 6 201 -0.1 298.0 278.0\n\
        SpectralRegDef: 2 2 O1s 6 64 -0.1 540.0 520.0\n\
        EOFH\n"
        .to_vec();
    content.extend_from_slice(data);
    if let Ok(result) = phixps::phi::decode(&content) {
        for region in &result.spectra {
            assert_eq!(region.spectrum.x.len(), region.spectrum.y.len());
            assert!(region.spectrum.y.iter().all(|v| v.is_finite()));
        }
    }
});
