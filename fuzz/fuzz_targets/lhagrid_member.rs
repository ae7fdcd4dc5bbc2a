#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Keep inputs small; the parser is linear but the fuzzer should stay fast.
    if data.len() > 1 << 16 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(file) = gp_lhagrid::parse_member(text, Path::new("fuzz.dat")) else {
        return;
    };

    // Whatever parses must write back and parse again with the same shape.
    let mut out = Vec::new();
    let header = file.type_header();
    if gp_lhagrid::write_member(&mut out, &header, &file.blocks).is_err() {
        return;
    }
    let Ok(again) = gp_lhagrid::parse_member(
        std::str::from_utf8(&out).expect("writer emits UTF-8"),
        Path::new("fuzz.dat"),
    ) else {
        panic!("written member does not parse");
    };
    assert_eq!(again.blocks.len(), file.blocks.len());
    for (a, b) in again.blocks.iter().zip(&file.blocks) {
        assert_eq!(a.pids(), b.pids());
        assert_eq!(a.data().shape(), b.data().shape());
    }
});
