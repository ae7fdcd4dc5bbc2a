#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1 << 16 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(info) = gp_lhagrid::Info::parse(text) else {
        return;
    };
    let _ = info.num_members();
    let _ = info.flavors();
    let _ = info.to_lhapdf_string();
});
