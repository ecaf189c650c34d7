#![no_main]
use libfuzzer_sys::fuzz_target;
use parsers::parse_result_from_json;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(result) = parse_result_from_json(s) {
            for node in result.top_level() {
                let _ = result.full_name(node);
            }
        }
    }
});
