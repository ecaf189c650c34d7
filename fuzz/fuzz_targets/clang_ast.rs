#![no_main]
use ir::parse_clang_ast;
use libfuzzer_sys::fuzz_target;
use parsers::clang::{parse_qual_types, parse_struct_constructors};
use parsers::filter_and_flatten_nodes;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(root) = parse_clang_ast(s) {
            let nodes = filter_and_flatten_nodes(Path::new("fuzz.h"), &root);
            let _ = parse_struct_constructors(&nodes);
            let _ = parse_qual_types(&nodes);
        }
    }
});
