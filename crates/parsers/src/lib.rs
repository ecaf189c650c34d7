//! Builds the normalized C++ graph from the front-end dump and enriches it
//! from clang's native AST.

use ir::{ClangNode, ParseResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod clang;
pub mod cxx;

pub use clang::{filter_and_flatten_nodes, FlattenNode};
pub use cxx::{link_parents, parse_result_from_json};

#[derive(Debug, Default, Serialize)]
pub struct EnrichMetrics {
    pub files_enriched: usize,
    pub records_found: usize,
    pub constructors_filled: usize,
    pub qual_types_found: usize,
}

/// Native AST of one parsed header.
#[derive(Debug, Clone)]
pub struct NativeAst {
    pub file: PathBuf,
    pub root: ClangNode,
}

impl NativeAst {
    pub fn new(file: &Path, root: ClangNode) -> Self {
        Self {
            file: file.to_path_buf(),
            root,
        }
    }

    pub fn flatten(&self) -> Vec<FlattenNode<'_>> {
        filter_and_flatten_nodes(&self.file, &self.root)
    }
}

/// Runs the constructor-initializer pass, then the qualified-type pass,
/// over `asts` in order.
pub fn enrich(
    result: &mut ParseResult,
    asts: &[NativeAst],
    metrics: Option<&mut EnrichMetrics>,
) {
    let mut records = Vec::new();
    let mut qual_types = clang::QualTypeMap::default();
    for ast in asts {
        let nodes = ast.flatten();
        debug!(file = %ast.file.display(), nodes = nodes.len(), "Native AST flattened");
        records.extend(clang::parse_struct_constructors(&nodes));
        qual_types.merge(clang::parse_qual_types(&nodes));
    }
    let constructors_filled = clang::fill_constructor_initializers(result, &records);
    let qual_types_found = clang::fill_qual_types(result, &qual_types);
    debug!(
        records = records.len(),
        constructors_filled,
        qual_types_found,
        "Enrichment applied"
    );
    if let Some(m) = metrics {
        m.files_enriched += asts.len();
        m.records_found += records.len();
        m.constructors_filled += constructors_filled;
        m.qual_types_found += qual_types_found;
    }
}
