//! Typed document variants, fingerprinting, and reference normalization for
//! the knowledge index. This crate has no I/O: it is the shared vocabulary
//! between the parser adapter, the indexer, and the store.

pub mod builders;
pub mod document;
pub mod fingerprint;
pub mod reference;

pub use builders::{
    asset_summary, bp_graph_summary, cpp_class, cpp_func, cpp_property, datatable,
    material_params, materialfunction_params, source_file, umg_widget_tree, AssetSummaryInput,
    BpGraphInput, BpParamDirection, BpParameter, MaterialFunctionInput, MaterialFunctionPin,
    MaterialParamsInput,
};
pub use document::{
    module_from_asset_path, module_from_source_path, DocChunk, DocKind, CURRENT_SCHEMA_VERSION,
};
pub use fingerprint::fingerprint;
pub use reference::{
    looks_already_prefixed, normalize_reference, prefix_candidates, NormalizedRef,
};
