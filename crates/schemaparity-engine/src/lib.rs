//! SchemaParity engine - Semantic comparison of schema packages
//!
//! This crate implements the comparison logic:
//! - Canonical comparison of simple XML documents
//! - Identity resolution and content fingerprints for schema elements
//! - Element, model and header diffs of the semantic document
//! - Line diffs of script files
//! - Whole-package comparison producing the report

pub mod canonical;
pub mod element_diff;
pub mod fingerprint;
pub mod header_diff;
pub mod identity;
pub mod model_diff;
pub mod package_diff;
pub mod text_diff;

pub use canonical::{canonical, compare_simple_xml, flatten};
pub use element_diff::diff_elements;
pub use fingerprint::{entry_signature, fingerprint, EntrySignature};
pub use header_diff::diff_headers;
pub use identity::element_key;
pub use model_diff::diff_models;
pub use package_diff::PackageComparison;
pub use text_diff::compare_text;
