//! SchemaParity Core
//!
//! Domain model shared by the package reader, the comparison engine and the
//! CLI: schema elements, identity keys, the XML arena tree, structured diff
//! results, diagnostics, the report and configuration.

pub mod config;
pub mod diagnostic;
pub mod diff;
pub mod element;
pub mod key;
pub mod report;
pub mod tree;

pub use config::{Config, ConfigError, ReportConfig};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use diff::{
    AnnotationCounts, DuplicateKey, ElementDiff, ElementDifference, HeaderComparison, HeaderDiff,
    MetadataChange, ModelComparison, PropertyChange, Side,
};
pub use element::{Annotation, CustomDataBlock, Entry, ModelDocument, SchemaElement, DISAMBIGUATOR};
pub use key::ElementKey;
pub use report::{ArtifactResult, ArtifactStatus, ComparisonReport, MODEL_FILE, PROVENANCE_FILE};
pub use tree::{NodeId, XmlNode, XmlTree, XmlTreeBuilder};
