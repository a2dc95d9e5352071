//! Schema package reading
//!
//! This crate handles:
//! - Opening packages from a zip archive or an extracted directory
//! - Parsing XML into the arena tree, with namespaces resolved up front
//! - Building the typed semantic document (model.xml)

pub mod document;
pub mod error;
pub mod package;
pub mod xml;

pub use document::{build_model_document, parse_model_document, DAC_NAMESPACE};
pub use error::{PackageError, Result};
pub use package::{PackageContents, Workspace};
pub use xml::parse_xml;
