//! Structured comparison results
//!
//! Differs produce these values; the report turns them into text. The
//! candidate is always the first input and the baseline the second.

use crate::key::ElementKey;
use serde::{Deserialize, Serialize};

/// Which input a finding refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The package under test
    Candidate,

    /// The reference package
    Baseline,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Candidate => write!(f, "candidate"),
            Self::Baseline => write!(f, "baseline"),
        }
    }
}

/// How a single property differs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum PropertyChange {
    MissingInBaseline { candidate: String },
    MissingInCandidate { baseline: String },
    Changed { candidate: String, baseline: String },
}

/// Cardinalities of one annotation type on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationCounts {
    pub candidate: usize,
    pub baseline: usize,
}

/// One difference between two elements that share a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementDiff {
    /// A property is absent on one side or has different values
    Property { name: String, change: PropertyChange },

    /// A relationship exists on one side only
    RelationshipMissing {
        name: String,
        missing_in: Side,
        /// Entry count on the side that has it
        present_count: usize,
    },

    /// A relationship exists on both sides with different entry sets
    RelationshipEntries {
        name: String,
        only_in_candidate: usize,
        only_in_baseline: usize,
    },

    /// Annotations of one type differ
    Annotation {
        annotation_type: String,
        /// Present when the number of annotations of this type differs
        counts: Option<AnnotationCounts>,
    },
}

impl std::fmt::Display for ElementDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property { name, change } => match change {
                PropertyChange::MissingInBaseline { candidate } => write!(
                    f,
                    "Property \"{}\": missing in baseline, candidate=\"{}\"",
                    name, candidate
                ),
                PropertyChange::MissingInCandidate { baseline } => write!(
                    f,
                    "Property \"{}\": baseline=\"{}\", missing in candidate",
                    name, baseline
                ),
                PropertyChange::Changed {
                    candidate,
                    baseline,
                } => write!(
                    f,
                    "Property \"{}\": baseline=\"{}\", candidate=\"{}\"",
                    name, baseline, candidate
                ),
            },
            Self::RelationshipMissing {
                name,
                missing_in,
                present_count,
            } => match missing_in {
                Side::Baseline => write!(
                    f,
                    "Relationship \"{}\": missing in baseline, candidate has {} entries",
                    name, present_count
                ),
                Side::Candidate => write!(
                    f,
                    "Relationship \"{}\": baseline has {} entries, missing in candidate",
                    name, present_count
                ),
            },
            Self::RelationshipEntries {
                name,
                only_in_candidate,
                only_in_baseline,
            } => write!(
                f,
                "Relationship \"{}\": {} only in baseline, {} only in candidate",
                name, only_in_baseline, only_in_candidate
            ),
            Self::Annotation {
                annotation_type,
                counts,
            } => {
                write!(f, "Annotation \"{}\": differs", annotation_type)?;
                if let Some(counts) = counts {
                    write!(f, " (candidate={}, baseline={})", counts.candidate, counts.baseline)?;
                }
                Ok(())
            }
        }
    }
}

/// All differences found for one element key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDifference {
    pub key: ElementKey,
    pub diffs: Vec<ElementDiff>,
}

/// A key that resolved more than once within one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub side: Side,
    pub key: ElementKey,
}

/// Result of comparing the element lists of two models
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// Distinct keys in the candidate model
    pub total_candidate: usize,

    /// Distinct keys in the baseline model
    pub total_baseline: usize,

    /// Keys only the baseline has, sorted by display form
    pub missing_in_candidate: Vec<ElementKey>,

    /// Keys only the candidate has, sorted by display form
    pub extra_in_candidate: Vec<ElementKey>,

    /// Common keys whose elements differ, sorted by display form
    pub differences: Vec<ElementDifference>,

    /// Key collisions observed while indexing
    pub duplicates: Vec<DuplicateKey>,
}

impl ModelComparison {
    pub fn has_differences(&self) -> bool {
        !self.missing_in_candidate.is_empty()
            || !self.extra_in_candidate.is_empty()
            || !self.differences.is_empty()
    }
}

/// One metadata entry that differs inside a header block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataChange {
    pub name: String,
    pub candidate: Option<String>,
    pub baseline: Option<String>,
}

/// A difference between header metadata blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderDiff {
    /// The block exists on one side only
    BlockMissing {
        category: String,
        block_type: String,
        missing_in: Side,
    },

    /// The block exists on both sides with different metadata
    BlockChanged {
        category: String,
        block_type: String,
        changes: Vec<MetadataChange>,
    },
}

impl HeaderDiff {
    /// `CustomData(category)` or `CustomData(category, type)`
    pub fn label(&self) -> String {
        let (category, block_type) = match self {
            Self::BlockMissing {
                category,
                block_type,
                ..
            }
            | Self::BlockChanged {
                category,
                block_type,
                ..
            } => (category, block_type),
        };

        if block_type.is_empty() {
            format!("CustomData({})", category)
        } else {
            format!("CustomData({}, {})", category, block_type)
        }
    }

    /// Report lines for this difference
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::BlockMissing { missing_in, .. } => {
                vec![format!("  {}: missing in {}", self.label(), missing_in)]
            }
            Self::BlockChanged { changes, .. } => {
                let mut lines = vec![format!("  {}:", self.label())];
                for change in changes {
                    lines.push(format!(
                        "    {}: baseline=\"{}\", candidate=\"{}\"",
                        change.name,
                        change.baseline.as_deref().unwrap_or(""),
                        change.candidate.as_deref().unwrap_or("")
                    ));
                }
                lines
            }
        }
    }
}

/// Result of comparing the document headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderComparison {
    pub diffs: Vec<HeaderDiff>,
}

impl HeaderComparison {
    pub fn is_identical(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.diffs.iter().flat_map(|d| d.lines()).collect()
    }
}
