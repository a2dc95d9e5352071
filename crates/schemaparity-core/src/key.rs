//! Element identity keys

use serde::{Deserialize, Serialize};

/// Stable identity of a schema element within one document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementKey {
    /// Element carrying a name: (type, name)
    Named { element_type: String, name: String },

    /// Unnamed element identified through its relationships, e.g.
    /// `DefiningTable=[dbo].[T],ForColumn=[dbo].[T].[C]`
    Composite {
        element_type: String,
        discriminator: String,
    },

    /// Only one element of this type is expected: (type,)
    Singleton { element_type: String },
}

impl ElementKey {
    pub fn named(element_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            element_type: element_type.into(),
            name: name.into(),
        }
    }

    pub fn composite(element_type: impl Into<String>, discriminator: impl Into<String>) -> Self {
        Self::Composite {
            element_type: element_type.into(),
            discriminator: discriminator.into(),
        }
    }

    pub fn singleton(element_type: impl Into<String>) -> Self {
        Self::Singleton {
            element_type: element_type.into(),
        }
    }
}

/// Human-readable form, also used as the sort order of report listings
impl std::fmt::Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named { element_type, name } => write!(f, "{} {}", element_type, name),
            Self::Composite {
                element_type,
                discriminator,
            } => write!(f, "{} {}", element_type, discriminator),
            Self::Singleton { element_type } => write!(f, "{}", element_type),
        }
    }
}
