//! Content signatures for relationship entries
//!
//! Inline elements have no identity of their own, so they are compared by a
//! recursive fingerprint of their content. Every component is sorted, which
//! makes the fingerprint independent of document order.

use schemaparity_core::{Annotation, Entry, SchemaElement};

/// Order-independent fingerprint of an inline element.
///
/// Format: `type|P:name=value...|R:rel=target...|A:type=[k=v,...]...`, each
/// group sorted. A reference target renders as `name` or `name@source`, a
/// nested inline element as `(fingerprint)`. The element's own name and
/// annotation disambiguators are not part of the fingerprint.
pub fn fingerprint(element: &SchemaElement) -> String {
    let mut parts = vec![element.element_type.clone()];

    let mut properties: Vec<String> = element
        .properties
        .iter()
        .map(|(name, value)| format!("P:{}={}", name, value))
        .collect();
    properties.sort();

    let mut relationships: Vec<String> = element
        .relationships
        .iter()
        .flat_map(|(name, entries)| {
            entries.iter().map(move |entry| {
                let target = match entry {
                    Entry::Reference {
                        target_name,
                        external_source,
                    } => reference_signature(target_name, external_source.as_deref()),
                    Entry::Inline(inner) => format!("({})", fingerprint(inner)),
                };
                format!("R:{}={}", name, target)
            })
        })
        .collect();
    relationships.sort();

    let mut annotations: Vec<String> = element
        .annotations
        .iter()
        .map(|annotation| {
            format!(
                "A:{}=[{}]",
                annotation.annotation_type,
                annotation_properties(annotation)
            )
        })
        .collect();
    annotations.sort();

    parts.extend(properties);
    parts.extend(relationships);
    parts.extend(annotations);
    parts.join("|")
}

/// Typed signature of one relationship entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntrySignature {
    /// `name` or `name@externalSource`
    Reference(String),

    /// Fingerprint of the inline element
    Inline(String),
}

/// Reduce an entry to its signature
pub fn entry_signature(entry: &Entry) -> EntrySignature {
    match entry {
        Entry::Reference {
            target_name,
            external_source,
        } => {
            EntrySignature::Reference(reference_signature(target_name, external_source.as_deref()))
        }
        Entry::Inline(inner) => EntrySignature::Inline(fingerprint(inner)),
    }
}

fn reference_signature(target_name: &str, external_source: Option<&str>) -> String {
    match external_source {
        Some(source) => format!("{}@{}", target_name, source),
        None => target_name.to_string(),
    }
}

fn annotation_properties(annotation: &Annotation) -> String {
    annotation
        .semantic_properties()
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn column(name: &str, nullable: &str) -> SchemaElement {
        SchemaElement::new("SqlSimpleColumn")
            .with_name(name)
            .with_property("IsNullable", nullable)
            .with_relationship("Type", vec![Entry::external("[int]", "BuiltIns")])
    }

    #[test]
    fn full_format() {
        let element = SchemaElement::new("SqlSimpleColumn")
            .with_property("Length", "10")
            .with_property("IsNullable", "False")
            .with_relationship(
                "TypeSpecifier",
                vec![Entry::inline(
                    SchemaElement::new("SqlTypeSpecifier")
                        .with_relationship("Type", vec![Entry::external("[nvarchar]", "BuiltIns")]),
                )],
            )
            .with_annotation(
                Annotation::new("SqlInlineConstraintAnnotation")
                    .with_property("Disambiguator", "7")
                    .with_property("Kind", "Default"),
            );

        assert_eq!(
            fingerprint(&element),
            "SqlSimpleColumn|P:IsNullable=False|P:Length=10\
             |R:TypeSpecifier=(SqlTypeSpecifier|R:Type=[nvarchar]@BuiltIns)\
             |A:SqlInlineConstraintAnnotation=[Kind=Default]"
        );
    }

    #[test]
    fn name_is_not_part_of_fingerprint() {
        assert_eq!(
            fingerprint(&column("[dbo].[T].[A]", "True")),
            fingerprint(&column("[dbo].[T].[B]", "True"))
        );
        assert_ne!(
            fingerprint(&column("[dbo].[T].[A]", "True")),
            fingerprint(&column("[dbo].[T].[A]", "False"))
        );
    }

    #[test]
    fn disambiguator_is_ignored() {
        let a = SchemaElement::new("SqlSimpleColumn")
            .with_annotation(
                Annotation::new("SqlColumnAnnotation").with_property("Disambiguator", "1"),
            );
        let b = SchemaElement::new("SqlSimpleColumn")
            .with_annotation(
                Annotation::new("SqlColumnAnnotation").with_property("Disambiguator", "42"),
            );
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn entry_order_is_irrelevant() {
        let a = SchemaElement::new("SqlIndex").with_relationship(
            "Columns",
            vec![Entry::reference("[dbo].[T].[A]"), Entry::reference("[dbo].[T].[B]")],
        );
        let b = SchemaElement::new("SqlIndex").with_relationship(
            "Columns",
            vec![Entry::reference("[dbo].[T].[B]"), Entry::reference("[dbo].[T].[A]")],
        );
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn entry_signatures() {
        assert_eq!(
            entry_signature(&Entry::reference("[dbo].[T]")),
            EntrySignature::Reference("[dbo].[T]".to_string())
        );
        assert_eq!(
            entry_signature(&Entry::external("[int]", "BuiltIns")),
            EntrySignature::Reference("[int]@BuiltIns".to_string())
        );
        assert_eq!(
            entry_signature(&Entry::inline(SchemaElement::new("SqlTypeSpecifier"))),
            EntrySignature::Inline("SqlTypeSpecifier".to_string())
        );
    }
}
