//! Field-level diff of two elements that share an identity key

use crate::fingerprint::{entry_signature, EntrySignature};
use schemaparity_core::{AnnotationCounts, ElementDiff, PropertyChange, SchemaElement, Side};
use std::collections::{BTreeSet, HashSet};

/// Annotation reduced to its comparable content: type plus sorted properties
type AnnotationSignature<'a> = (&'a str, Vec<(&'a str, &'a str)>);

/// Diff `candidate` against `baseline`: properties, then relationships, then annotations
pub fn diff_elements(candidate: &SchemaElement, baseline: &SchemaElement) -> Vec<ElementDiff> {
    let mut diffs = Vec::new();
    diff_properties(candidate, baseline, &mut diffs);
    diff_relationships(candidate, baseline, &mut diffs);
    diff_annotations(candidate, baseline, &mut diffs);
    diffs
}

fn diff_properties(
    candidate: &SchemaElement,
    baseline: &SchemaElement,
    diffs: &mut Vec<ElementDiff>,
) {
    let names: BTreeSet<&String> = candidate
        .properties
        .keys()
        .chain(baseline.properties.keys())
        .collect();

    for name in names {
        let change = match (candidate.properties.get(name), baseline.properties.get(name)) {
            (Some(c), None) => PropertyChange::MissingInBaseline { candidate: c.clone() },
            (None, Some(b)) => PropertyChange::MissingInCandidate { baseline: b.clone() },
            (Some(c), Some(b)) if c != b => PropertyChange::Changed {
                candidate: c.clone(),
                baseline: b.clone(),
            },
            _ => continue,
        };

        diffs.push(ElementDiff::Property {
            name: name.clone(),
            change,
        });
    }
}

fn diff_relationships(
    candidate: &SchemaElement,
    baseline: &SchemaElement,
    diffs: &mut Vec<ElementDiff>,
) {
    let names: BTreeSet<&String> = candidate
        .relationships
        .keys()
        .chain(baseline.relationships.keys())
        .collect();

    for name in names {
        match (candidate.relationships.get(name), baseline.relationships.get(name)) {
            (Some(entries), None) => diffs.push(ElementDiff::RelationshipMissing {
                name: name.clone(),
                missing_in: Side::Baseline,
                present_count: entries.len(),
            }),
            (None, Some(entries)) => diffs.push(ElementDiff::RelationshipMissing {
                name: name.clone(),
                missing_in: Side::Candidate,
                present_count: entries.len(),
            }),
            (Some(c), Some(b)) => {
                let c: Vec<EntrySignature> = c.iter().map(entry_signature).collect();
                let b: Vec<EntrySignature> = b.iter().map(entry_signature).collect();
                if c == b {
                    continue;
                }

                // Compared as sets: reordering and duplicate entries are not differences
                let c: HashSet<EntrySignature> = c.into_iter().collect();
                let b: HashSet<EntrySignature> = b.into_iter().collect();
                let only_in_candidate = c.difference(&b).count();
                let only_in_baseline = b.difference(&c).count();

                if only_in_candidate > 0 || only_in_baseline > 0 {
                    diffs.push(ElementDiff::RelationshipEntries {
                        name: name.clone(),
                        only_in_candidate,
                        only_in_baseline,
                    });
                }
            }
            (None, None) => {}
        }
    }
}

fn annotation_signatures(element: &SchemaElement) -> Vec<AnnotationSignature<'_>> {
    let mut signatures: Vec<AnnotationSignature<'_>> = element
        .annotations
        .iter()
        .map(|a| (a.annotation_type.as_str(), a.semantic_properties()))
        .collect();
    signatures.sort();
    signatures
}

fn diff_annotations(
    candidate: &SchemaElement,
    baseline: &SchemaElement,
    diffs: &mut Vec<ElementDiff>,
) {
    let c = annotation_signatures(candidate);
    let b = annotation_signatures(baseline);
    if c == b {
        return;
    }

    let types: BTreeSet<&str> = c.iter().chain(b.iter()).map(|(t, _)| *t).collect();
    for annotation_type in types {
        let of_type_c: Vec<&AnnotationSignature<'_>> =
            c.iter().filter(|(t, _)| *t == annotation_type).collect();
        let of_type_b: Vec<&AnnotationSignature<'_>> =
            b.iter().filter(|(t, _)| *t == annotation_type).collect();
        if of_type_c == of_type_b {
            continue;
        }

        let counts = (of_type_c.len() != of_type_b.len()).then_some(AnnotationCounts {
            candidate: of_type_c.len(),
            baseline: of_type_b.len(),
        });

        diffs.push(ElementDiff::Annotation {
            annotation_type: annotation_type.to_string(),
            counts,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemaparity_core::{Annotation, Entry};

    fn table() -> SchemaElement {
        SchemaElement::new("Table").with_name("dbo.Foo")
    }

    #[test]
    fn identical_elements_have_no_diffs() {
        let element = table()
            .with_property("IsAnsiNullsOn", "True")
            .with_relationship("Schema", vec![Entry::external("[dbo]", "BuiltIns")])
            .with_annotation(
                Annotation::new("SqlTableAnnotation").with_property("Disambiguator", "1"),
            );
        assert!(diff_elements(&element, &element).is_empty());
    }

    #[test]
    fn property_only_in_candidate() {
        let candidate = table().with_property("IsMemoryOptimized", "True");
        let baseline = table();

        let diffs = diff_elements(&candidate, &baseline);
        assert_eq!(
            diffs,
            vec![ElementDiff::Property {
                name: "IsMemoryOptimized".to_string(),
                change: PropertyChange::MissingInBaseline {
                    candidate: "True".to_string()
                },
            }]
        );
        assert_eq!(
            diffs[0].to_string(),
            "Property \"IsMemoryOptimized\": missing in baseline, candidate=\"True\""
        );
    }

    #[test]
    fn property_changes_in_name_order() {
        let candidate = table().with_property("B", "1").with_property("A", "x");
        let baseline = table().with_property("B", "2").with_property("C", "y");

        assert_eq!(
            diff_elements(&candidate, &baseline),
            vec![
                ElementDiff::Property {
                    name: "A".to_string(),
                    change: PropertyChange::MissingInBaseline { candidate: "x".to_string() },
                },
                ElementDiff::Property {
                    name: "B".to_string(),
                    change: PropertyChange::Changed {
                        candidate: "1".to_string(),
                        baseline: "2".to_string()
                    },
                },
                ElementDiff::Property {
                    name: "C".to_string(),
                    change: PropertyChange::MissingInCandidate { baseline: "y".to_string() },
                },
            ]
        );
    }

    #[test]
    fn relationship_missing_on_one_side() {
        let candidate = table().with_relationship(
            "Columns",
            vec![Entry::reference("a"), Entry::reference("b")],
        );
        let baseline = table();

        assert_eq!(
            diff_elements(&candidate, &baseline),
            vec![ElementDiff::RelationshipMissing {
                name: "Columns".to_string(),
                missing_in: Side::Baseline,
                present_count: 2,
            }]
        );
        assert_eq!(
            diff_elements(&baseline, &candidate)[0].to_string(),
            "Relationship \"Columns\": baseline has 2 entries, missing in candidate"
        );
    }

    #[test]
    fn relationship_entries_differ() {
        // Inline entries compare by content; the third candidate column duplicates the first
        let col = |name: &str, length: &str| {
            Entry::inline(
                SchemaElement::new("SqlSimpleColumn")
                    .with_name(name)
                    .with_property("Length", length),
            )
        };
        let candidate = table().with_relationship(
            "Columns",
            vec![col("Id", "4"), col("Name", "50"), col("Code", "4")],
        );
        let baseline =
            table().with_relationship("Columns", vec![col("Id", "4"), col("Name", "100")]);

        let diffs = diff_elements(&candidate, &baseline);
        assert_eq!(
            diffs,
            vec![ElementDiff::RelationshipEntries {
                name: "Columns".to_string(),
                only_in_candidate: 1,
                only_in_baseline: 1,
            }]
        );
        assert_eq!(
            diffs[0].to_string(),
            "Relationship \"Columns\": 1 only in baseline, 1 only in candidate"
        );
    }

    #[test]
    fn relationship_reordering_is_not_a_difference() {
        let candidate = table()
            .with_relationship("Columns", vec![Entry::reference("a"), Entry::reference("b")]);
        let baseline = table()
            .with_relationship("Columns", vec![Entry::reference("b"), Entry::reference("a")]);
        assert!(diff_elements(&candidate, &baseline).is_empty());
    }

    #[test]
    fn relationship_multiplicity_collapses() {
        let candidate = table()
            .with_relationship("Columns", vec![Entry::reference("a"), Entry::reference("a")]);
        let baseline = table().with_relationship("Columns", vec![Entry::reference("a")]);
        assert!(diff_elements(&candidate, &baseline).is_empty());
    }

    #[test]
    fn external_source_is_part_of_the_entry() {
        let candidate =
            table().with_relationship("Schema", vec![Entry::external("[dbo]", "BuiltIns")]);
        let baseline = table().with_relationship("Schema", vec![Entry::reference("[dbo]")]);
        assert_eq!(diff_elements(&candidate, &baseline).len(), 1);
    }

    #[test]
    fn disambiguator_never_causes_a_diff() {
        let candidate = table().with_annotation(
            Annotation::new("SqlInlineConstraintAnnotation")
                .with_property("Disambiguator", "3")
                .with_property("Kind", "Default"),
        );
        let baseline = table().with_annotation(
            Annotation::new("SqlInlineConstraintAnnotation")
                .with_property("Disambiguator", "99")
                .with_property("Kind", "Default"),
        );
        assert!(diff_elements(&candidate, &baseline).is_empty());
    }

    #[test]
    fn annotation_content_differs() {
        let candidate = table().with_annotation(Annotation::new("A").with_property("Kind", "1"));
        let baseline = table().with_annotation(Annotation::new("A").with_property("Kind", "2"));
        assert_eq!(
            diff_elements(&candidate, &baseline),
            vec![ElementDiff::Annotation {
                annotation_type: "A".to_string(),
                counts: None,
            }]
        );
    }

    #[test]
    fn annotation_count_differs() {
        let candidate = table()
            .with_annotation(Annotation::new("A").with_property("Disambiguator", "1"))
            .with_annotation(Annotation::new("B"));
        let baseline = table()
            .with_annotation(Annotation::new("A").with_property("Disambiguator", "1"))
            .with_annotation(Annotation::new("A").with_property("Disambiguator", "2"))
            .with_annotation(Annotation::new("B"));

        let diffs = diff_elements(&candidate, &baseline);
        assert_eq!(
            diffs,
            vec![ElementDiff::Annotation {
                annotation_type: "A".to_string(),
                counts: Some(AnnotationCounts { candidate: 1, baseline: 2 }),
            }]
        );
        assert_eq!(diffs[0].to_string(), "Annotation \"A\": differs (candidate=1, baseline=2)");
    }

    #[test]
    fn phases_are_ordered() {
        let candidate = table()
            .with_property("P", "1")
            .with_relationship("R", vec![Entry::reference("x")])
            .with_annotation(Annotation::new("A"));
        let baseline = SchemaElement::new("Table").with_name("dbo.Foo");

        let kinds: Vec<&str> = diff_elements(&candidate, &baseline)
            .iter()
            .map(|d| match d {
                ElementDiff::Property { .. } => "property",
                ElementDiff::RelationshipMissing { .. }
                | ElementDiff::RelationshipEntries { .. } => "relationship",
                ElementDiff::Annotation { .. } => "annotation",
            })
            .collect();
        assert_eq!(kinds, vec!["property", "relationship", "annotation"]);
    }
}
