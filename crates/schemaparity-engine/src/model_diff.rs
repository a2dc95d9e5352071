//! Element-level comparison of two semantic models
//!
//! Both element lists are indexed by identity key. Keys present on one side
//! only become missing/extra entries; shared keys are diffed field by field.

use crate::element_diff::diff_elements;
use crate::identity::element_key;
use schemaparity_core::{
    DuplicateKey, ElementDifference, ElementKey, ModelComparison, ModelDocument, SchemaElement,
    Side,
};
use std::collections::HashMap;

/// Compare the elements of `candidate` against `baseline`
pub fn diff_models(candidate: &ModelDocument, baseline: &ModelDocument) -> ModelComparison {
    let mut duplicates = Vec::new();
    let candidate_index = index_elements(&candidate.elements, Side::Candidate, &mut duplicates);
    let baseline_index = index_elements(&baseline.elements, Side::Baseline, &mut duplicates);

    let missing_in_candidate = sorted_keys(
        baseline_index
            .keys()
            .filter(|key| !candidate_index.contains_key(*key)),
    );
    let extra_in_candidate = sorted_keys(
        candidate_index
            .keys()
            .filter(|key| !baseline_index.contains_key(*key)),
    );
    let common = sorted_keys(
        candidate_index
            .keys()
            .filter(|key| baseline_index.contains_key(*key)),
    );

    let mut differences = Vec::new();
    for key in common {
        let diffs = diff_elements(candidate_index[&key], baseline_index[&key]);
        if !diffs.is_empty() {
            differences.push(ElementDifference { key, diffs });
        }
    }

    ModelComparison {
        total_candidate: candidate_index.len(),
        total_baseline: baseline_index.len(),
        missing_in_candidate,
        extra_in_candidate,
        differences,
        duplicates,
    }
}

/// Key -> element; a later element replaces an earlier one with the same key
fn index_elements<'a>(
    elements: &'a [SchemaElement],
    side: Side,
    duplicates: &mut Vec<DuplicateKey>,
) -> HashMap<ElementKey, &'a SchemaElement> {
    let mut index = HashMap::with_capacity(elements.len());

    for element in elements {
        let key = element_key(element);
        if index.contains_key(&key) {
            tracing::debug!(
                side = %side,
                key = %key,
                "duplicate element key, keeping the later element"
            );
            duplicates.push(DuplicateKey {
                side,
                key: key.clone(),
            });
        }
        index.insert(key, element);
    }

    index
}

/// Sort by display form; the structural order breaks ties between keys that render alike
fn sorted_keys<'a>(keys: impl Iterator<Item = &'a ElementKey>) -> Vec<ElementKey> {
    let mut keys: Vec<(String, ElementKey)> = keys.map(|k| (k.to_string(), k.clone())).collect();
    keys.sort();
    keys.into_iter().map(|(_, k)| k).collect()
}
