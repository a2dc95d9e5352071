//! Header metadata comparison

use schemaparity_core::{CustomDataBlock, HeaderComparison, HeaderDiff, MetadataChange, Side};
use std::collections::{BTreeMap, BTreeSet};

type BlockIndex<'a> = BTreeMap<(&'a str, &'a str), &'a BTreeMap<String, String>>;

/// Compare header blocks keyed by `(category, type)`
pub fn diff_headers(
    candidate: &[CustomDataBlock],
    baseline: &[CustomDataBlock],
) -> HeaderComparison {
    let candidate = index_blocks(candidate);
    let baseline = index_blocks(baseline);
    let keys: BTreeSet<&(&str, &str)> = candidate.keys().chain(baseline.keys()).collect();

    let mut diffs = Vec::new();
    for &(category, block_type) in keys {
        let key = (category, block_type);
        match (candidate.get(&key), baseline.get(&key)) {
            (Some(_), None) => diffs.push(HeaderDiff::BlockMissing {
                category: category.to_string(),
                block_type: block_type.to_string(),
                missing_in: Side::Baseline,
            }),
            (None, Some(_)) => diffs.push(HeaderDiff::BlockMissing {
                category: category.to_string(),
                block_type: block_type.to_string(),
                missing_in: Side::Candidate,
            }),
            (Some(c), Some(b)) if c != b => diffs.push(HeaderDiff::BlockChanged {
                category: category.to_string(),
                block_type: block_type.to_string(),
                changes: metadata_changes(c, b),
            }),
            _ => {}
        }
    }

    HeaderComparison { diffs }
}

fn index_blocks(blocks: &[CustomDataBlock]) -> BlockIndex<'_> {
    blocks
        .iter()
        .map(|block| ((block.category.as_str(), block.block_type.as_str()), &block.metadata))
        .collect()
}

fn metadata_changes(
    candidate: &BTreeMap<String, String>,
    baseline: &BTreeMap<String, String>,
) -> Vec<MetadataChange> {
    let names: BTreeSet<&String> = candidate.keys().chain(baseline.keys()).collect();

    names
        .into_iter()
        .filter(|name| candidate.get(*name) != baseline.get(*name))
        .map(|name| MetadataChange {
            name: name.clone(),
            candidate: candidate.get(name).cloned(),
            baseline: baseline.get(name).cloned(),
        })
        .collect()
}
