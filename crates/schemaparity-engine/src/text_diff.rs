//! Line-based comparison of script files

use schemaparity_core::ArtifactStatus;
use similar::{ChangeTag, TextDiff};

const CONTEXT_LINES: usize = 3;

/// Compare two texts line by line, ignoring trailing whitespace.
///
/// On difference the detail lines are a unified diff from the baseline to
/// the candidate.
pub fn compare_text(candidate: &str, baseline: &str) -> ArtifactStatus {
    let candidate = normalize(candidate);
    let baseline = normalize(baseline);

    if candidate == baseline {
        return ArtifactStatus::Identical;
    }

    ArtifactStatus::Different(unified_diff(&baseline, &candidate))
}

/// Trailing whitespace stripped from every line, each line newline-terminated
fn normalize(text: &str) -> String {
    text.lines().map(|line| format!("{}\n", line.trim_end())).collect()
}

fn unified_diff(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);
    let mut lines = vec!["--- baseline".to_string(), "+++ candidate".to_string()];

    for group in diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };

        let old_start = first.old_range().start;
        let new_start = first.new_range().start;
        let old_len = last.old_range().end - old_start;
        let new_len = last.new_range().end - new_start;
        lines.push(format!(
            "@@ -{},{} +{},{} @@",
            old_start + 1,
            old_len,
            new_start + 1,
            new_len
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                lines.push(format!("{}{}", sign, change.value().trim_end_matches('\n')));
            }
        }
    }

    lines
}
