//! Order-independent comparison of simple XML documents
//!
//! Every node is reduced to a canonical signature string. A tree is
//! flattened to `(path, signature)` pairs with siblings visited in signature
//! order, so two documents that only differ in child order flatten to the
//! same list.

use schemaparity_core::{ArtifactStatus, NodeId, XmlTree};
use std::collections::HashSet;

/// Canonical signature of one node: `tag|key=value|...|text=content`
pub fn canonical(tree: &XmlTree, id: NodeId) -> String {
    let node = tree.node(id);
    let mut parts = vec![node.tag.clone()];

    // BTreeMap iteration is already in key order
    for (key, value) in &node.attributes {
        parts.push(format!("{}={}", key, value));
    }

    let text = node.text.trim();
    if !text.is_empty() {
        parts.push(format!("text={}", text));
    }

    parts.join("|")
}

/// Pre-order `(path, signature)` list of the whole tree
pub fn flatten(tree: &XmlTree) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Some(root) = tree.root() {
        flatten_node(tree, root, "", &mut out);
    }
    out
}

fn flatten_node(tree: &XmlTree, id: NodeId, parent_path: &str, out: &mut Vec<(String, String)>) {
    let path = format!("{}/{}", parent_path, tree.node(id).tag);
    out.push((path.clone(), canonical(tree, id)));

    let mut children: Vec<(String, NodeId)> = tree
        .node(id)
        .children
        .iter()
        .map(|&child| (canonical(tree, child), child))
        .collect();
    // Stable sort: equal signatures keep document order
    children.sort_by(|a, b| a.0.cmp(&b.0));

    for (_, child) in children {
        flatten_node(tree, child, &path, out);
    }
}

/// Compare two parsed simple XML documents
pub fn compare_simple_xml(candidate: &XmlTree, baseline: &XmlTree) -> ArtifactStatus {
    let flat_candidate = flatten(candidate);
    let flat_baseline = flatten(baseline);

    if flat_candidate == flat_baseline {
        return ArtifactStatus::Identical;
    }

    let lines_candidate: Vec<String> = flat_candidate
        .iter()
        .map(|(path, sig)| format!("{}: {}", path, sig))
        .collect();
    let lines_baseline: Vec<String> = flat_baseline
        .iter()
        .map(|(path, sig)| format!("{}: {}", path, sig))
        .collect();

    let in_candidate: HashSet<&String> = lines_candidate.iter().collect();
    let in_baseline: HashSet<&String> = lines_baseline.iter().collect();

    let mut lines = vec!["--- baseline".to_string(), "+++ candidate".to_string()];
    lines.extend(
        lines_baseline
            .iter()
            .filter(|line| !in_candidate.contains(line))
            .map(|line| format!("-{}", line)),
    );
    lines.extend(
        lines_candidate
            .iter()
            .filter(|line| !in_baseline.contains(line))
            .map(|line| format!("+{}", line)),
    );

    ArtifactStatus::Different(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemaparity_package::parse_xml;

    fn tree(xml: &str) -> XmlTree {
        parse_xml("test.xml", xml).unwrap()
    }

    #[test]
    fn canonical_sorts_attributes_and_trims_text() {
        let t = tree(r#"<Item b="2" a="1">  hello  </Item>"#);
        assert_eq!(canonical(&t, t.root().unwrap()), "Item|a=1|b=2|text=hello");
    }

    #[test]
    fn canonical_omits_empty_text() {
        let t = tree("<Item>   </Item>");
        assert_eq!(canonical(&t, t.root().unwrap()), "Item");
    }

    #[test]
    fn flatten_paths_and_sibling_order() {
        let t = tree(r#"<Root><B Name="x" /><A /></Root>"#);
        assert_eq!(
            flatten(&t),
            vec![
                ("/Root".to_string(), "Root".to_string()),
                ("/Root/A".to_string(), "A".to_string()),
                ("/Root/B".to_string(), "B|Name=x".to_string()),
            ]
        );
    }

    #[test]
    fn reordered_children_are_identical() {
        let a = tree(r#"<Types><Default Extension="xml" /><Default Extension="sql" /></Types>"#);
        let b = tree(r#"<Types><Default Extension="sql" /><Default Extension="xml" /></Types>"#);
        assert_eq!(compare_simple_xml(&a, &b), ArtifactStatus::Identical);
    }

    #[test]
    fn changed_attribute_lists_both_sides() {
        let candidate = tree(r#"<Root><Child Name="a" Value="1" /></Root>"#);
        let baseline = tree(r#"<Root><Child Name="a" Value="2" /></Root>"#);

        assert_eq!(
            compare_simple_xml(&candidate, &baseline),
            ArtifactStatus::Different(vec![
                "--- baseline".to_string(),
                "+++ candidate".to_string(),
                "-/Root/Child: Child|Name=a|Value=2".to_string(),
                "+/Root/Child: Child|Name=a|Value=1".to_string(),
            ])
        );
    }

    #[test]
    fn different_text_content_differs() {
        let candidate = tree("<Root><Name>Hello</Name></Root>");
        let baseline = tree("<Root><Name>World</Name></Root>");
        assert!(!compare_simple_xml(&candidate, &baseline).is_ok());
    }

    #[test]
    fn namespace_prefix_does_not_matter() {
        let a = tree(r#"<Root xmlns="urn:x"><Child /></Root>"#);
        let b = tree(r#"<p:Root xmlns:p="urn:x"><p:Child /></p:Root>"#);
        assert_eq!(compare_simple_xml(&a, &b), ArtifactStatus::Identical);
    }
}
