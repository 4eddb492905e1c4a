//! Ordered insertion of a rendered node into the live parent.

use crate::dom::Node;
use crate::error::DomError;

/// Insert `node` into `parent` so it lands at `index`.
///
/// `index` is the model's position in the collection *after* it was spliced
/// in, so `index == parent.child_count()` means "after the last child" and
/// must append instead of targeting a child one slot too far.
///
/// - `None`: append
/// - `index == len` or `len == 0`: append
/// - otherwise: insert before the child currently at `index`
pub fn insert_at(parent: &Node, node: &Node, index: Option<usize>) -> Result<(), DomError> {
    let Some(index) = index else {
        return parent.append_child(node);
    };

    let len = parent.child_count();
    if index == len || len == 0 {
        return parent.append_child(node);
    }

    match parent.child_at(index) {
        Some(reference) => parent.insert_before(node, Some(&reference)),
        // Past the end: nothing to insert before
        None => parent.append_child(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::host_document;

    fn parent_with(tags: &[&str]) -> Node {
        let doc = host_document();
        let parent = doc.create_element("div");
        for tag in tags {
            parent.append_child(&doc.create_element(tag)).unwrap();
        }
        parent
    }

    fn tags(parent: &Node) -> Vec<String> {
        parent.child_nodes().iter().map(Node::node_name).collect()
    }

    #[test]
    fn test_insert_at_current_length_appends() {
        for len in 0..4 {
            let existing: Vec<&str> = ["a", "b", "i"].iter().take(len).copied().collect();
            let parent = parent_with(&existing);
            let node = host_document().create_element("new");

            insert_at(&parent, &node, Some(len)).unwrap();

            assert_eq!(parent.child_at(len), Some(node), "len {} appends", len);
            assert_eq!(parent.child_count(), len + 1);
        }
    }

    #[test]
    fn test_insert_in_middle_precedes_prior_child() {
        let parent = parent_with(&["a", "b", "i"]);
        let prior = parent.child_at(1).unwrap();
        let node = host_document().create_element("new");

        insert_at(&parent, &node, Some(1)).unwrap();

        assert_eq!(tags(&parent), vec!["a", "new", "b", "i"]);
        assert_eq!(parent.index_of(&prior), Some(2));
    }

    #[test]
    fn test_insert_at_zero() {
        let parent = parent_with(&["a"]);
        insert_at(&parent, &host_document().create_element("new"), Some(0)).unwrap();
        assert_eq!(tags(&parent), vec!["new", "a"]);
    }

    #[test]
    fn test_none_and_out_of_range_append() {
        let parent = parent_with(&["a"]);
        insert_at(&parent, &host_document().create_element("x"), None).unwrap();
        insert_at(&parent, &host_document().create_element("y"), Some(9)).unwrap();
        assert_eq!(tags(&parent), vec!["a", "x", "y"]);
    }

    #[test]
    fn test_empty_parent_appends_regardless_of_index() {
        let parent = parent_with(&[]);
        insert_at(&parent, &host_document().create_element("x"), Some(3)).unwrap();
        assert_eq!(tags(&parent), vec!["x"]);
    }
}
