//! Flat-to-nested tree reconstruction.

use std::collections::{HashMap, HashSet};

use crate::model::{Category, CategoryId, CategoryTree};

/// Rebuild a nested forest from a flat result set.
///
/// A row becomes a root of the returned forest when its parent is null or
/// when its parent was not fetched — the latter covers subtree queries,
/// where the requested root's own parent lies outside the rows. Attachment
/// happens in a grouping pass over ids, so correctness does not depend on
/// the store's row order.
///
/// Every sibling list, including the top-level forest, is sorted by
/// ascending display_order; the sort is stable, so ties keep the source
/// (path) order.
pub fn build_tree(rows: Vec<Category>) -> Vec<CategoryTree> {
    let fetched: HashSet<CategoryId> = rows.iter().map(|row| row.id).collect();

    let mut roots: Vec<Category> = Vec::new();
    let mut children_of: HashMap<CategoryId, Vec<Category>> = HashMap::new();
    for row in rows {
        match row.parent_id {
            Some(parent_id) if fetched.contains(&parent_id) => {
                children_of.entry(parent_id).or_default().push(row);
            }
            _ => roots.push(row),
        }
    }

    let mut forest: Vec<CategoryTree> = roots
        .into_iter()
        .map(|root| attach_children(root, &mut children_of))
        .collect();
    forest.sort_by_key(|node| node.display_order);
    forest
}

fn attach_children(
    category: Category,
    children_of: &mut HashMap<CategoryId, Vec<Category>>,
) -> CategoryTree {
    let mut node = CategoryTree::leaf(&category);
    if let Some(rows) = children_of.remove(&category.id) {
        node.children = rows
            .into_iter()
            .map(|child| attach_children(child, children_of))
            .collect();
        node.children.sort_by_key(|child| child.display_order);
    }
    node
}
