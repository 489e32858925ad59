//! Partitions the output list into capacity-bounded buckets per result
//! category, from a category tree configured outside this engine.

use crate::models::MatchCategory;

/// A node of the configured result-group tree. Branches cap the budget of
/// their subtree; leaves resolve to one match category.
#[derive(Debug, Clone)]
pub enum ResultGroupNode {
    Leaf(MatchCategory),
    Branch {
        max_results: Option<usize>,
        children: Vec<ResultGroupNode>,
    },
}

impl ResultGroupNode {
    /// The shipping default: one heuristic slot, then suggestions and
    /// general results sharing the remaining budget, then extensions.
    #[must_use]
    pub fn default_tree() -> Self {
        Self::Branch {
            max_results: None,
            children: vec![
                Self::Branch {
                    max_results: Some(1),
                    children: vec![Self::Leaf(MatchCategory::Heuristic)],
                },
                Self::Branch {
                    max_results: None,
                    children: vec![
                        Self::Leaf(MatchCategory::Suggestion),
                        Self::Leaf(MatchCategory::General),
                    ],
                },
                Self::Leaf(MatchCategory::Extension),
            ],
        }
    }
}

#[derive(Debug)]
struct SlotGroup {
    category: MatchCategory,
    /// Remaining capacity; never grows within one search.
    available: usize,
    /// Matches already placed in the group.
    count: usize,
}

#[derive(Debug)]
pub struct SlotAllocator {
    groups: Vec<SlotGroup>,
}

impl SlotAllocator {
    /// Flattens the tree into ordered groups; adjacent leaves resolving to
    /// the same category merge into one group.
    #[must_use]
    pub fn new(tree: &ResultGroupNode, max_results: usize) -> Self {
        let mut groups = Vec::new();
        flatten(tree, max_results, &mut groups);
        Self { groups }
    }

    /// Finds the insertion index for a match of the given category, or
    /// `None` when every compatible group is saturated (the match is simply
    /// not shown).
    pub fn allocate(&mut self, category: MatchCategory) -> Option<usize> {
        let mut index = 0;
        for group in &mut self.groups {
            index += group.count;
            if group.category != category || group.available == 0 {
                continue;
            }
            group.available -= 1;
            group.count += 1;
            return Some(index);
        }
        None
    }
}

fn flatten(node: &ResultGroupNode, max_results: usize, groups: &mut Vec<SlotGroup>) {
    match node {
        ResultGroupNode::Leaf(category) => {
            if let Some(last) = groups.last()
                && last.category == *category
            {
                return;
            }
            groups.push(SlotGroup {
                category: *category,
                available: max_results,
                count: 0,
            });
        }
        ResultGroupNode::Branch {
            max_results: cap,
            children,
        } => {
            let budget = cap.map_or(max_results, |c| c.min(max_results));
            for child in children {
                flatten(child, budget, groups);
            }
        }
    }
}
