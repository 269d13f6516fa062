//! Filter tree sanitization.
//!
//! Prunes logical groups that end up with no conditions. The input is
//! borrowed and a new tree is built, so callers holding the original keep
//! it intact. Nesting is bounded by `max_depth`; deeper trees are rejected
//! with [`QueryError::FilterTooDeep`].

use super::filter::{FilterGroup, FilterNode};
use crate::error::{QueryError, QueryResult};

/// Default bound on filter group nesting.
pub const DEFAULT_MAX_FILTER_DEPTH: usize = 32;

/// Sanitize a filter tree.
///
/// Leaves are returned unchanged. Groups lose every child group that
/// sanitizes to nothing; a group left without conditions yields `None`.
pub fn sanitize(node: &FilterNode, max_depth: usize) -> QueryResult<Option<FilterNode>> {
    match node {
        FilterNode::Leaf(_) => Ok(Some(node.clone())),
        FilterNode::Group(group) => {
            Ok(sanitize_group(group, 1, max_depth)?.map(FilterNode::Group))
        }
    }
}

/// Sanitize the root group of a query.
///
/// The root keeps its operator and placement even when every condition is
/// pruned; its condition list is then empty.
pub fn sanitize_root(root: &FilterGroup, max_depth: usize) -> QueryResult<FilterGroup> {
    let conditions = sanitize_conditions(&root.conditions, 1, max_depth)?;
    Ok(FilterGroup {
        conditions,
        ..root.clone_shallow()
    })
}

/// Nesting depth of a node. Leaves have depth 0, a group is one deeper than
/// its deepest child.
///
/// Stops counting once `limit` is exceeded.
pub fn depth(node: &FilterNode, limit: usize) -> usize {
    fn walk(node: &FilterNode, current: usize, limit: usize) -> usize {
        match node {
            FilterNode::Leaf(_) => current - 1,
            FilterNode::Group(_) if current > limit => current,
            FilterNode::Group(group) => group
                .conditions
                .iter()
                .map(|child| walk(child, current + 1, limit))
                .max()
                .unwrap_or(current)
                .max(current),
        }
    }
    walk(node, 1, limit)
}

fn sanitize_group(
    group: &FilterGroup,
    level: usize,
    max_depth: usize,
) -> QueryResult<Option<FilterGroup>> {
    let conditions = sanitize_conditions(&group.conditions, level, max_depth)?;
    if conditions.is_empty() {
        return Ok(None);
    }
    Ok(Some(FilterGroup {
        conditions,
        ..group.clone_shallow()
    }))
}

fn sanitize_conditions(
    conditions: &[FilterNode],
    level: usize,
    max_depth: usize,
) -> QueryResult<Vec<FilterNode>> {
    if level > max_depth {
        return Err(QueryError::FilterTooDeep { max_depth });
    }

    let mut kept = Vec::with_capacity(conditions.len());
    for condition in conditions {
        match condition {
            FilterNode::Leaf(_) => kept.push(condition.clone()),
            FilterNode::Group(child) => {
                if let Some(child) = sanitize_group(child, level + 1, max_depth)? {
                    kept.push(FilterNode::Group(child));
                }
            }
        }
    }
    Ok(kept)
}

impl FilterGroup {
    /// Copy of the group header without its conditions.
    fn clone_shallow(&self) -> FilterGroup {
        FilterGroup {
            kind: self.kind,
            operator: self.operator,
            level: self.level,
            position: self.position,
            conditions: Vec::new(),
        }
    }
}
