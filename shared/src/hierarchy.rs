//! Department hierarchy
//!
//! Turns the flat department list into a depth-annotated pre-order list for
//! indented display, and guards parent assignment against cycles.
//!
//! Stored data is not trusted to be acyclic: every walk here is bounded by a
//! visited set, so a corrupt parent loop degrades to extra roots instead of
//! hanging.

use std::collections::{HashMap, HashSet};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{Department, HierarchyEntry};

/// Build the display order of a department list
///
/// Parents come immediately before their subtree, siblings keep input order.
/// A department whose parent is missing from the list is a root.
pub fn build_hierarchy(departments: &[Department]) -> Vec<HierarchyEntry> {
    let index: HashMap<i64, usize> = departments
        .iter()
        .enumerate()
        .map(|(i, d)| (d.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); departments.len()];
    let mut roots = Vec::new();
    for (i, dept) in departments.iter().enumerate() {
        match dept.parent_id.and_then(|p| index.get(&p)) {
            Some(&parent) if parent != i => children[parent].push(i),
            _ => roots.push(i),
        }
    }

    let mut visited = vec![false; departments.len()];
    let mut out = Vec::with_capacity(departments.len());

    for root in roots {
        walk(root, departments, &children, &mut visited, &mut out);
    }

    // Members of a parent loop are unreachable from any root
    for i in 0..departments.len() {
        if !visited[i] {
            walk(i, departments, &children, &mut visited, &mut out);
        }
    }

    out
}

fn walk(
    start: usize,
    departments: &[Department],
    children: &[Vec<usize>],
    visited: &mut [bool],
    out: &mut Vec<HierarchyEntry>,
) {
    let mut stack = vec![(start, 0usize)];
    while let Some((i, depth)) = stack.pop() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        out.push(HierarchyEntry {
            department: departments[i].clone(),
            depth,
        });
        for &child in children[i].iter().rev() {
            if !visited[child] {
                stack.push((child, depth + 1));
            }
        }
    }
}

/// Whether `candidate` would create a cycle as the parent of `editing`
///
/// True when the candidate is the department itself or one of its
/// descendants (walking up from the candidate reaches `editing`).
pub fn is_invalid_parent(candidate: i64, editing: i64, departments: &[Department]) -> bool {
    if candidate == editing {
        return true;
    }

    let parents: HashMap<i64, Option<i64>> =
        departments.iter().map(|d| (d.id, d.parent_id)).collect();

    let mut seen = HashSet::new();
    let mut current = parents.get(&candidate).copied().flatten();
    while let Some(id) = current {
        if id == editing {
            return true;
        }
        if !seen.insert(id) {
            break;
        }
        current = parents.get(&id).copied().flatten();
    }
    false
}

/// Departments that may be selected as parent of `editing`
///
/// With `editing = None` (creating a department) every department is eligible.
pub fn eligible_parents(editing: Option<i64>, departments: &[Department]) -> Vec<&Department> {
    match editing {
        None => departments.iter().collect(),
        Some(editing) => departments
            .iter()
            .filter(|d| !is_invalid_parent(d.id, editing, departments))
            .collect(),
    }
}

/// Validate a parent assignment for `editing`
///
/// `None` always succeeds (the department becomes a root).
pub fn assign_parent(
    editing: i64,
    parent: Option<i64>,
    departments: &[Department],
) -> AppResult<Option<i64>> {
    let Some(parent) = parent else {
        return Ok(None);
    };

    if !departments.iter().any(|d| d.id == parent) {
        return Err(AppError::new(ErrorCode::DepartmentNotFound).with_detail("department_id", parent));
    }

    if is_invalid_parent(parent, editing, departments) {
        return Err(AppError::with_message(
            ErrorCode::DepartmentCycle,
            "A department cannot be placed under itself or one of its sub-departments",
        )
        .with_detail("department_id", editing)
        .with_detail("parent_id", parent));
    }

    Ok(Some(parent))
}
