// In: src/model/solution.rs

//! One decoded solution: the variable assignments of a single dzn document
//! emitted between two solution separators.

use std::collections::BTreeMap;

use crate::model::Value;

/// A single decoded solution.
///
/// Owned exclusively by the `SolutionStream` once produced and immutable
/// after creation. Insertion order of assignments is not significant.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Variable name to decoded value.
    pub assignments: BTreeMap<String, Value>,
    /// The raw dzn text this solution was decoded from, as emitted by the
    /// solver (separator line excluded).
    pub raw: String,
}

impl Solution {
    pub fn new(assignments: BTreeMap<String, Value>, raw: String) -> Self {
        Self { assignments, raw }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.assignments.get(name)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.assignments.iter()
    }
}
