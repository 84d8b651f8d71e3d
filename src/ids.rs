//! Identifier allocation policies.
//!
//! Every node created during tree construction gets its id from an
//! [`IdAllocator`]. The allocator owns all mutable allocation state (the
//! used-id set for name-based ids, the counter for numeric ids) and is passed
//! explicitly into the builder, so id generation has no ambient state and is
//! strictly sequential by construction.

use std::collections::HashSet;

use crate::tree::{HierarchyNode, ROOT_ID};

/// How node identifiers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// The node name is the id; collisions append `_2`, `_3`, ...
    #[default]
    NameBased,
    /// A global counter in creation order, unrelated to names.
    Numeric {
        /// First id handed out.
        start: u64,
    },
    /// Dotted sibling ordinals encoding the parent lineage: top-level nodes
    /// get `1`, `2`, ..., their children `1.1`, `1.2`, ...
    OrderedNumeric,
}

/// Allocates node identifiers under a fixed [`IdPolicy`].
#[derive(Debug)]
pub struct IdAllocator {
    state: State,
}

#[derive(Debug)]
enum State {
    NameBased { used: HashSet<String> },
    Numeric { next: u64 },
    OrderedNumeric,
}

impl IdAllocator {
    /// Create an allocator for `policy`.
    ///
    /// For name-based allocation the used-id set starts with the root
    /// sentinel, so a data value literally named `root` cannot collide with
    /// the root node's id.
    pub fn new(policy: IdPolicy) -> Self {
        let state = match policy {
            IdPolicy::NameBased => {
                let mut used = HashSet::new();
                used.insert(ROOT_ID.to_string());
                State::NameBased { used }
            }
            IdPolicy::Numeric { start } => State::Numeric { next: start },
            IdPolicy::OrderedNumeric => State::OrderedNumeric,
        };
        Self { state }
    }

    /// Produce the id for a node named `name` about to be created under
    /// `parent`.
    ///
    /// Called exactly once per new node, in creation order, before the child
    /// is inserted into the parent's child map (the ordered-numeric ordinal is
    /// the parent's child count so far, plus one).
    pub fn allocate(&mut self, name: &str, parent: &HierarchyNode) -> String {
        match &mut self.state {
            State::NameBased { used } => {
                if used.insert(name.to_string()) {
                    return name.to_string();
                }
                let mut count = 2u64;
                loop {
                    let candidate = format!("{name}_{count}");
                    if used.insert(candidate.clone()) {
                        return candidate;
                    }
                    count += 1;
                }
            }
            State::Numeric { next } => {
                let id = next.to_string();
                *next += 1;
                id
            }
            State::OrderedNumeric => {
                let ordinal = parent.child_count() + 1;
                if parent.level() == 0 {
                    ordinal.to_string()
                } else {
                    format!("{}.{ordinal}", parent.id())
                }
            }
        }
    }
}
