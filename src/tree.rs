//! Hierarchy tree construction.
//!
//! Rows enter at the synthetic root and sink one hierarchy column at a time:
//! for each hierarchy column in declared order, every node existing at the
//! start of the pass distributes its owned rows into children keyed by that
//! column's value. Children are created lazily, in row-encounter order, which
//! makes the tree shape and all allocated ids deterministic and independent
//! of any hash iteration order.
//!
//! A row whose value for the pass column is empty simply stays where it is —
//! and is examined again on the next pass, so a row with an unfilled
//! intermediate level attaches its deeper node directly to the shallower
//! ancestor. A row that never descends further rests at its node and later
//! supplies that node's properties.

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::ids::IdAllocator;
use crate::types::Row;

/// Reserved name and id of the synthetic root node.
pub const ROOT_ID: &str = "root";

/// Handle to a node in its [`HierarchyTree`].
///
/// Nodes are stored in creation order, so `NodeId`s double as the node
/// creation sequence (the root is always first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One distinct value observed in a hierarchy column, scoped to its parent.
#[derive(Debug)]
pub struct HierarchyNode {
    name: String,
    id: String,
    level: usize,
    owned_rows: Vec<Row>,
    children: IndexMap<String, NodeId>,
}

impl HierarchyNode {
    pub(crate) fn new(name: impl Into<String>, id: impl Into<String>, level: usize) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            level,
            owned_rows: Vec::new(),
            children: IndexMap::new(),
        }
    }

    /// The raw cell value that produced this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allocated identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The hierarchy column this node belongs to; 0 for the root.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Rows resting at this node, in encounter order. After construction
    /// these are exactly the rows that stopped descending here.
    pub fn owned_rows(&self) -> &[Row] {
        &self.owned_rows
    }

    /// Child handles in first-appearance order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// True if this node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn child_by_name(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }
}

/// The built taxonomy: an arena of nodes rooted at [`HierarchyTree::root`].
#[derive(Debug)]
pub struct HierarchyTree {
    nodes: Vec<HierarchyNode>,
}

impl HierarchyTree {
    /// Build the tree from normalized rows.
    ///
    /// `hierarchy_columns` is the declared hierarchy order; the tree gets one
    /// level per entry. `allocator` hands out ids in creation order.
    /// `column_names` is only used to enrich diagnostics. Rows too short for
    /// a pass column are reported to `sink` and rest at their current node.
    pub fn build(
        rows: Vec<Row>,
        hierarchy_columns: &[usize],
        allocator: &mut IdAllocator,
        column_names: Option<&Row>,
        sink: &dyn DiagnosticSink,
    ) -> Self {
        let mut tree = Self {
            nodes: vec![HierarchyNode::new(ROOT_ID, ROOT_ID, 0)],
        };
        tree.nodes[0].owned_rows = rows;

        for &column in hierarchy_columns {
            // Snapshot before distributing: children created during this pass
            // wait for the next column.
            for owner in tree.breadth_first() {
                tree.distribute(owner, column, allocator, column_names, sink);
            }
        }
        tree
    }

    /// The root node's handle.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Resolve a handle obtained from this tree.
    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.0]
    }

    /// All nodes in creation order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter()
    }

    /// Total node count, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists even for empty input.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Existing nodes in breadth-first order, siblings in first-appearance
    /// order. The returned list is the wavefront queue for one pass.
    fn breadth_first(&self) -> Vec<NodeId> {
        let mut order = vec![self.root()];
        let mut cursor = 0;
        while cursor < order.len() {
            order.extend(self.nodes[order[cursor].0].children());
            cursor += 1;
        }
        order
    }

    /// Move `owner`'s rows into children keyed by `column`'s value.
    fn distribute(
        &mut self,
        owner: NodeId,
        column: usize,
        allocator: &mut IdAllocator,
        column_names: Option<&Row>,
        sink: &dyn DiagnosticSink,
    ) {
        let rows = std::mem::take(&mut self.nodes[owner.0].owned_rows);
        for row in rows {
            let name = match row.cell(column).map(str::to_string) {
                Some(value) if !value.is_empty() => value,
                Some(_) => {
                    // No value at this level; the row rests here for now.
                    self.nodes[owner.0].owned_rows.push(row);
                    continue;
                }
                None => {
                    sink.report(&Diagnostic::ColumnOutOfRange {
                        line: row.line_number(),
                        column,
                        column_name: column_names
                            .and_then(|names| names.cell(column))
                            .map(str::to_string),
                    });
                    self.nodes[owner.0].owned_rows.push(row);
                    continue;
                }
            };

            let child = match self.nodes[owner.0].child_by_name(&name) {
                Some(existing) => existing,
                None => {
                    let id = allocator.allocate(&name, &self.nodes[owner.0]);
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(HierarchyNode::new(name.clone(), id, column));
                    self.nodes[owner.0].children.insert(name, child);
                    child
                }
            };
            self.nodes[child.0].owned_rows.push(row);
        }
    }
}
