//! Template rendering of a built [`HierarchyTree`].
//!
//! Output is grouped by level, not by subtree: first the root's direct
//! children, then one group per hierarchy column in declared order. Within a
//! group, elements appear in tree-traversal order, which equals the original
//! row-encounter order because children are stored in first-appearance order.
//!
//! Placeholder substitution is literal find-and-replace, one pass per
//! placeholder per template instance. Templates resolve per-column overrides
//! first, then the global default; what happens when neither exists depends
//! on the template kind (see [`crate::diagnostics::Diagnostic`]).

use std::io::{self, Write};

use crate::config::{Settings, TemplateKind};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::tree::{HierarchyNode, HierarchyTree, NodeId};
use crate::types::Row;

/// Walks a tree level by level and writes templated element blocks.
#[derive(Debug)]
pub struct Renderer<'a> {
    settings: &'a Settings,
    hierarchy_columns: &'a [usize],
    property_columns: &'a [usize],
    column_names: Option<&'a Row>,
    show_broader: bool,
    show_narrower: bool,
}

impl<'a> Renderer<'a> {
    /// Create a renderer over resolved configuration.
    pub fn new(
        settings: &'a Settings,
        hierarchy_columns: &'a [usize],
        property_columns: &'a [usize],
        column_names: Option<&'a Row>,
    ) -> Self {
        Self {
            settings,
            hierarchy_columns,
            property_columns,
            column_names,
            show_broader: settings.show_broader_reference(),
            show_narrower: settings.show_narrower_reference(),
        }
    }

    /// Render the whole tree to `out`, reporting degraded elements to `sink`.
    pub fn render(
        &self,
        tree: &HierarchyTree,
        out: &mut dyn Write,
        sink: &dyn DiagnosticSink,
    ) -> io::Result<()> {
        self.emit_level(tree, tree.root(), 0, out, sink)?;
        for &column in self.hierarchy_columns {
            self.emit_level(tree, tree.root(), column, out, sink)?;
        }
        Ok(())
    }

    /// Depth-first search for nodes at `target` level; each one emits its
    /// children as element blocks.
    fn emit_level(
        &self,
        tree: &HierarchyTree,
        at: NodeId,
        target: usize,
        out: &mut dyn Write,
        sink: &dyn DiagnosticSink,
    ) -> io::Result<()> {
        let node = tree.node(at);
        if node.level() == target {
            for child in node.children() {
                self.emit_element(tree, node, child, out, sink)?;
            }
        } else {
            for child in node.children() {
                self.emit_level(tree, child, target, out, sink)?;
            }
        }
        Ok(())
    }

    fn emit_element(
        &self,
        tree: &HierarchyTree,
        parent: &HierarchyNode,
        child_id: NodeId,
        out: &mut dyn Write,
        sink: &dyn DiagnosticSink,
    ) -> io::Result<()> {
        let child = tree.node(child_id);

        let element_template = self.resolve(TemplateKind::Element, child.level());
        if element_template.is_empty() {
            sink.report(&Diagnostic::MissingElementTemplate {
                column: child.level(),
                id: child.id().to_string(),
                name: child.name().to_string(),
            });
            return Ok(());
        }

        let relations = self.relations_block(tree, parent, child, sink);
        let properties = self.properties_block(child, sink);

        let block = element_template
            .replace("<id>", child.id())
            .replace("<name>", child.name())
            .replace("<relations>", &relations)
            .replace("<properties>", &properties);
        writeln!(out, "{block}")
    }

    /// Per-column override, else the global default; `""` when neither is
    /// configured.
    fn resolve(&self, kind: TemplateKind, column: usize) -> &str {
        let specific = self.settings.template(Some(column), kind);
        if specific.is_empty() {
            self.settings.template(None, kind)
        } else {
            specific
        }
    }

    /// The `<relations>` block: at most one broader reference to the parent,
    /// plus one narrower reference per child, each on its own line.
    fn relations_block(
        &self,
        tree: &HierarchyTree,
        parent: &HierarchyNode,
        child: &HierarchyNode,
        sink: &dyn DiagnosticSink,
    ) -> String {
        let mut relations = String::new();

        // Top-level nodes have no broader concept; the root is synthetic.
        if self.show_broader && parent.level() != 0 {
            let template = self.resolve(TemplateKind::BroaderReference, child.level());
            if template.is_empty() {
                sink.report(&Diagnostic::MissingReferenceTemplate {
                    kind: TemplateKind::BroaderReference,
                    column: child.level(),
                    id: child.id().to_string(),
                    name: child.name().to_string(),
                });
            } else {
                relations.push_str(&template.replace("<parent>", parent.id()));
                relations.push('\n');
            }
        }

        if self.show_narrower && child.has_children() {
            let template = self.resolve(TemplateKind::NarrowerReference, child.level());
            if template.is_empty() {
                sink.report(&Diagnostic::MissingReferenceTemplate {
                    kind: TemplateKind::NarrowerReference,
                    column: child.level(),
                    id: child.id().to_string(),
                    name: child.name().to_string(),
                });
            } else {
                for grandchild in child.children() {
                    relations.push_str(&template.replace("<child>", tree.node(grandchild).id()));
                    relations.push('\n');
                }
            }
        }

        relations
    }

    /// The `<properties>` block, sourced from the first row resting at the
    /// node. Additional resting rows are reported and ignored.
    fn properties_block(&self, node: &HierarchyNode, sink: &dyn DiagnosticSink) -> String {
        let rows = node.owned_rows();
        let Some(first) = rows.first() else {
            return String::new();
        };
        if rows.len() > 1 {
            sink.report(&Diagnostic::MultiplePropertyRows {
                id: node.id().to_string(),
                name: node.name().to_string(),
                lines: rows.iter().map(Row::line_number).collect(),
            });
        }

        let mut properties = String::new();
        for &column in self.property_columns {
            let Some(value) = first.cell(column) else {
                sink.report(&Diagnostic::ColumnOutOfRange {
                    line: first.line_number(),
                    column,
                    column_name: self.column_name(column),
                });
                continue;
            };

            let template = self.resolve_property(column, node.level());
            if template.is_empty() {
                sink.report(&Diagnostic::MissingPropertyTemplate {
                    property_column: column,
                    id: node.id().to_string(),
                    name: node.name().to_string(),
                });
                continue;
            }
            if value.is_empty() {
                continue;
            }

            let mut line = template.to_string();
            if let Some(name) = self.column_name(column) {
                line = line.replace("<property>", &name);
            }
            line = line.replace("<value>", value);
            properties.push_str(&line);
            properties.push('\n');
        }
        properties
    }

    /// Property templates have a longer chain: property-column-specific,
    /// then owning-node-level-specific, then the global default.
    fn resolve_property(&self, property_column: usize, node_level: usize) -> &str {
        let per_property = self.settings.template(Some(property_column), TemplateKind::Property);
        if !per_property.is_empty() {
            return per_property;
        }
        self.resolve(TemplateKind::Property, node_level)
    }

    fn column_name(&self, column: usize) -> Option<String> {
        self.column_names
            .and_then(|names| names.cell(column))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::Renderer;
    use crate::config::{Settings, TemplateKind};
    use crate::diagnostics::{CollectingSink, Diagnostic};
    use crate::ids::{IdAllocator, IdPolicy};
    use crate::tree::HierarchyTree;
    use crate::types::Row;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        Settings::from_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn rows(data: &[&[&str]]) -> Vec<Row> {
        data.iter()
            .enumerate()
            .map(|(i, cells)| Row::new(i + 1, cells.iter().map(|c| c.to_string()).collect()))
            .collect()
    }

    fn tree(data: &[&[&str]], hierarchy_columns: &[usize]) -> HierarchyTree {
        let mut allocator = IdAllocator::new(IdPolicy::NameBased);
        let sink = CollectingSink::new();
        HierarchyTree::build(rows(data), hierarchy_columns, &mut allocator, None, &sink)
    }

    fn rendered(
        settings: &Settings,
        tree: &HierarchyTree,
        hierarchy_columns: &[usize],
        property_columns: &[usize],
        column_names: Option<&Row>,
        sink: &CollectingSink,
    ) -> String {
        let renderer = Renderer::new(settings, hierarchy_columns, property_columns, column_names);
        let mut out = Vec::new();
        renderer.render(tree, &mut out, sink).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn output_is_grouped_by_level_in_encounter_order() {
        let hierarchy = [1, 2];
        let t = tree(&[&["A", "X"], &["A", "Y"], &["B", "Z"]], &hierarchy);
        let s = settings(&[("defaultElementTemplate", "<elem id=\"<id>\" name=\"<name>\"/>")]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[], None, &sink);

        assert_eq!(
            out,
            "<elem id=\"A\" name=\"A\"/>\n\
             <elem id=\"B\" name=\"B\"/>\n\
             <elem id=\"X\" name=\"X\"/>\n\
             <elem id=\"Y\" name=\"Y\"/>\n\
             <elem id=\"Z\" name=\"Z\"/>\n"
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn per_column_element_templates_override_the_default() {
        let hierarchy = [1, 2];
        let t = tree(&[&["A", "X"]], &hierarchy);
        let s = settings(&[
            ("defaultElementTemplate", "node:<id>"),
            ("column2ElementTemplate", "leaf:<id>"),
        ]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[], None, &sink);

        assert_eq!(out, "node:A\nleaf:X\n");
    }

    #[test]
    fn elements_without_any_template_are_skipped_with_a_warning() {
        let hierarchy = [1, 2];
        let t = tree(&[&["A", "X"]], &hierarchy);
        let s = settings(&[("column2ElementTemplate", "leaf:<id>")]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[], None, &sink);

        assert_eq!(out, "leaf:X\n");
        assert_eq!(
            sink.collected(),
            vec![Diagnostic::MissingElementTemplate {
                column: 1,
                id: "A".to_string(),
                name: "A".to_string(),
            }]
        );
    }

    #[test]
    fn relations_cover_broader_parents_and_narrower_children() {
        let hierarchy = [1, 2];
        let t = tree(&[&["A", "X"], &["A", "Y"]], &hierarchy);
        let s = settings(&[
            ("defaultElementTemplate", "<id>[<relations>]"),
            ("defaultBroaderReferenceTemplate", "up:<parent>"),
            ("defaultNarrowerReferenceTemplate", "down:<child>"),
            ("showBroaderReference", "true"),
            ("showNarrowerReference", "true"),
        ]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[], None, &sink);

        // A is top-level: narrower references only. X and Y are leaves:
        // broader reference only.
        assert_eq!(out, "A[down:X\ndown:Y\n]\nX[up:A\n]\nY[up:A\n]\n");
        assert!(sink.is_empty());
    }

    #[test]
    fn reference_blocks_degrade_when_their_template_is_missing() {
        let hierarchy = [1, 2];
        let t = tree(&[&["A", "X"]], &hierarchy);
        let s = settings(&[
            ("defaultElementTemplate", "<id>[<relations>]"),
            ("showBroaderReference", "true"),
        ]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[], None, &sink);

        // The element still renders, with an empty relations block.
        assert_eq!(out, "A[]\nX[]\n");
        assert_eq!(
            sink.collected(),
            vec![Diagnostic::MissingReferenceTemplate {
                kind: TemplateKind::BroaderReference,
                column: 2,
                id: "X".to_string(),
                name: "X".to_string(),
            }]
        );
    }

    #[test]
    fn properties_come_from_the_first_resting_row_only() {
        let hierarchy = [1];
        let t = tree(&[&["A", "first"], &["A", "second"]], &hierarchy);
        let s = settings(&[
            ("defaultElementTemplate", "<id>{<properties>}"),
            ("defaultPropertyTemplate", "p=<value>"),
        ]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[2], None, &sink);

        assert_eq!(out, "A{p=first\n}\n");
        assert_eq!(
            sink.collected(),
            vec![Diagnostic::MultiplePropertyRows {
                id: "A".to_string(),
                name: "A".to_string(),
                lines: vec![1, 2],
            }]
        );
    }

    #[test]
    fn property_placeholder_uses_declared_column_names() {
        let hierarchy = [1];
        let t = tree(&[&["A", "red"]], &hierarchy);
        let s = settings(&[
            ("defaultElementTemplate", "<id>{<properties>}"),
            ("defaultPropertyTemplate", "<property>=<value>"),
        ]);
        let names = Row::new(1, vec!["taxon".to_string(), "color".to_string()]);
        let sink = CollectingSink::new();

        let with_names = rendered(&s, &t, &hierarchy, &[2], Some(&names), &sink);
        assert_eq!(with_names, "A{color=red\n}\n");

        // Without column names the placeholder stays as-is.
        let without_names = rendered(&s, &t, &hierarchy, &[2], None, &sink);
        assert_eq!(without_names, "A{<property>=red\n}\n");
    }

    #[test]
    fn property_template_chain_prefers_the_property_column() {
        let hierarchy = [1];
        let t = tree(&[&["A", "v2", "v3"]], &hierarchy);
        let s = settings(&[
            ("defaultElementTemplate", "<id>{<properties>}"),
            ("defaultPropertyTemplate", "default:<value>"),
            ("column3PropertyTemplate", "per-property:<value>"),
        ]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[2, 3], None, &sink);

        assert_eq!(out, "A{default:v2\nper-property:v3\n}\n");
    }

    #[test]
    fn node_level_property_template_beats_the_default() {
        let hierarchy = [1];
        let t = tree(&[&["A", "v"]], &hierarchy);
        let s = settings(&[
            ("defaultElementTemplate", "<id>{<properties>}"),
            ("defaultPropertyTemplate", "default:<value>"),
            ("column1PropertyTemplate", "per-level:<value>"),
        ]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[2], None, &sink);

        assert_eq!(out, "A{per-level:v\n}\n");
    }

    #[test]
    fn empty_property_values_are_omitted() {
        let hierarchy = [1];
        let t = tree(&[&["A", ""]], &hierarchy);
        let s = settings(&[
            ("defaultElementTemplate", "<id>{<properties>}"),
            ("defaultPropertyTemplate", "p=<value>"),
        ]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[2], None, &sink);

        assert_eq!(out, "A{}\n");
        assert!(sink.is_empty());
    }

    #[test]
    fn missing_property_template_omits_the_property_with_a_warning() {
        let hierarchy = [1];
        let t = tree(&[&["A", "v"]], &hierarchy);
        let s = settings(&[("defaultElementTemplate", "<id>{<properties>}")]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[2], None, &sink);

        assert_eq!(out, "A{}\n");
        assert_eq!(
            sink.collected(),
            vec![Diagnostic::MissingPropertyTemplate {
                property_column: 2,
                id: "A".to_string(),
                name: "A".to_string(),
            }]
        );
    }

    #[test]
    fn gap_nodes_render_in_their_parents_group() {
        // "C" sits at level 3 directly under the level-1 node "A"; it is
        // emitted when A's children are printed, after the level-2 child "B"
        // that entered A's child map in an earlier pass.
        let hierarchy = [1, 2, 3];
        let t = tree(&[&["A", "", "C"], &["A", "B", ""]], &hierarchy);
        let s = settings(&[("defaultElementTemplate", "<id>")]);
        let sink = CollectingSink::new();

        let out = rendered(&s, &t, &hierarchy, &[], None, &sink);

        assert_eq!(out, "A\nB\nC\n");
    }
}
