//! `taxogen` turns a flat delimited table into a tree-shaped taxonomy and
//! renders that tree as templated text (SKOS/XML or any placeholder-based
//! markup).
//!
//! The primary entrypoint is [`generate`], which runs the whole pipeline from
//! a [`config::Settings`] map: read the input table, repair blank hierarchy
//! cells by fill-down, build the hierarchy tree, and render it level by level
//! between optional header/footer files.
//!
//! ## How a table becomes a tree
//!
//! A run declares an ordered list of **hierarchy columns**; each one
//! contributes one level of the tree. Rows sink from the synthetic root one
//! level at a time: equal values under the same parent collapse into one
//! node, children keep first-appearance order, and a row whose deeper
//! hierarchy cells are empty comes to rest at its deepest reachable node,
//! where its **property columns** later fill the node's `<properties>` block.
//!
//! Node identifiers come from one of three policies ([`ids::IdPolicy`]):
//! name-based with `_2`/`_3` collision suffixes (the default), a plain
//! numeric counter, or dotted sibling ordinals (`1.2.1`).
//!
//! ## Quick example: in-memory pipeline
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use taxogen::config::Settings;
//! use taxogen::diagnostics::CollectingSink;
//! use taxogen::filldown;
//! use taxogen::ids::{IdAllocator, IdPolicy};
//! use taxogen::render::Renderer;
//! use taxogen::tree::HierarchyTree;
//! use taxogen::types::{Row, Table};
//!
//! let settings = Settings::from_map(BTreeMap::from([(
//!     "defaultElementTemplate".to_string(),
//!     "<elem id=\"<id>\" name=\"<name>\"/>".to_string(),
//! )]));
//! let sink = CollectingSink::new();
//! let hierarchy = vec![1, 2];
//!
//! let mut table = Table::new(vec![
//!     Row::new(1, vec!["Plantae".into(), "Rosa".into()]),
//!     Row::new(2, vec!["".into(), "Malus".into()]),
//! ]);
//! filldown::fill_down(&mut table.rows, &hierarchy, &sink);
//!
//! let mut allocator = IdAllocator::new(IdPolicy::NameBased);
//! let tree = HierarchyTree::build(table.rows, &hierarchy, &mut allocator, None, &sink);
//!
//! let renderer = Renderer::new(&settings, &hierarchy, &[], None);
//! let mut out = Vec::new();
//! renderer.render(&tree, &mut out, &sink).unwrap();
//!
//! let text = String::from_utf8(out).unwrap();
//! assert_eq!(
//!     text,
//!     "<elem id=\"Plantae\" name=\"Plantae\"/>\n\
//!      <elem id=\"Rosa\" name=\"Rosa\"/>\n\
//!      <elem id=\"Malus\" name=\"Malus\"/>\n"
//! );
//! ```
//!
//! ## Quick example: settings-file driven
//!
//! ```no_run
//! use taxogen::config::Settings;
//! use taxogen::diagnostics::StdErrSink;
//!
//! # fn main() -> Result<(), taxogen::GenerationError> {
//! let sink = StdErrSink;
//! let settings = Settings::load("taxogen.settings", &sink)?;
//! let stats = taxogen::generate(&settings, &sink)?;
//! println!("{} nodes from {} rows", stats.nodes, stats.rows);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: the flat key→value settings map, defaults, settings-file
//!   loader
//! - [`ingestion`]: CSV row source
//! - [`filldown`]: blank-cell repair for indentation-style tables
//! - [`ids`]: identifier allocation policies
//! - [`tree`]: hierarchy tree construction
//! - [`render`]: level-grouped template rendering
//! - [`generator`]: the end-to-end pipeline
//! - [`diagnostics`]: recoverable data-quality events and sinks
//! - [`error`]: fatal error type

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod filldown;
pub mod generator;
pub mod ids;
pub mod ingestion;
pub mod render;
pub mod tree;
pub mod types;

pub use error::{GenerationError, GenerationResult};
pub use generator::{generate, GenerationStats};
