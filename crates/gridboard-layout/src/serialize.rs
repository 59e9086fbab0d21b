#![forbid(unsafe_code)]

//! Layout serialization.
//!
//! Read-only views of the registry ordered by position: a source-code style
//! reconstruction for copy/paste and debugging, and a serde snapshot for
//! diagnostics. Neither is meant to be parsed back.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::registry::{GridItem, GridState};

/// Items ordered by `(row_start, col_start)`, ties broken by id.
#[must_use]
pub fn sorted_items(state: &GridState) -> Vec<&GridItem> {
    let mut items: Vec<&GridItem> = state.items().collect();
    items.sort_by_key(|item| (item.placement.row_start, item.placement.col_start, item.id));
    items
}

/// Render the registry as a `Layout` component with one `GridItem` per item.
#[must_use]
pub fn layout_source(state: &GridState) -> String {
    let mut out = String::new();
    out.push_str("export function Layout() {\n");
    out.push_str("  return (\n");
    out.push_str("    <div className=\"h-screen w-screen p-1\">\n");
    out.push_str("      <Grid>\n");
    for item in sorted_items(state) {
        let p = item.placement;
        let _ = writeln!(
            out,
            "        <GridItem colSpan={{{}}} rowSpan={{{}}} colStart={{{}}} rowStart={{{}}}>",
            p.col_span, p.row_span, p.col_start, p.row_start
        );
        let _ = writeln!(out, "          <{} />", item.label);
        out.push_str("        </GridItem>\n");
    }
    out.push_str("      </Grid>\n");
    out.push_str("    </div>\n");
    out.push_str("  );\n");
    out.push_str("}\n");
    out
}

/// Position-ordered copy of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub row_count: u32,
    pub items: Vec<GridItem>,
}

impl LayoutSnapshot {
    #[must_use]
    pub fn capture(state: &GridState) -> Self {
        Self {
            row_count: state.row_count(),
            items: sorted_items(state).into_iter().cloned().collect(),
        }
    }
}
