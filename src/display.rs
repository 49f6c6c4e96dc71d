//! # Legend and tooltip rendering
//!
//! Text renderers for the two pieces of UI the orrery feeds: the **legend** (one row per body,
//! in its display color) and the **tooltip** shown when the pointer hovers a body.
//!
//! ## Overview
//!
//! - [`Legend`] borrows nothing: it is a small owned snapshot of `(name, color)` rows taken
//!   from the scene, so a front end can keep it while the bodies keep moving.
//! - `Display` for [`Legend`] renders a table with [`comfy-table`], the `Color` column carrying
//!   the CSS hex form (`#rrggbb`) used for the body sphere.
//! - [`tooltip_text`] formats the hover text, `"<name> - Size: <meters> m"` with two decimals.
//!
//! ## Quick examples
//!
//! ```rust,ignore
//! let legend = orrery.legend();
//! println!("{legend}");
//!
//! if let Some(body) = orrery.query_at_pixels(x, y, w, h) {
//!     println!("{}", tooltip_text(&body));
//! }
//! ```
//!
//! [`comfy-table`]: https://crates.io/crates/comfy-table
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

use crate::pointer_query::BodyHandle;
use crate::registry::{AnimatedBody, DisplayColor};

/// One legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub color: DisplayColor,
}

/// Legend of the bodies currently in the scene, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn from_bodies<'a>(bodies: impl IntoIterator<Item = &'a AnimatedBody>) -> Self {
        Legend {
            entries: bodies
                .into_iter()
                .map(|body| LegendEntry {
                    name: body.name().to_string(),
                    color: body.display_color(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "Legend", "Color"]);

        for (i, entry) in self.entries.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i).set_alignment(CellAlignment::Right),
                Cell::new(&entry.name),
                Cell::new(entry.color.hex()),
            ]);
        }
        table
    }
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

/// Hover text for a body.
pub fn tooltip_text(body: &BodyHandle) -> String {
    format!(
        "{} - Size: {:.2} m",
        body.name, body.max_estimated_diameter_meters
    )
}
