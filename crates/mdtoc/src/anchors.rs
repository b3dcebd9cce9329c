//! The `id -> row` anchor map stamped onto a laid-out document.
//!
//! The markdown renderer does not assign identifiers to heading rows itself;
//! after layout completes, [`AnchorMap::stamp`] walks the rendered lines and
//! records where each heading landed, using the same [`crate::outline::slug`]
//! function the TOC ids come from. Stamping at layout completion (instead of
//! on a timer after the fact) means the map can never observe a stale or
//! half-rendered document, and there is no unstamped-heading failure mode.
//!
//! The map is owned by the view that produced the layout and must be rebuilt
//! whenever the source or the layout width changes: ids are width-invariant,
//! row offsets are not.

use crate::document::RenderedLine;
use crate::outline::slug;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct AnchorMap {
    offsets: HashMap<String, u32>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from rendered lines. Only heading levels 1..=3 are
    /// anchored. On a slug collision the first heading in document order
    /// keeps the id, matching `getElementById` lookup semantics.
    pub fn stamp(lines: &[RenderedLine]) -> Self {
        let mut offsets = HashMap::new();
        for (row, line) in lines.iter().enumerate() {
            let Some(mark) = &line.heading else {
                continue;
            };
            if mark.level > 3 {
                continue;
            }
            let id = slug(&mark.text);
            if id.is_empty() {
                continue;
            }
            offsets.entry(id).or_insert(row as u32);
        }
        Self { offsets }
    }

    /// Row offset of the heading stamped with `id`, if any.
    pub fn offset(&self, id: &str) -> Option<u32> {
        self.offsets.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.offsets.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }
}
