//! Reversible edits.
//!
//! Edits carry enough state to be undone without consulting the diagram they were recorded
//! against, so an editor can store them in its own undo stack unchanged.

use crate::diagram::Diagram;
use crate::error::Result;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edit {
    /// Move a figure's top-left corner.
    Move {
        figure: String,
        from: Point,
        to: Point,
    },
    /// Remove the routing point at `index` of an edge figure's path.
    RemovePathPoint {
        figure: String,
        index: usize,
        point: Point,
    },
}

impl Edit {
    pub fn figure(&self) -> &str {
        match self {
            Edit::Move { figure, .. } | Edit::RemovePathPoint { figure, .. } => figure,
        }
    }

    /// `true` when applying the edit leaves the diagram unchanged.
    pub fn is_noop(&self) -> bool {
        match self {
            Edit::Move { from, to, .. } => from == to,
            Edit::RemovePathPoint { .. } => false,
        }
    }
}

/// A group of edits applied and undone as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeEdit {
    edits: Vec<Edit>,
}

impl CompositeEdit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edit, dropping it when it would not change anything.
    pub fn push(&mut self, edit: Edit) {
        if !edit.is_noop() {
            self.edits.push(edit);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.edits.iter()
    }

    /// Applies every edit in recording order.
    pub fn apply(&self, diagram: &mut Diagram) -> Result<()> {
        for edit in &self.edits {
            diagram.apply(edit)?;
        }
        Ok(())
    }

    /// Reverts every edit in reverse recording order.
    pub fn undo(&self, diagram: &mut Diagram) -> Result<()> {
        for edit in self.edits.iter().rev() {
            diagram.revert(edit)?;
        }
        Ok(())
    }
}

impl Extend<Edit> for CompositeEdit {
    fn extend<T: IntoIterator<Item = Edit>>(&mut self, iter: T) {
        for edit in iter {
            self.push(edit);
        }
    }
}

impl FromIterator<Edit> for CompositeEdit {
    fn from_iter<T: IntoIterator<Item = Edit>>(iter: T) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<'a> IntoIterator for &'a CompositeEdit {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}
