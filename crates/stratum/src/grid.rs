//! Grid arrangement for drawings without any layered structure.

use crate::model::LayoutOptions;
use stratum_graph::{Binding, Diagram, Edit, Point};

/// Arranges every non-edge figure of `figures` on a square-ish grid of uniform cells.
///
/// Cells are sized by the largest figure plus the margins, each figure is centred in its cell and
/// the grid starts at `options.origin`. Unknown figure ids are skipped.
pub fn arrange<S: AsRef<str>>(diagram: &Diagram, figures: &[S], options: &LayoutOptions) -> Vec<Edit> {
    let cells: Vec<_> = figures
        .iter()
        .filter_map(|id| diagram.figure(id.as_ref()))
        .filter(|f| !matches!(f.binding, Binding::Edge(_)))
        .collect();
    if cells.is_empty() {
        return Vec::new();
    }

    let columns = (cells.len() as f64).sqrt().ceil() as usize;
    let cell_width = cells.iter().map(|f| f.width()).fold(0.0_f64, f64::max)
        + 2.0 * options.margins.horizontal;
    let cell_height = cells.iter().map(|f| f.height()).fold(0.0_f64, f64::max)
        + 2.0 * options.margins.vertical;

    let mut edits = Vec::new();
    for (i, f) in cells.iter().enumerate() {
        let (row, col) = (i / columns, i % columns);
        let to = Point::new(
            options.origin.x + col as f64 * cell_width + (cell_width - f.width()) / 2.0,
            options.origin.y + row as f64 * cell_height + (cell_height - f.height()) / 2.0,
        );
        let from = f.bounds.origin();
        if from != to {
            edits.push(Edit::Move {
                figure: f.id.clone(),
                from,
                to,
            });
        }
    }
    tracing::debug!(figures = cells.len(), columns, moves = edits.len(), "grid fallback");
    edits
}
