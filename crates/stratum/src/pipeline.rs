//! Layout entry points.
//!
//! The pipeline is read-only with respect to the diagram: it returns one [`CompositeEdit`] that
//! the caller applies and records in its own undo history.

use crate::error::Result;
use crate::layering::build_layers;
use crate::model::LayoutOptions;
use crate::{grid, order, position};
use stratum_graph::{CompositeEdit, Diagram};

/// Lays out `figures` (diagram figure ids, in input order).
///
/// Path-point removals come first in the returned edit, followed by the moves. Returns `None`
/// when nothing would change.
#[tracing::instrument(level = "debug", skip_all, fields(figures = figures.len()))]
pub fn layout<S: AsRef<str>>(
    diagram: &Diagram,
    figures: &[S],
    options: &LayoutOptions,
) -> Result<Option<CompositeEdit>> {
    let mut layering = build_layers(diagram, figures)?;
    let mut edit: CompositeEdit = layering.take_removals().into_iter().collect();

    if layering.has_content() {
        order::reduce_crossings(&mut layering, diagram, options.barycenter, options.sweeps);
        edit.extend(position::assign_positions(&layering, diagram, options));
    } else {
        edit.extend(grid::arrange(diagram, figures, options));
    }

    tracing::debug!(edits = edit.len(), "layout finished");
    Ok((!edit.is_empty()).then_some(edit))
}

/// Lays out every figure of the diagram, in diagram order.
pub fn layout_all(diagram: &Diagram, options: &LayoutOptions) -> Result<Option<CompositeEdit>> {
    layout(diagram, &diagram.figure_ids(), options)
}
