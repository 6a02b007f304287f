//! Coordinate assignment.
//!
//! Positions are computed for horizontal layout (layers stacked top-to-bottom). Vertical layout
//! swaps the axes on the way in and swaps the resulting points back on the way out.

use crate::layering::{ItemId, Layering};
use crate::model::{Direction, LayoutOptions, Margins};
use stratum_graph::{Diagram, Edit, Point};

#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Diagram index of the figure to move; `None` for dummies, references and figure-less nodes.
    figure: Option<usize>,
    width: f64,
    height: f64,
}

/// Computes a `Move` for every real item whose figure is not already where it belongs.
pub fn assign_positions(layering: &Layering, diagram: &Diagram, options: &LayoutOptions) -> Vec<Edit> {
    let transpose = options.direction == Direction::Vertical;
    let margins = if transpose {
        options.margins.transposed()
    } else {
        options.margins
    };
    let origin = if transpose {
        options.origin.transposed()
    } else {
        options.origin
    };

    let layers: Vec<Vec<Slot>> = (0..layering.layer_count())
        .map(|layer| {
            layering
                .ordered_layer(layer)
                .into_iter()
                .filter_map(|id| slot(layering, diagram, id, transpose))
                .collect::<Vec<_>>()
        })
        .filter(|slots| !slots.is_empty())
        .collect();

    let mut edits = Vec::new();
    for (figure, to) in place_slots(&layers, margins, origin, options.layer_gap) {
        let to = if transpose { to.transposed() } else { to };
        let Some(f) = diagram.figure_at(figure) else {
            continue;
        };
        let from = f.bounds.origin();
        if from != to {
            edits.push(Edit::Move {
                figure: f.id.clone(),
                from,
                to,
            });
        }
    }
    tracing::debug!(
        layers = layers.len(),
        moves = edits.len(),
        direction = ?options.direction,
        "assigned positions"
    );
    edits
}

fn slot(layering: &Layering, diagram: &Diagram, id: ItemId, transpose: bool) -> Option<Slot> {
    let item = layering.item(id);
    if item.is_decoration() && item.edge().is_some() {
        return None;
    }
    if item.is_reference() || item.is_dummy() {
        return Some(Slot {
            figure: None,
            width: 0.0,
            height: 0.0,
        });
    }
    let figure = item.figure();
    let (width, height) = figure
        .and_then(|f| diagram.figure_at(f))
        .map(|f| (f.width(), f.height()))
        .unwrap_or((0.0, 0.0));
    let (width, height) = if transpose {
        (height, width)
    } else {
        (width, height)
    };
    Some(Slot {
        figure,
        width,
        height,
    })
}

/// Lays out non-empty layers top-to-bottom, centring each against the widest one.
fn place_slots(
    layers: &[Vec<Slot>],
    margins: Margins,
    origin: Point,
    layer_gap: f64,
) -> Vec<(usize, Point)> {
    let layer_width = |slots: &[Slot]| {
        slots.iter().map(|s| s.width).sum::<f64>() + margins.horizontal * (slots.len() + 1) as f64
    };
    let canvas_width = layers
        .iter()
        .map(|slots| layer_width(slots.as_slice()))
        .fold(0.0_f64, f64::max);
    let gap = layer_gap.max(margins.vertical);

    let mut out = Vec::new();
    let mut y = origin.y + margins.vertical;
    for slots in layers {
        let band = slots.iter().map(|s| s.height).fold(0.0_f64, f64::max);
        let padding = (canvas_width - layer_width(slots.as_slice())) / (slots.len() + 1) as f64;
        let mut x = origin.x + margins.horizontal + padding;
        for s in slots {
            if let Some(figure) = s.figure {
                out.push((figure, Point::new(x, y + (band - s.height) / 2.0)));
            }
            x += s.width + margins.horizontal + padding;
        }
        y += band + gap;
    }
    out
}
