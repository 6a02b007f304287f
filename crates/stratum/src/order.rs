//! Crossing reduction.
//!
//! Barycenter ordering over adjacent layer pairs. Layer 0 (decorations) and layer 1 (entry nodes)
//! keep their discovery order; every deeper layer is re-sorted by weight.

use crate::layering::{ItemId, Layering};
use crate::model::BarycenterScope;
use std::cmp::Ordering;
use stratum_graph::Diagram;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Weigh against the layer below (successors).
    Below,
    /// Weigh against the layer above (predecessors).
    Above,
}

/// Reorders layers `2..` in place and rewrites every item's `position` as its rank.
///
/// `sweeps` is clamped to at least one pass.
pub fn reduce_crossings(
    layering: &mut Layering,
    diagram: &Diagram,
    scope: BarycenterScope,
    sweeps: usize,
) {
    let layer_count = layering.layer_count();
    if layer_count < 3 {
        return;
    }
    for sweep in 0..sweeps.max(1) {
        for top in 1..layer_count - 1 {
            let next = top + 1;
            assign_weights(layering, top, next, scope, Side::Below);
            assign_weights(layering, next, top, scope, Side::Above);
            if top >= 2 {
                sort_layer(layering, diagram, top);
            }
            sort_layer(layering, diagram, next);
        }
        tracing::trace!(sweep, layers = layer_count, "barycenter sweep");
    }
}

fn assign_weights(
    layering: &mut Layering,
    layer: usize,
    other: usize,
    scope: BarycenterScope,
    side: Side,
) {
    let others = layering.layer(other).to_vec();
    let layer_mean = mean(others.iter().map(|&id| layering.item(id).position));

    for id in layering.layer(layer).to_vec() {
        let weight = match scope {
            BarycenterScope::Layer => layer_mean,
            BarycenterScope::Neighbors => {
                let item = layering.item(id);
                let neighbors = match side {
                    Side::Below => &item.successors,
                    Side::Above => &item.predecessors,
                };
                mean(
                    neighbors
                        .iter()
                        .map(|&n| layering.item(n))
                        .filter(|n| n.layer == other)
                        .map(|n| n.position),
                )
            }
        };
        let item = layering.item_mut(id);
        item.weight = weight.unwrap_or(item.position as f64);
    }
}

fn mean(positions: impl Iterator<Item = usize>) -> Option<f64> {
    let (sum, count) = positions.fold((0usize, 0usize), |(s, c), p| (s + p, c + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

fn sort_layer(layering: &mut Layering, diagram: &Diagram, layer: usize) {
    let mut ids = layering.ordered_layer(layer);
    ids.sort_by(|&a, &b| {
        let wa = layering.item(a).weight;
        let wb = layering.item(b).weight;
        wa.partial_cmp(&wb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| natural_order(layering, diagram, a, b))
            .then_with(|| a.cmp(&b))
    });
    for (rank, &id) in ids.iter().enumerate() {
        layering.item_mut(id).position = rank;
    }
}

/// Items drawn by a figure come first, in the figures' natural order; the rest follow by the
/// node or edge they carry.
fn natural_order(layering: &Layering, diagram: &Diagram, a: ItemId, b: ItemId) -> Ordering {
    let figure = |id: ItemId| layering.item(id).figure().and_then(|f| diagram.figure_at(f));
    match (figure(a), figure(b)) {
        (Some(fa), Some(fb)) => fa.natural_cmp(fb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => model_key(layering, a).cmp(model_key(layering, b)),
    }
}

fn model_key(layering: &Layering, id: ItemId) -> &str {
    let item = layering.item(id);
    item.node().or_else(|| item.edge()).unwrap_or_default()
}
