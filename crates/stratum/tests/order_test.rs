use stratum::graph::{Diagram, Figure, Graph, Rect};
use stratum::layering::Payload;
use stratum::layering::Layering;
use stratum::order::reduce_crossings;
use stratum::{BarycenterScope, build_layers};

/// `figures` pairs a figure id with the node it draws, in input order.
fn diagram(figures: &[(&str, &str)], edges: &[(&str, &str)]) -> Diagram {
    let mut g = Graph::new();
    for (_, n) in figures {
        g.set_node(*n);
    }
    for (v, w) in edges {
        g.connect(v, w);
    }
    let mut d = Diagram::new(g);
    for (id, n) in figures {
        d.insert_figure(Figure::node(*id, *n, Rect::new(0.0, 0.0, 40.0, 20.0)));
    }
    d
}

fn ordered_nodes(l: &Layering, layer: usize) -> Vec<&str> {
    l.ordered_layer(layer)
        .into_iter()
        .map(|id| l.item(id).node().unwrap_or("?"))
        .collect()
}

/// P and Q seed layer 1; Z (below P) is discovered before Y (below Q), but Y's figure id sorts
/// first.
fn crossed() -> Diagram {
    diagram(
        &[("p", "P"), ("q", "Q"), ("b_z", "Z"), ("a_y", "Y")],
        &[("P", "Z"), ("Q", "Y")],
    )
}

#[test]
fn layer_scope_weighs_every_item_alike() {
    let d = crossed();
    let mut l = build_layers(&d, &d.figure_ids()).unwrap();
    assert_eq!(ordered_nodes(&l, 2), vec!["Z", "Y"]);

    reduce_crossings(&mut l, &d, BarycenterScope::Layer, 1);

    // Every item of layer 2 averages the whole of layer 1 (0.5), so the figure order decides.
    assert_eq!(ordered_nodes(&l, 2), vec!["Y", "Z"]);
    for &id in l.layer(2) {
        assert_eq!(l.item(id).weight, 0.5);
    }
}

#[test]
fn neighbor_scope_follows_connectivity() {
    let d = crossed();
    let mut l = build_layers(&d, &d.figure_ids()).unwrap();

    reduce_crossings(&mut l, &d, BarycenterScope::Neighbors, 1);

    assert_eq!(ordered_nodes(&l, 2), vec!["Z", "Y"]);
    let z = l.real_item("Z").unwrap();
    let y = l.real_item("Y").unwrap();
    assert_eq!(l.item(z).weight, 0.0);
    assert_eq!(l.item(y).weight, 1.0);
}

#[test]
fn entry_layer_keeps_discovery_order() {
    let d = diagram(
        &[("z_first", "A"), ("a_second", "B"), ("c", "C"), ("d", "D")],
        &[("A", "C"), ("B", "D")],
    );
    let mut l = build_layers(&d, &d.figure_ids()).unwrap();

    reduce_crossings(&mut l, &d, BarycenterScope::Layer, 3);

    assert_eq!(ordered_nodes(&l, 1), vec!["A", "B"]);
    assert_eq!(ordered_nodes(&l, 2), vec!["C", "D"]);
}

#[test]
fn neighbor_scope_untangles_a_crossing() {
    // Q -> A crosses P -> B while A sits left of B.
    let d = diagram(
        &[("p", "P"), ("q", "Q"), ("a", "A"), ("b", "B")],
        &[("P", "A"), ("P", "B"), ("Q", "A")],
    );
    let mut l = build_layers(&d, &d.figure_ids()).unwrap();
    assert_eq!(ordered_nodes(&l, 2), vec!["A", "B"]);

    reduce_crossings(&mut l, &d, BarycenterScope::Neighbors, 1);

    assert_eq!(ordered_nodes(&l, 2), vec!["B", "A"]);
    let a = l.real_item("A").unwrap();
    assert_eq!(l.item(a).position, 1);
    assert_eq!(l.item(a).weight, 0.5);
}

#[test]
fn equal_weights_follow_figure_natural_order() {
    let d = diagram(
        &[("root", "R"), ("m", "M"), ("c", "C"), ("x", "X")],
        &[("R", "M"), ("R", "C"), ("R", "X")],
    );
    let mut l = build_layers(&d, &d.figure_ids()).unwrap();
    assert_eq!(ordered_nodes(&l, 2), vec!["M", "C", "X"]);

    reduce_crossings(&mut l, &d, BarycenterScope::Layer, 1);

    let mut expected: Vec<&Figure> = ["m", "c", "x"]
        .iter()
        .map(|id| d.figure(id).unwrap())
        .collect();
    expected.sort_by(|a, b| a.natural_cmp(b));
    let expected: Vec<&str> = expected.iter().map(|f| f.node_id().unwrap()).collect();
    assert_eq!(ordered_nodes(&l, 2), expected);
    assert_eq!(ordered_nodes(&l, 2), vec!["C", "M", "X"]);
}

#[test]
fn items_without_figures_sort_after_figures() {
    // R -> Z skips a layer, so layer 2 holds a dummy (no edge figure) next to A and B.
    let d = diagram(
        &[("root", "R"), ("b", "B"), ("a", "A"), ("z", "Z")],
        &[("R", "Z"), ("R", "B"), ("R", "A"), ("A", "Z")],
    );
    let mut l = build_layers(&d, &d.figure_ids()).unwrap();

    reduce_crossings(&mut l, &d, BarycenterScope::Layer, 1);

    let layer: Vec<String> = l
        .ordered_layer(2)
        .into_iter()
        .map(|id| match &l.item(id).payload {
            Payload::EdgeDummy { edge, .. } => format!("*{edge}"),
            Payload::Node { node, .. } => node.clone(),
            Payload::Decoration { .. } => "#".to_string(),
        })
        .collect();
    assert_eq!(layer, vec!["A", "B", "*R->Z"]);
}

#[test]
fn zero_sweeps_still_run_one_pass() {
    let d = crossed();
    let mut l = build_layers(&d, &d.figure_ids()).unwrap();

    reduce_crossings(&mut l, &d, BarycenterScope::Layer, 0);

    assert_eq!(ordered_nodes(&l, 2), vec!["Y", "Z"]);
}
