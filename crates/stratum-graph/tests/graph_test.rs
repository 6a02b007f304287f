use stratum_graph::{Graph, GraphError};

#[test]
fn connect_creates_missing_nodes_and_fresh_anchors() {
    let mut g = Graph::new();
    let e = g.connect("a", "b");

    assert_eq!(e, "a->b");
    assert!(g.has_node("a"));
    assert!(g.has_node("b"));
    assert_eq!(g.anchors("a"), vec!["a->b@out"]);
    assert_eq!(g.anchors("b"), vec!["a->b@in"]);
    assert_eq!(g.edge_anchors("a->b").unwrap(), ("a->b@out", "a->b@in"));
    assert_eq!(g.edge_nodes("a->b").unwrap(), ("a", "b"));
}

#[test]
fn connect_names_parallel_edges_uniquely() {
    let mut g = Graph::new();
    let e1 = g.connect("a", "b");
    let e2 = g.connect("a", "b");
    let e3 = g.connect("a", "b");

    assert_eq!(e1, "a->b");
    assert_eq!(e2, "a->b#1");
    assert_eq!(e3, "a->b#2");
    assert_eq!(g.out_edges("a"), vec!["a->b", "a->b#1", "a->b#2"]);
    assert_eq!(g.successors("a"), vec!["b", "b", "b"]);
    assert_eq!(g.anchors("a").len(), 3);
}

#[test]
fn adjacency_preserves_edge_insertion_order() {
    let mut g = Graph::new();
    g.set_path(&["a", "c"]);
    g.set_path(&["a", "b"]);
    g.set_path(&["d", "b"]);

    assert_eq!(g.successors("a"), vec!["c", "b"]);
    assert_eq!(g.predecessors("b"), vec!["a", "d"]);
    assert_eq!(g.in_edges("b"), vec!["a->b", "d->b"]);
    assert!(g.out_edges("b").is_empty());
    assert!(g.successors("missing").is_empty());
}

#[test]
fn add_edge_uses_explicit_anchors() {
    let mut g = Graph::new();
    g.set_node("a").set_node("b");
    g.add_anchor("a", "a.east").unwrap();
    g.add_anchor("a", "a.south").unwrap();
    g.add_anchor("b", "b.west").unwrap();
    g.add_edge("e1", "a.south", "b.west").unwrap();

    assert_eq!(g.anchors("a"), vec!["a.east", "a.south"]);
    assert_eq!(g.anchor_node("b.west").unwrap(), "b");
    assert_eq!(g.edge_nodes("e1").unwrap(), ("a", "b"));
    assert_eq!(g.successors("a"), vec!["b"]);
}

#[test]
fn add_anchor_and_edge_reject_unknown_references() {
    let mut g = Graph::new();
    g.set_node("a");

    assert_eq!(
        g.add_anchor("nope", "x").unwrap_err(),
        GraphError::UnknownNode {
            id: "nope".to_string()
        }
    );
    g.add_anchor("a", "a.1").unwrap();
    assert_eq!(
        g.add_anchor("a", "a.1").unwrap_err(),
        GraphError::DuplicateAnchor {
            id: "a.1".to_string(),
            node: "a".to_string()
        }
    );
    assert_eq!(
        g.add_edge("e", "a.1", "ghost").unwrap_err(),
        GraphError::UnknownAnchor {
            id: "ghost".to_string()
        }
    );
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn sources_ignore_self_loops() {
    let mut g = Graph::new();
    g.connect("a", "a");
    g.connect("b", "c");

    assert_eq!(g.sources(), vec!["a", "b"]);
}

#[test]
fn remove_node_drops_anchors_and_incident_edges() {
    let mut g = Graph::new();
    g.set_path(&["a", "b", "c"]);
    assert_eq!(g.successors("a"), vec!["b"]);

    assert!(g.remove_node("b"));
    assert!(!g.remove_node("b"));
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 0);
    assert!(g.successors("a").is_empty());
    assert!(g.anchors("a").len() == 1);
    assert!(!g.has_anchor("a->b@in"));
    assert!(g.validate().is_ok());
}

#[test]
fn removed_anchor_leaves_a_dangling_edge_until_reconnected() {
    let mut g = Graph::new();
    let e = g.connect("a", "b");
    assert!(g.remove_anchor("a->b@in"));

    assert_eq!(
        g.edge_nodes(&e).unwrap_err(),
        GraphError::DanglingAnchor {
            edge: e.clone(),
            anchor: "a->b@in".to_string()
        }
    );
    assert!(g.validate().is_err());
    assert!(g.successors("a").is_empty());

    g.add_anchor("b", "b.top").unwrap();
    g.reconnect(&e, "a->b@out", "b.top").unwrap();
    assert!(g.validate().is_ok());
    assert_eq!(g.successors("a"), vec!["b"]);
}

#[test]
fn remove_edge_updates_adjacency() {
    let mut g = Graph::new();
    let ab = g.connect("a", "b");
    g.connect("a", "c");
    assert_eq!(g.successors("a"), vec!["b", "c"]);

    assert!(g.remove_edge(&ab));
    assert_eq!(g.successors("a"), vec!["c"]);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec!["a->c"]);
}

#[test]
fn clone_rebuilds_adjacency_independently() {
    let mut g = Graph::new();
    g.set_path(&["a", "b"]);
    assert_eq!(g.successors("a"), vec!["b"]);

    let mut h = g.clone();
    h.connect("a", "c");
    assert_eq!(g.successors("a"), vec!["b"]);
    assert_eq!(h.successors("a"), vec!["b", "c"]);
}
