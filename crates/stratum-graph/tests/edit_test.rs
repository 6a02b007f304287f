use stratum_graph::{CompositeEdit, Diagram, Edit, Figure, Graph, GraphError, Point, Rect};

fn sample() -> Diagram {
    let mut g = Graph::new();
    let e = g.connect("a", "b");
    let mut d = Diagram::new(g);
    d.insert_figure(Figure::node("fa", "a", Rect::new(5.0, 5.0, 40.0, 20.0)));
    d.insert_figure(Figure::node("fb", "b", Rect::new(50.0, 80.0, 40.0, 20.0)));
    d.insert_figure(Figure::edge(
        "fe",
        e,
        vec![
            Point::new(25.0, 25.0),
            Point::new(25.0, 50.0),
            Point::new(70.0, 50.0),
            Point::new(70.0, 80.0),
        ],
    ));
    d
}

#[test]
fn composite_edit_applies_in_order_and_undoes_in_reverse() {
    let mut d = sample();
    let before = d.figure("fe").unwrap().clone();

    let composite: CompositeEdit = vec![
        Edit::RemovePathPoint {
            figure: "fe".to_string(),
            index: 1,
            point: Point::new(25.0, 50.0),
        },
        Edit::RemovePathPoint {
            figure: "fe".to_string(),
            index: 1,
            point: Point::new(70.0, 50.0),
        },
        Edit::Move {
            figure: "fa".to_string(),
            from: Point::new(5.0, 5.0),
            to: Point::new(0.0, 0.0),
        },
    ]
    .into_iter()
    .collect();

    composite.apply(&mut d).unwrap();
    assert_eq!(
        d.figure("fe").unwrap().path,
        vec![Point::new(25.0, 25.0), Point::new(70.0, 80.0)]
    );
    assert_eq!(d.figure("fa").unwrap().bounds, Rect::new(0.0, 0.0, 40.0, 20.0));

    composite.undo(&mut d).unwrap();
    assert_eq!(d.figure("fe").unwrap(), &before);
    assert_eq!(d.figure("fa").unwrap().bounds, Rect::new(5.0, 5.0, 40.0, 20.0));
}

#[test]
fn composite_edit_drops_moves_that_do_not_move() {
    let mut composite = CompositeEdit::new();
    composite.push(Edit::Move {
        figure: "fa".to_string(),
        from: Point::new(1.0, 2.0),
        to: Point::new(1.0, 2.0),
    });
    assert!(composite.is_empty());

    composite.push(Edit::Move {
        figure: "fa".to_string(),
        from: Point::new(1.0, 2.0),
        to: Point::new(3.0, 2.0),
    });
    assert_eq!(composite.len(), 1);
    assert_eq!(composite.edits()[0].figure(), "fa");
}

#[test]
fn apply_reports_unknown_figures_and_bad_indices() {
    let mut d = sample();

    let err = d
        .apply(&Edit::Move {
            figure: "ghost".to_string(),
            from: Point::default(),
            to: Point::new(1.0, 1.0),
        })
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::UnknownFigure {
            id: "ghost".to_string()
        }
    );

    let err = d
        .apply(&Edit::RemovePathPoint {
            figure: "fa".to_string(),
            index: 0,
            point: Point::default(),
        })
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::PathPointOutOfRange {
            figure: "fa".to_string(),
            index: 0,
            len: 0
        }
    );
}

#[test]
fn diagram_validate_checks_bindings() {
    let mut d = sample();
    assert!(d.validate().is_ok());

    d.insert_figure(Figure::node("fz", "z", Rect::default()));
    assert_eq!(
        d.validate().unwrap_err(),
        GraphError::UnknownNode {
            id: "z".to_string()
        }
    );
    d.remove_figure("fz");

    d.insert_figure(Figure::edge("fx", "x->y", Vec::new()));
    assert_eq!(
        d.validate().unwrap_err(),
        GraphError::UnknownEdge {
            id: "x->y".to_string()
        }
    );
}

#[test]
fn insert_figure_replaces_in_place_and_remove_keeps_order() {
    let mut d = sample();
    d.insert_figure(Figure::decoration("note", Rect::new(0.0, 0.0, 10.0, 10.0)));
    d.insert_figure(Figure::node("fa", "a", Rect::new(1.0, 1.0, 1.0, 1.0)));

    assert_eq!(d.figure_ids(), vec!["fa", "fb", "fe", "note"]);
    assert_eq!(d.figure("fa").unwrap().bounds, Rect::new(1.0, 1.0, 1.0, 1.0));

    assert!(d.remove_figure("fb").is_some());
    assert_eq!(d.figure_ids(), vec!["fa", "fe", "note"]);
    assert_eq!(d.figure_ix("note"), Some(2));
    assert_eq!(d.figure_for_node("a").map(|f| f.id.as_str()), Some("fa"));
}

#[test]
fn edits_serialize_with_a_kind_tag() {
    let edit = Edit::Move {
        figure: "fa".to_string(),
        from: Point::new(0.0, 0.0),
        to: Point::new(10.0, 5.0),
    };
    let json = serde_json::to_value(&edit).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "move",
            "figure": "fa",
            "from": { "x": 0.0, "y": 0.0 },
            "to": { "x": 10.0, "y": 5.0 }
        })
    );
    let back: Edit = serde_json::from_value(json).unwrap();
    assert_eq!(back, edit);
}
