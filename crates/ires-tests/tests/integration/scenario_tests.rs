//! Reference scenarios: a four-node path, a disconnected graph and invalid
//! learner parameters.

use ires_core::metrics::{detect, estimate};
use ires_core::{fit, IresError};
use ires_tests::{graph, path_abcd};

#[test]
fn path_has_a_single_tree() {
    let g = path_abcd();
    let mixture = fit(&g, 1, 1, 0).unwrap();

    assert_eq!(mixture.len(), 1);
    let component = &mixture.components()[0];
    assert_eq!(component.probability, 1.0);
    let pairs: Vec<(&str, &str)> = component
        .tree
        .edges()
        .iter()
        .map(|&id| g.edge_names(id))
        .collect();
    assert_eq!(pairs, vec![("A", "B"), ("B", "C"), ("C", "D")]);
}

#[test]
fn path_critical_edges_are_equal() {
    let g = path_abcd();
    let mixture = fit(&g, 1, 1, 0).unwrap();
    let records = estimate(&g, &mixture);

    assert_eq!(records.len(), 3);
    // Every edge is in the only tree, so nothing is rerouted.
    assert!(records.iter().all(|r| r.score == 0.0));
    // Equal scores fall back to endpoint order.
    let order: Vec<(&str, &str)> = records.iter().map(|r| g.edge_names(r.edge)).collect();
    assert_eq!(order, vec![("A", "B"), ("B", "C"), ("C", "D")]);
}

#[test]
fn path_has_three_distinct_cuts() {
    let g = path_abcd();
    let mixture = fit(&g, 1, 1, 0).unwrap();
    let cuts = detect(&g, &mixture);

    assert_eq!(cuts.len(), 3);
    let sides: Vec<Vec<&str>> = cuts
        .iter()
        .map(|c| c.side.iter().map(|&n| g.node_name(n)).collect())
        .collect();
    // The middle link splits the path evenly and is the sparsest cut.
    assert_eq!(sides, vec![vec!["A", "B"], vec!["A"], vec!["D"]]);
    assert_eq!(cuts[0].sparsity, 0.5);
    assert_eq!(cuts[1].sparsity, 1.0);
    assert_eq!(cuts[2].sparsity, 1.0);
    assert_eq!(cuts[1].other_side_size, 3);
    assert!(cuts.iter().all(|c| c.crossing_edges == 1 && c.probability == 1.0));
}

#[test]
fn disconnected_graph_produces_no_mixture() {
    let g = graph(&[("A", "B", 1.0), ("B", "C", 1.0), ("X", "Y", 2.0)]);
    match fit(&g, 5, 3, 0) {
        Err(IresError::DisconnectedGraph { components }) => assert_eq!(components, 2),
        other => panic!("expected a disconnected-graph error, got {other:?}"),
    }
}

#[test]
fn zero_iterations_is_a_parameter_error() {
    let g = path_abcd();
    assert!(matches!(fit(&g, 0, 1, 0), Err(IresError::InvalidParameter(_))));
    assert!(matches!(fit(&g, 1, 0, 0), Err(IresError::InvalidParameter(_))));
}

#[test]
fn single_edge_graph_is_fittable() {
    let g = graph(&[("A", "B", 2.0)]);
    let mixture = fit(&g, 3, 2, 9).unwrap();
    assert_eq!(mixture.len(), 1);
    let cuts = detect(&g, &mixture);
    assert_eq!(cuts.len(), 1);
    assert_eq!(cuts[0].sparsity, 1.0);
}
