//! Critical-edge and bottleneck-cut analysis over fitted mixtures.

use ires_core::metrics::{detect, estimate};
use ires_core::report::analyze;
use ires_core::{assemble_report, fit, ReportOptions};
use ires_tests::{assert_partition, dumbbell, grid, ring};

#[test]
fn every_edge_is_scored_once() {
    let g = grid(4, 5);
    let mixture = fit(&g, 20, 4, 2).unwrap();
    let records = estimate(&g, &mixture);

    let mut seen: Vec<_> = records.iter().map(|r| r.edge).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), g.edge_count());
    assert_eq!(records.len(), g.edge_count());
    assert!(records.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(records.iter().all(|r| r.score >= 0.0));
}

#[test]
fn ring_congestion_is_capacity_over_detour() {
    let g = ring(5, 2.0);
    let mixture = fit(&g, 12, 3, 4).unwrap();
    let records = estimate(&g, &mixture);

    // Each ring tree drops one edge, rerouted over the other four.
    let total: f64 = records.iter().map(|r| r.score).sum();
    assert!((total - 2.0 / 4.0).abs() < 1e-9);
}

#[test]
fn bridge_is_the_sharpest_bottleneck() {
    let g = dumbbell(5);
    let mixture = fit(&g, 20, 4, 6).unwrap();
    let cuts = detect(&g, &mixture);

    let bridge = g.find_edge("l0", "r0").unwrap();
    let first = &cuts[0];
    assert_eq!(first.cutting_edge, bridge);
    assert_eq!(first.crossing_edges, 1);
    assert_eq!(first.side_size(), 5);
    assert_eq!(first.sparsity, 1.0 / 5.0);
    // Every tree contains the bridge, so its cut carries all the mass.
    assert!((first.probability - 1.0).abs() < 1e-9);
}

#[test]
fn cuts_are_partitions_in_sparsity_order() {
    let g = grid(3, 4);
    let mixture = fit(&g, 15, 3, 10).unwrap();
    let cuts = detect(&g, &mixture);

    assert!(!cuts.is_empty());
    for cut in &cuts {
        assert_partition(&g, &cut.side, cut.other_side_size);
        assert!(cut.side_size() <= cut.other_side_size);
        assert!(cut.probability > 0.0 && cut.probability <= 1.0 + 1e-9);
    }
    assert!(cuts.windows(2).all(|w| w[0].sparsity <= w[1].sparsity));

    let mut sides: Vec<_> = cuts.iter().map(|c| c.side.clone()).collect();
    sides.sort();
    sides.dedup();
    assert_eq!(sides.len(), cuts.len(), "partitions are aggregated");
}

#[test]
fn analyze_matches_the_individual_passes() {
    let g = grid(3, 3);
    let mixture = fit(&g, 10, 2, 1).unwrap();
    let (critical, cuts) = analyze(&g, &mixture);
    assert_eq!(critical, estimate(&g, &mixture));
    assert_eq!(cuts, detect(&g, &mixture));
}

#[test]
fn report_is_idempotent() {
    let g = dumbbell(4);
    let mixture = fit(&g, 10, 3, 0).unwrap();
    let options = ReportOptions::default();
    let a = assemble_report(&g, &mixture, None, &options);
    let b = assemble_report(&g, &mixture, None, &options);
    assert_eq!(a, b);
    assert_eq!(a.critical_edges.len(), g.edge_count());
}
