//! Property-based tests for the sampler, learner and analyses.

use ires_core::engine::sampler::{sample, EdgeWeights};
use ires_core::metrics::{detect, estimate};
use ires_core::{fit, Graph};
use ires_tests::{assert_partition, assert_spanning_tree};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Connected graphs: a random parent tree over `n` nodes plus extra links.
fn connected_graph() -> impl Strategy<Value = Graph> {
    (2usize..12)
        .prop_flat_map(|n| {
            let parents: Vec<_> = (1..n).map(|i| 0..i).collect();
            let extra = prop::collection::vec((0..n, 0..n, 0.1f64..10.0), 0..(2 * n));
            let capacities = prop::collection::vec(0.1f64..10.0, n - 1);
            (parents, capacities, extra)
        })
        .prop_map(|(parents, capacities, extra)| {
            let mut edges: Vec<(String, String, f64)> = parents
                .iter()
                .zip(&capacities)
                .enumerate()
                .map(|(i, (&p, &c))| (format!("n{:02}", i + 1), format!("n{p:02}"), c))
                .collect();
            edges.extend(
                extra
                    .into_iter()
                    .filter(|(a, b, _)| a != b)
                    .map(|(a, b, c)| (format!("n{a:02}"), format!("n{b:02}"), c)),
            );
            Graph::from_edges(edges).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sampler_returns_spanning_trees(g in connected_graph(), seed in any::<u64>()) {
        let weights = EdgeWeights::from_capacities(&g);
        let tree = sample(&g, &weights, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        assert_spanning_tree(&g, &tree);
    }

    #[test]
    fn mixture_is_a_distribution(g in connected_graph(), seed in 0u64..1000) {
        let mixture = fit(&g, 6, 3, seed).unwrap();
        prop_assert!(!mixture.is_empty());
        prop_assert!((mixture.total_probability() - 1.0).abs() < 1e-9);
        prop_assert!(mixture.iter().all(|c| c.probability > 0.0));
        prop_assert!(mixture
            .components()
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn fit_is_deterministic(g in connected_graph(), seed in 0u64..1000) {
        prop_assert_eq!(fit(&g, 5, 2, seed).unwrap(), fit(&g, 5, 2, seed).unwrap());
    }

    #[test]
    fn congestion_covers_each_edge_once(g in connected_graph(), seed in 0u64..1000) {
        let mixture = fit(&g, 4, 2, seed).unwrap();
        let records = estimate(&g, &mixture);
        prop_assert_eq!(records.len(), g.edge_count());
        let mut ids: Vec<_> = records.iter().map(|r| r.edge).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), g.edge_count());
        prop_assert!(records.windows(2).all(|w| w[0].score >= w[1].score));
        prop_assert!(records.iter().all(|r| r.score.is_finite() && r.score >= 0.0));
    }

    #[test]
    fn cuts_are_ranked_partitions(g in connected_graph(), seed in 0u64..1000) {
        let mixture = fit(&g, 4, 2, seed).unwrap();
        let cuts = detect(&g, &mixture);
        prop_assert!(!cuts.is_empty());
        for cut in &cuts {
            assert_partition(&g, &cut.side, cut.other_side_size);
            prop_assert!(cut.side_size() <= cut.other_side_size);
            prop_assert!(cut.crossing_edges >= 1);
        }
        prop_assert!(cuts.windows(2).all(|w| w[0].sparsity <= w[1].sparsity));
    }
}
