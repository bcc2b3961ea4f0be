//! Persisted mixtures drive the report path without re-fitting.

use std::fs;

use ires_core::storage::{read_mixture, read_report, write_json, MixtureFile, MIXTURE_FILE, REPORT_FILE};
use ires_core::{assemble_report, fit_with_config, parse_edge_list, FitConfig, IresError, ReportOptions};

const NETWORK: &str = "\
# core ring with two spurs
core1 core2 10
core2 core3 10
core3 core4 10
core4 core1 10
core1 edge1 2
core3 edge2 2
edge1 edge2 1
core2 core1 5
";

#[test]
fn stored_mixture_reproduces_the_report() {
    let g = parse_edge_list(NETWORK).unwrap();
    assert_eq!(g.edge_count(), 7);

    let config = FitConfig::new(12, 4, 21);
    let mixture = fit_with_config(&g, &config).unwrap();
    let file = MixtureFile::new(&g, &mixture, config, None);

    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path().join(MIXTURE_FILE), &file).unwrap();

    let options = ReportOptions::default();
    let mut outputs = Vec::new();
    for run in 0..2 {
        let stored = read_mixture(dir.path().join(MIXTURE_FILE)).unwrap();
        let reloaded = stored.to_mixture(&g).unwrap();
        let report = assemble_report(&g, &reloaded, Some(stored.parameters), &options);
        let path = dir.path().join(format!("{run}-{REPORT_FILE}"));
        write_json(&path, &report).unwrap();
        outputs.push(fs::read(&path).unwrap());
        assert_eq!(read_report(&path).unwrap(), report);
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn mixture_for_another_graph_is_rejected() {
    let g = parse_edge_list(NETWORK).unwrap();
    let mixture = fit_with_config(&g, &FitConfig::new(3, 2, 0)).unwrap();
    let file = MixtureFile::new(&g, &mixture, FitConfig::new(3, 2, 0), None);

    let smaller = parse_edge_list("core1 core2 1\ncore2 core3 1\n").unwrap();
    assert!(matches!(
        file.to_mixture(&smaller),
        Err(IresError::InvalidMixture(_))
    ));
}

#[test]
fn tampered_probabilities_are_rejected() {
    let g = parse_edge_list(NETWORK).unwrap();
    let mixture = fit_with_config(&g, &FitConfig::new(3, 2, 0)).unwrap();
    let mut file = MixtureFile::new(&g, &mixture, FitConfig::new(3, 2, 0), None);
    file.trees[0].probability += 0.5;
    assert!(matches!(
        file.to_mixture(&g),
        Err(IresError::InvalidMixture(_))
    ));
}
