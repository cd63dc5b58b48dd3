//! Tests for the CLI scenarios and their reports.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use atomweave::cli::{Cli, Commands, run_demo, run_frames, run_stress, run_types};
use atomweave::report::{StressReport, TypeJson};
use atomweave_core::{AtomError, SpaceConfig};
use clap::Parser;

fn config() -> SpaceConfig {
    SpaceConfig::with_lock_pool_size(16)
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_demo_scenario() {
    let report = run_demo(&config()).unwrap();

    assert_eq!(report.nodes.len(), 2);
    assert_eq!(report.incoming_after_install.len(), 1);
    assert_eq!(
        report.incoming_after_install[0],
        "(ListLink (ConceptNode \"A\") (ConceptNode \"B\"))"
    );
    assert!(report.incoming_after_remove.is_empty());
    assert!(report.recreated_equal);
    assert_eq!(report.truth_value, "(ctv 0.9 0.8 1)");
}

#[test]
fn test_demo_hashes_are_stable() {
    let first = run_demo(&config()).unwrap();
    let second = run_demo(&SpaceConfig::with_lock_pool_size(1)).unwrap();
    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.link, second.link);
}

#[test]
fn test_stress_has_no_lost_updates() {
    let report = run_stress(&SpaceConfig::with_lock_pool_size(2), 4, 1000).unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.observed, 4000.0);
    assert_eq!(report.lock_pool_size, 2);
}

#[test]
fn test_stress_rejects_zero_threads() {
    assert!(matches!(
        run_stress(&config(), 0, 10),
        Err(AtomError::Config(_))
    ));
}

#[test]
fn test_stress_rejects_oversized_total() {
    assert!(matches!(
        run_stress(&config(), 2, usize::MAX),
        Err(AtomError::Config(_))
    ));
    assert!(matches!(
        run_stress(&config(), 4, 1 << 52),
        Err(AtomError::Config(_))
    ));
}

#[test]
fn test_frames_scenario() {
    let report = run_frames(&config()).unwrap();

    assert_eq!(report.root_children_before, 2);
    assert_eq!(report.root_children_after_drop, 1);
    assert_eq!(report.root_entries_after_drop, 1);
    assert_eq!(report.dangling_link_entries, 1);
    assert_eq!(report.scrubbed, 1);
    assert!(report.bottom_sees_root_atoms);
    assert!(!report.root_sees_bottom_atoms);
}

#[test]
fn test_types_listing() {
    let types = run_types();
    assert_eq!(types.len(), 12);
    assert!(types.windows(2).all(|w| w[0].id < w[1].id));

    let atom_space = types.iter().find(|t| t.name == "AtomSpace").unwrap();
    assert_eq!(atom_space.kind, "frame");
    assert_eq!(atom_space.parent.as_deref(), Some("Frame"));
}

// =============================================================================
// REPORT SERIALIZATION
// =============================================================================

#[test]
fn test_stress_report_serialization() {
    let report = StressReport {
        threads: 2,
        increments: 3,
        lock_pool_size: 4,
        expected: 6.0,
        observed: 6.0,
        elapsed_ms: 1,
    };

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"threads\":2"));
    assert!(json.contains("\"observed\":6.0"));

    let back: StressReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_type_json_null_parent() {
    let json = r#"{"id":1,"name":"Node","kind":"node","parent":null}"#;
    let ty: TypeJson = serde_json::from_str(json).unwrap();
    assert_eq!(ty.parent, None);
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

#[test]
fn test_parse_stress_arguments() {
    let cli = Cli::try_parse_from([
        "atomweave",
        "--json-mode",
        "stress",
        "--threads",
        "3",
        "--increments",
        "7",
    ])
    .unwrap();

    assert!(cli.json_mode);
    match cli.command {
        Some(Commands::Stress {
            threads,
            increments,
        }) => {
            assert_eq!(threads, 3);
            assert_eq!(increments, 7);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_global_config_after_subcommand() {
    let cli = Cli::try_parse_from(["atomweave", "frames", "--config", "a.toml", "-q"]).unwrap();
    assert!(cli.quiet);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("a.toml"))
    );
    assert!(matches!(cli.command, Some(Commands::Frames)));
}
