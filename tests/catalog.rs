//! ADM catalog ingestion, `uses` dependency resolution, and constraint
//! checking, exercised the way a caller would build a catalog from raw
//! JSON documents rather than hand-built [`AdmFile`] values.

use ari_toolkit::adm::AdmCatalog;
use ari_toolkit::check::Checker;
use serde_json::json;

fn amp_agent_json() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "Mdat": [
            {"name": "name", "value": "amp_agent"},
            {"name": "namespace", "value": "IANA:AMP.AGENT"},
            {"name": "enum", "value": "20"},
            {"name": "version", "value": "1.0"},
        ],
        "Ctrl": [
            {"name": "reset", "description": "reset the agent"},
        ],
        "Rptt": [
            {"name": "full_report", "definition": []},
        ],
    }))
    .unwrap()
}

fn amp_core_json() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "uses": ["IANA:AMP.AGENT"],
        "Mdat": [
            {"name": "name", "value": "amp_core"},
            {"name": "namespace", "value": "IANA:AMP.CORE"},
            {"name": "enum", "value": "10"},
            {"name": "version", "value": "1.0"},
        ],
        "Var": [
            {"name": "uptime", "type": "UINT"},
        ],
    }))
    .unwrap()
}

#[test]
fn load_from_data_ingests_a_single_document() {
    let mut catalog = AdmCatalog::new();
    catalog.load_from_data(&amp_agent_json(), true).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.by_norm_name("amp_agent").is_ok());
    assert!(catalog.by_enum(20).is_ok());
}

/// An ADM referencing a namespace that is not yet loaded stays pending
/// until its dependency arrives, then resolves in the same pass the
/// dependency is inserted (spec.md §4.3 "Dependency ordering").
#[test]
fn uses_dependency_holds_dependent_pending_until_resolved() {
    let mut catalog = AdmCatalog::new();
    catalog.load_from_data(&amp_core_json(), true).unwrap();
    assert_eq!(catalog.len(), 0);
    assert_eq!(catalog.pending_names(), vec!["amp_core"]);

    catalog.load_from_data(&amp_agent_json(), true).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.pending_names().is_empty());
    assert!(catalog.by_norm_name("amp_core").is_ok());
}

/// Loading the same ADM twice with `del_dupe` replaces the old entry
/// rather than accumulating duplicates.
#[test]
fn reloading_with_del_dupe_replaces_the_prior_entry() {
    let mut catalog = AdmCatalog::new();
    catalog.load_from_data(&amp_agent_json(), true).unwrap();
    catalog.load_from_data(&amp_agent_json(), true).unwrap();
    assert_eq!(catalog.len(), 1);
}

/// Without `del_dupe`, both copies remain loaded.
#[test]
fn reloading_without_del_dupe_keeps_both_copies() {
    let mut catalog = AdmCatalog::new();
    catalog.load_from_data(&amp_agent_json(), false).unwrap();
    catalog.load_from_data(&amp_agent_json(), false).unwrap();
    assert_eq!(catalog.len(), 2);
}

/// A directory scan picks up every `*.json` file except `index.json`, and
/// ignores non-JSON files, matching the original's non-recursive
/// `os.scandir`-based discovery.
#[test]
fn load_from_dir_reads_every_json_file_except_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("amp_agent.json"), amp_agent_json()).unwrap();
    std::fs::write(dir.path().join("amp_core.json"), amp_core_json()).unwrap();
    std::fs::write(dir.path().join("index.json"), b"{}").unwrap();
    std::fs::write(dir.path().join("README.md"), b"not json").unwrap();

    let mut catalog = AdmCatalog::new();
    let count = catalog.load_from_dir(dir.path()).unwrap();
    assert_eq!(count, 2);
    assert_eq!(catalog.len(), 2);
}

/// `load_default_dirs` loads every directory handed to it plus anything
/// named in `ADM_PATH`.
#[test]
fn load_default_dirs_reads_caller_dirs_and_adm_path() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    std::fs::write(a.path().join("amp_agent.json"), amp_agent_json()).unwrap();
    std::fs::write(b.path().join("amp_core.json"), amp_core_json()).unwrap();

    std::env::set_var("ADM_PATH", b.path());
    let mut catalog = AdmCatalog::new();
    let total = catalog
        .load_default_dirs(&[a.path().to_path_buf()])
        .unwrap();
    std::env::remove_var("ADM_PATH");

    assert_eq!(total, 2);
    assert_eq!(catalog.len(), 2);
}

/// The standard constraint registry flags a same-name collision across
/// two distinct ADMs, and flags nothing for a single well-formed ADM.
#[test]
fn checker_flags_duplicate_adm_names_and_accepts_a_clean_catalog() {
    let mut clean = AdmCatalog::new();
    clean.load_from_data(&amp_agent_json(), true).unwrap();
    let issues = Checker::new().check(&clean, None);
    assert!(
        issues.iter().all(|i| i.check_name != "unique_adm_names"),
        "unexpected unique_adm_names issue: {issues:?}"
    );

    let mut dupes = AdmCatalog::new();
    dupes.load_from_data(&amp_agent_json(), false).unwrap();
    dupes.load_from_data(&amp_agent_json(), false).unwrap();
    let issues = Checker::new().check(&dupes, None);
    assert!(issues.iter().any(|i| i.check_name == "unique_adm_names"));
}

/// An ADM missing required metadata (here, no declared `version`) is
/// flagged by `minimal_metadata` when checked on its own.
#[test]
fn checker_flags_missing_minimal_metadata() {
    let doc = json!({
        "Mdat": [
            {"name": "name", "value": "incomplete"},
            {"name": "namespace", "value": "IANA:INCOMPLETE"},
            {"name": "enum", "value": "99"},
        ],
    });
    let mut catalog = AdmCatalog::new();
    catalog
        .load_from_data(&serde_json::to_vec(&doc).unwrap(), true)
        .unwrap();

    let issues = Checker::new().check(&catalog, None);
    assert!(issues.iter().any(|i| i.check_name == "minimal_metadata"));
}

/// Re-encoding an ingested ADM back to JSON omits empty sections and the
/// per-child positional `enum`.
#[test]
fn encode_adm_round_trips_through_decode() {
    use ari_toolkit::adm::{decode_adm, encode_adm};

    let value: serde_json::Value = serde_json::from_slice(&amp_agent_json()).unwrap();
    let adm = decode_adm(value, None, None).unwrap();
    let encoded = encode_adm(&adm);

    let reencoded = decode_adm(encoded, None, None).unwrap();
    assert_eq!(reencoded.norm_name, adm.norm_name);
    assert_eq!(reencoded.ctrl.len(), adm.ctrl.len());
    assert_eq!(reencoded.rptt.len(), adm.rptt.len());
}
