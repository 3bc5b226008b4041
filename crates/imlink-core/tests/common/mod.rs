//! Shared test fixtures

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use imlink_core::{InMemoryReferenceStore, InputColumns, LinkConfig, NameStyle, ReferenceRecord};

/// Config for an input file with `doi`, `work_id` and `authors` columns,
/// authors separated by `;`.
pub fn config(orgs: &[&str]) -> LinkConfig {
    LinkConfig {
        input_columns: InputColumns {
            doi: Some("doi".to_string()),
            work_id: Some("work_id".to_string()),
            authors: Some("authors".to_string()),
            author_separator: Some(";".to_string()),
        },
        organization_names: orgs.iter().map(|o| o.to_string()).collect(),
        input_name_style: NameStyle::LastInitial,
        ..LinkConfig::default()
    }
}

pub fn record(work_id: &str, doi: &str, author: &str, affiliation: &str) -> ReferenceRecord {
    ReferenceRecord::new(Some(work_id), Some(doi), author, affiliation)
}

/// Reference corpus around one known work `10.1/x` by John Smith at Acme Labs
pub fn acme_store() -> InMemoryReferenceStore {
    [
        record("W1", "10.1/x", "Smith, John", "Acme Labs"),
        record("W1", "10.1/x", "Roe, Richard", "Elsewhere College"),
        record("W2", "10.1/y", "Doe, Jane", "Acme Labs"),
        record("W3", "10.1/z", "Moe, Max", "Unrelated Institute"),
    ]
    .into_iter()
    .collect()
}

/// Write `contents` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap_or_else(|e| panic!("Failed to write {name}: {e}"));
    path
}

/// Read a CSV written by a run into header plus rows
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}
