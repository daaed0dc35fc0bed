//! # Directory Scanner
//!
//! Recursively aggregates JSON documents found under a root directory.
//!
//! ## Matching
//!
//! A file is collected when its name *contains* `.json` anywhere, so
//! `train.json`, `train.jsonl.bak` and `archive.jsonbackup.txt` all match.
//! Directories are never collected, whatever their name.
//!
//! ## Order
//!
//! Entries of each directory are visited sorted by file name. A directory's
//! own files come before the contents of its subdirectories.
//!
//! ## Failure
//!
//! Any listing, read, UTF-8 or JSON error aborts the whole scan with
//! [`PrepError::ScanFailure`]. There is no partial-result mode.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tuneprep_core::PrepError;

/// Substring a file name must contain to be collected.
pub const JSON_NAME_MARKER: &str = ".json";

/// One scanned file and its parsed contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedDocument {
    /// Path of the file the payload was read from.
    pub path: PathBuf,
    /// The parsed JSON value (object, array or scalar).
    pub payload: Value,
}

/// Returns true if a file name qualifies for collection.
pub fn matches_json_name(file_name: &str) -> bool {
    file_name.contains(JSON_NAME_MARKER)
}

/// List every matching file under `root`, in scan order.
///
/// # Errors
///
/// Returns `PrepError::ScanFailure` if `root` or any directory below it
/// cannot be listed.
pub fn find_json_files(root: &Path) -> Result<Vec<PathBuf>, PrepError> {
    let mut files = Vec::new();
    walk_for_json(root, &mut files)?;
    Ok(files)
}

/// Read and parse every matching file under `root`.
///
/// # Errors
///
/// Returns `PrepError::ScanFailure` on the first directory, file or JSON
/// error. Nothing read before the failure is returned.
pub fn scan_json_files(root: &Path) -> Result<Vec<ScannedDocument>, PrepError> {
    find_json_files(root)?
        .into_iter()
        .map(|path| {
            let payload = read_json_file(&path)?;
            Ok(ScannedDocument { path, payload })
        })
        .collect()
}

/// Aggregate the parsed payload of every matching file under `root`.
///
/// # Errors
///
/// See [`scan_json_files`].
pub fn read_json_data(root: &Path) -> Result<Vec<Value>, PrepError> {
    Ok(scan_json_files(root)?
        .into_iter()
        .map(|doc| doc.payload)
        .collect())
}

/// Turn scanned payloads into records.
///
/// An array payload contributes each of its elements; any other payload
/// contributes itself. Order is preserved.
pub fn flatten_records(payloads: Vec<Value>) -> Vec<Value> {
    let mut records = Vec::with_capacity(payloads.len());
    for payload in payloads {
        match payload {
            Value::Array(items) => records.extend(items),
            other => records.push(other),
        }
    }
    records
}

fn read_json_file(path: &Path) -> Result<Value, PrepError> {
    let content = fs::read_to_string(path)
        .map_err(|e| scan_failure(path, format!("cannot read file: {e}")))?;
    serde_json::from_str(&content).map_err(|e| scan_failure(path, format!("invalid JSON: {e}")))
}

fn walk_for_json(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), PrepError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| scan_failure(dir, format!("cannot read directory: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| scan_failure(dir, format!("cannot read directory entry: {e}")))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry.path();
        match classify(&entry) {
            EntryKind::Directory => subdirs.push(path),
            EntryKind::LinkedDirectory => {}
            EntryKind::File => {
                if matches_json_name(&entry.file_name().to_string_lossy()) {
                    acc.push(path);
                }
            }
        }
    }

    for sub in subdirs {
        walk_for_json(&sub, acc)?;
    }
    Ok(())
}

enum EntryKind {
    Directory,
    /// Symlink resolving to a directory: neither descended into nor collected.
    LinkedDirectory,
    /// Regular files, symlinks to files and dangling symlinks.
    File,
}

fn classify(entry: &fs::DirEntry) -> EntryKind {
    match entry.file_type() {
        Ok(ft) if ft.is_dir() => EntryKind::Directory,
        Ok(ft) if ft.is_symlink() && entry.path().is_dir() => EntryKind::LinkedDirectory,
        Ok(_) => EntryKind::File,
        Err(_) if entry.path().is_dir() => EntryKind::Directory,
        Err(_) => EntryKind::File,
    }
}

fn scan_failure(path: &Path, reason: String) -> PrepError {
    PrepError::ScanFailure {
        path: path.display().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_json_data(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn collects_only_matching_names() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"text": "a"}"#);
        write(dir.path(), "notes.txt", "not json");
        write(dir.path(), "README.md", "# readme");
        let data = read_json_data(dir.path()).unwrap();
        assert_eq!(data, vec![json!({"text": "a"})]);
    }

    #[test]
    fn substring_match_is_not_extension_match() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "archive.jsonbackup.txt", "[1, 2]");
        write(dir.path(), "data.jsonl", r#"{"k": 1}"#);
        write(dir.path(), "json", "{}"); // no dot, no match
        let files = find_json_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["archive.jsonbackup.txt", "data.jsonl"]);
    }

    #[test]
    fn recurses_into_subdirectories_files_first() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.json", r#""root-b""#);
        write(dir.path(), "a/deep/c.json", r#""deep-c""#);
        write(dir.path(), "a/z.json", r#""a-z""#);
        write(dir.path(), "0.json", r#""root-0""#);

        let data = read_json_data(dir.path()).unwrap();
        assert_eq!(
            data,
            vec![json!("root-0"), json!("root-b"), json!("a-z"), json!("deep-c")]
        );
    }

    #[test]
    fn directory_named_like_json_is_descended_not_collected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "set.json/inner.json", "{}");
        let files = find_json_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("set.json/inner.json"));
    }

    #[test]
    fn malformed_json_aborts_scan() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"ok": true}"#);
        write(dir.path(), "b.json", r#"{"broken": "#);
        let err = read_json_data(dir.path()).unwrap_err();
        match err {
            PrepError::ScanFailure { path, reason } => {
                assert!(path.ends_with("b.json"), "unexpected path {path}");
                assert!(reason.contains("invalid JSON"));
            }
            other => panic!("Expected ScanFailure, got: {other}"),
        }
    }

    #[test]
    fn invalid_utf8_aborts_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bin.json"), [0xff, 0xfe, 0x00]).unwrap();
        let err = read_json_data(dir.path()).unwrap_err();
        assert!(matches!(err, PrepError::ScanFailure { .. }));
    }

    #[test]
    fn missing_root_is_scan_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = read_json_data(&missing).unwrap_err();
        assert!(matches!(err, PrepError::ScanFailure { .. }));
    }

    #[test]
    fn consecutive_scans_do_not_share_results() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "one.json", "1");
        write(second.path(), "two.json", "2");

        assert_eq!(read_json_data(first.path()).unwrap(), vec![json!(1)]);
        assert_eq!(read_json_data(second.path()).unwrap(), vec![json!(2)]);
        assert_eq!(read_json_data(first.path()).unwrap(), vec![json!(1)]);
    }

    #[test]
    fn scanned_documents_carry_paths() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "x.json", "[]");
        let docs = scan_json_files(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, dir.path().join("x.json"));
        assert_eq!(docs[0].payload, json!([]));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        write(outside.path(), "hidden.json", "{}");
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link.json")).unwrap();
        assert!(read_json_data(dir.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        write(outside.path(), "real.txt", r#"{"via": "link"}"#);
        std::os::unix::fs::symlink(
            outside.path().join("real.txt"),
            dir.path().join("alias.json"),
        )
        .unwrap();
        assert_eq!(
            read_json_data(dir.path()).unwrap(),
            vec![json!({"via": "link"})]
        );
    }

    #[test]
    fn flatten_expands_arrays_one_level() {
        let payloads = vec![
            json!({"text": "a"}),
            json!([{"text": "b"}, {"text": "c"}]),
            json!([[1], 2]),
            json!("scalar"),
        ];
        assert_eq!(
            flatten_records(payloads),
            vec![
                json!({"text": "a"}),
                json!({"text": "b"}),
                json!({"text": "c"}),
                json!([1]),
                json!(2),
                json!("scalar"),
            ]
        );
    }
}
