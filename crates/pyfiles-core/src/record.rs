//! RECORD manifest discovery and parsing.
//!
//! A wheel install leaves exactly one `*.dist-info/RECORD` manifest under a
//! site directory, one CSV row per installed file. Row paths are relative to
//! the site directory and may escape it with `..` segments.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{PyfilesError, Result};
use crate::layout::InstallLayout;
use crate::paths::normalize;

/// One parsed RECORD row. Hash and size are carried but unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub path: String,
    pub hash: String,
    pub size: String,
}

/// Find the single RECORD manifest under the layout's site directories.
///
/// Returns its abstract (`/`-rooted, buildroot-stripped) path. Zero matches
/// and multiple matches are both fatal.
pub fn locate_record(layout: &InstallLayout) -> Result<PathBuf> {
    let mut found = Vec::new();

    for site_dir in layout.site_dirs() {
        let real_site = layout.real_path(site_dir);
        let pattern = format!(
            "{}/*.dist-info/RECORD",
            Pattern::escape(&real_site.to_string_lossy())
        );
        if let Ok(matches) = glob::glob(&pattern) {
            found.extend(matches.filter_map(|entry| entry.ok()));
        }
    }

    match found.len() {
        0 => Err(PyfilesError::RecordNotFound {
            searched: layout
                .site_dirs()
                .into_iter()
                .map(Path::to_path_buf)
                .collect(),
        }),
        1 => {
            let record = &found[0];
            let relative = record.strip_prefix(&layout.buildroot).unwrap_or(record);
            Ok(Path::new("/").join(relative))
        }
        _ => Err(PyfilesError::MultipleRecords { found }),
    }
}

/// Read and parse a RECORD manifest from its real location.
pub fn read_record(real_path: &Path) -> Result<Vec<RecordRow>> {
    let content = fs::read_to_string(real_path)?;
    let mut rows = Vec::new();

    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        let fields = split_csv_row(line);
        let mut fields = fields.into_iter();
        rows.push(RecordRow {
            path: fields.next().unwrap_or_default(),
            hash: fields.next().unwrap_or_default(),
            size: fields.next().unwrap_or_default(),
        });
    }

    Ok(rows)
}

/// Resolve row paths against the site directory (two levels above RECORD)
/// and normalize them lexically. Manifest order and duplicates are kept.
pub fn parse_record(record_path: &Path, rows: &[RecordRow]) -> Vec<PathBuf> {
    let site_dir = record_path
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("/"));

    rows.iter()
        .map(|row| normalize(&site_dir.join(&row.path)))
        .collect()
}

/// Split one CSV row: comma-separated, double-quote quoting, `""` escapes.
///
/// The reference corpus carries no CSV crate, and RECORD rows are flat
/// three-field lines, so this stays hand-written.
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PythonVersion;
    use std::fs;
    use tempfile::TempDir;

    const SITELIB: &str = "/usr/lib/python3.7/site-packages";
    const SITEARCH: &str = "/usr/lib64/python3.7/site-packages";

    fn layout(buildroot: &Path) -> InstallLayout {
        InstallLayout {
            buildroot: buildroot.to_path_buf(),
            sitelib: PathBuf::from(SITELIB),
            sitearch: PathBuf::from(SITEARCH),
            bindir: PathBuf::from("/usr/bin"),
            python_version: PythonVersion { major: 3, minor: 7 },
        }
    }

    fn plant_record(buildroot: &Path, abstract_path: &str) {
        let dest = buildroot.join(abstract_path.trim_start_matches('/'));
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, "pkg/__init__.py,sha256=abc,42\n").unwrap();
    }

    #[test]
    fn test_locate_record_single() {
        let tmp = TempDir::new().unwrap();
        let abstract_path = format!("{SITELIB}/tldr-0.5.dist-info/RECORD");
        plant_record(tmp.path(), &abstract_path);

        let located = locate_record(&layout(tmp.path())).unwrap();
        assert_eq!(located, PathBuf::from(abstract_path));
    }

    #[test]
    fn test_locate_record_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = locate_record(&layout(tmp.path())).unwrap_err();
        assert!(matches!(err, PyfilesError::RecordNotFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_locate_record_ambiguous() {
        let tmp = TempDir::new().unwrap();
        plant_record(tmp.path(), &format!("{SITELIB}/tldr-0.5.dist-info/RECORD"));
        plant_record(
            tmp.path(),
            &format!("{SITEARCH}/tensorflow-2.1.0.dist-info/RECORD"),
        );

        let err = locate_record(&layout(tmp.path())).unwrap_err();
        assert!(matches!(err, PyfilesError::MultipleRecords { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_locate_record_ignores_misplaced_record() {
        // A RECORD outside any *.dist-info directory does not count.
        let tmp = TempDir::new().unwrap();
        plant_record(tmp.path(), "/usr/lib/RECORD");
        let err = locate_record(&layout(tmp.path())).unwrap_err();
        assert!(matches!(err, PyfilesError::RecordNotFound { .. }));
    }

    #[test]
    fn test_split_csv_row_plain() {
        assert_eq!(
            split_csv_row("requests/__init__.py,sha256=abc,123"),
            vec!["requests/__init__.py", "sha256=abc", "123"]
        );
    }

    #[test]
    fn test_split_csv_row_quoted_comma() {
        assert_eq!(
            split_csv_row(r#""weird, name.py",sha256=abc,123"#),
            vec!["weird, name.py", "sha256=abc", "123"]
        );
    }

    #[test]
    fn test_split_csv_row_escaped_quote() {
        assert_eq!(
            split_csv_row(r#""he said ""hi"".py",,"#),
            vec![r#"he said "hi".py"#, "", ""]
        );
    }

    #[test]
    fn test_parse_record_kerberos() {
        let record_path =
            PathBuf::from(format!("{SITEARCH}/kerberos-1.3.0.dist-info/RECORD"));
        let rows: Vec<RecordRow> = [
            "kerberos-1.3.0.dist-info/INSTALLER",
            "kerberos-1.3.0.dist-info/METADATA",
            "kerberos-1.3.0.dist-info/RECORD",
            "kerberos-1.3.0.dist-info/WHEEL",
            "kerberos-1.3.0.dist-info/top_level.txt",
            "kerberos.cpython-37m-x86_64-linux-gnu.so",
        ]
        .iter()
        .map(|p| RecordRow {
            path: p.to_string(),
            hash: String::new(),
            size: String::new(),
        })
        .collect();

        let parsed = parse_record(&record_path, &rows);
        let expected: Vec<PathBuf> = [
            "kerberos-1.3.0.dist-info/INSTALLER",
            "kerberos-1.3.0.dist-info/METADATA",
            "kerberos-1.3.0.dist-info/RECORD",
            "kerberos-1.3.0.dist-info/WHEEL",
            "kerberos-1.3.0.dist-info/top_level.txt",
            "kerberos.cpython-37m-x86_64-linux-gnu.so",
        ]
        .iter()
        .map(|p| Path::new(SITEARCH).join(p))
        .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_record_resolves_escapes() {
        let long = "tensorflow_core/include/tensorflow/core/common_runtime/base_collective_executor.h";
        let record_path =
            PathBuf::from(format!("{SITEARCH}/tensorflow-2.1.0.dist-info/RECORD"));
        let rows = vec![
            RecordRow {
                path: "../../../bin/toco_from_protos".to_string(),
                hash: "sha256=hello".to_string(),
                size: "289".to_string(),
            },
            RecordRow {
                path: format!("../../../lib/python3.7/site-packages/{long}"),
                hash: "sha256=darkness".to_string(),
                size: "1024".to_string(),
            },
            RecordRow {
                path: "tensorflow-2.1.0.dist-info/METADATA".to_string(),
                hash: "sha256=friend".to_string(),
                size: "2859".to_string(),
            },
        ];

        let parsed = parse_record(&record_path, &rows);
        assert_eq!(
            parsed,
            vec![
                PathBuf::from("/usr/bin/toco_from_protos"),
                Path::new(SITELIB).join(long),
                Path::new(SITEARCH).join("tensorflow-2.1.0.dist-info/METADATA"),
            ]
        );
    }

    #[test]
    fn test_read_record_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let record = tmp.path().join("RECORD");
        fs::write(
            &record,
            "tldr.py,sha256=abc,12766\ntldr-0.5.dist-info/RECORD,,\n",
        )
        .unwrap();

        let rows = read_record(&record).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].path, "tldr.py");
        assert_eq!(rows[0].size, "12766");
        assert_eq!(rows[1].path, "tldr-0.5.dist-info/RECORD");
        assert_eq!(rows[1].hash, "");
    }
}
