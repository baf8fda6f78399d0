//! Buckets installed paths into a module-oriented model.
//!
//! Each parsed RECORD path lands in exactly one bucket; the first matching
//! rule wins. Bytecode caches are never classified on their own: every
//! script module carries a synthesized cache path instead.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use crate::layout::InstallLayout;
use crate::paths::is_beneath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Package,
    Script,
    Extension,
}

/// One importable module. A package module's file set holds exactly one
/// directory path; script and extension modules hold individual files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub kind: ModuleKind,
    pub files: BTreeSet<PathBuf>,
}

/// Logical representation of everything a RECORD manifest installed.
///
/// Built once per invocation, consumed once by the generator, never
/// mutated afterwards. Ordered containers keep the grouping independent
/// of input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedPaths {
    pub metadata_files: Vec<PathBuf>,
    pub metadata_dirs: Vec<PathBuf>,
    pub doc_files: Vec<PathBuf>,
    pub license_files: Vec<PathBuf>,
    /// Same name with different kinds coexist as distinct entries
    /// (a script and a package of the same name across site dirs).
    pub modules: BTreeMap<String, Vec<Module>>,
    pub executables: Vec<PathBuf>,
    pub other_files: Vec<PathBuf>,
    /// Non-fatal diagnostics for uncategorized files.
    pub warnings: Vec<String>,
}

const PYCACHE_DIR: &str = "__pycache__";
const DIST_INFO_SUFFIX: &str = ".dist-info";

/// Classify parsed RECORD paths against the install layout.
pub fn classify_paths(
    record_path: &Path,
    parsed: &[PathBuf],
    layout: &InstallLayout,
) -> ClassifiedPaths {
    let metadata_dir = record_path.parent().unwrap_or_else(|| Path::new("/"));

    let mut result = ClassifiedPaths {
        metadata_dirs: vec![metadata_dir.to_path_buf()],
        ..ClassifiedPaths::default()
    };

    for path in parsed {
        // Literal bytecode caches are synthesized from their script below.
        if path.extension().is_some_and(|ext| ext == "pyc") {
            continue;
        }

        // The metadata directory itself is tracked via metadata_dirs.
        if path == metadata_dir {
            continue;
        }

        if is_beneath(metadata_dir, path) {
            classify_metadata_file(path, metadata_dir, &mut result);
            continue;
        }

        if path.parent() == Some(layout.bindir.as_path()) {
            result.executables.push(path.clone());
            continue;
        }

        if classify_in_site_dirs(path, layout, &mut result) {
            continue;
        }

        result
            .warnings
            .push(format!("uncategorized file: {}", path.display()));
        result.other_files.push(path.clone());
    }

    result
}

/// License and readme files inside the metadata directory get their own
/// buckets so the generator can tag them.
fn classify_metadata_file(path: &Path, metadata_dir: &Path, result: &mut ClassifiedPaths) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    let in_licenses_dir = path
        .strip_prefix(metadata_dir)
        .ok()
        .and_then(|rel| rel.components().next())
        .is_some_and(|c| c.as_os_str() == "licenses");

    if in_licenses_dir
        || ["LICENSE", "LICENCE", "COPYING", "NOTICE"]
            .iter()
            .any(|prefix| name.starts_with(prefix))
    {
        result.license_files.push(path.to_path_buf());
    } else if name.starts_with("README") {
        result.doc_files.push(path.to_path_buf());
    } else {
        result.metadata_files.push(path.to_path_buf());
    }
}

/// Try each site directory in order; returns whether the path was claimed.
fn classify_in_site_dirs(path: &Path, layout: &InstallLayout, result: &mut ClassifiedPaths) -> bool {
    for site_dir in layout.site_dirs() {
        let Ok(relative) = path.strip_prefix(site_dir) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let mut components = relative.components();
        let Some(Component::Normal(first)) = components.next() else {
            continue;
        };
        let first = first.to_string_lossy().into_owned();

        if components.next().is_none() {
            classify_top_level_file(path, site_dir, &first, layout, result);
        } else {
            classify_nested_file(path, site_dir, &first, result);
        }
        return true;
    }
    false
}

/// A direct child of a site directory is a standalone module (or noise).
fn classify_top_level_file(
    path: &Path,
    site_dir: &Path,
    filename: &str,
    layout: &InstallLayout,
    result: &mut ClassifiedPaths,
) {
    match path.extension().and_then(|e| e.to_str()) {
        Some("so") => {
            // Extensions carry two suffixes: kerberos.cpython-37m-x86_64-linux-gnu.so
            let stem = Path::new(filename).file_stem().unwrap_or_default();
            let key = Path::new(stem)
                .file_stem()
                .unwrap_or(stem)
                .to_string_lossy()
                .into_owned();
            add_module(result, key, ModuleKind::Extension, [path.to_path_buf()]);
        }
        Some("py") => {
            let key = Path::new(filename)
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned();
            let cache = synthesized_cache_path(site_dir, &key, layout);
            add_module(
                result,
                key,
                ModuleKind::Script,
                [path.to_path_buf(), cache],
            );
        }
        _ => {
            result
                .warnings
                .push(format!("uncategorized file: {}", path.display()));
            result.other_files.push(path.to_path_buf());
        }
    }
}

/// A nested path names a package by its component directly beneath the
/// site directory; the package directory registers at most once.
fn classify_nested_file(
    path: &Path,
    site_dir: &Path,
    first: &str,
    result: &mut ClassifiedPaths,
) {
    if first == PYCACHE_DIR || first.ends_with(DIST_INFO_SUFFIX) {
        result
            .warnings
            .push(format!("uncategorized file: {}", path.display()));
        result.other_files.push(path.to_path_buf());
        return;
    }

    let package_dir = site_dir.join(first);
    add_module(result, first.to_string(), ModuleKind::Package, [package_dir]);
}

/// Merge files into an existing module of the same name and kind, or
/// register a new one. Repeated registration is idempotent.
fn add_module(
    result: &mut ClassifiedPaths,
    key: String,
    kind: ModuleKind,
    files: impl IntoIterator<Item = PathBuf>,
) {
    let entries = result.modules.entry(key).or_default();
    match entries.iter_mut().find(|m| m.kind == kind) {
        Some(module) => module.files.extend(files),
        None => entries.push(Module {
            kind,
            files: files.into_iter().collect(),
        }),
    }
}

/// Compiled-cache companion for a top-level script, e.g.
/// `/usr/lib/python3.7/site-packages/__pycache__/tldr.cpython-37{,.opt-?}.pyc`.
fn synthesized_cache_path(site_dir: &Path, stem: &str, layout: &InstallLayout) -> PathBuf {
    site_dir.join(PYCACHE_DIR).join(format!(
        "{stem}.{}{{,.opt-?}}.pyc",
        layout.python_version.cache_tag()
    ))
}
