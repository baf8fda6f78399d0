//! Lexical helpers for abstract install paths.
//!
//! All paths handled by the classifier are buildroot-relative and rooted at
//! `/`. They are compared purely lexically; nothing here touches the
//! filesystem or resolves symlinks.

use std::path::{Component, Path, PathBuf};

/// Normalize `.` and `..` components without touching the filesystem.
///
/// RECORD rows may escape their site directory via parent references
/// (e.g. `../../../bin/tool`); joining and normalizing resolves them to
/// their true absolute location.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root component.
                if let Some(last) = out.components().next_back() {
                    if last != Component::RootDir {
                        out.pop();
                    }
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Whether `child` lies strictly beneath `parent` (equal paths do not count).
pub fn is_beneath(parent: &Path, child: &Path) -> bool {
    match child.strip_prefix(parent) {
        Ok(rest) => !rest.as_os_str().is_empty(),
        Err(_) => false,
    }
}
