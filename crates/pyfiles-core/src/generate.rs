//! Glob selection and %files-list emission.
//!
//! Flag extraction and pattern validation are two separate pure steps;
//! matching itself uses case-sensitive shell-glob semantics against module
//! names only.

use std::collections::BTreeSet;

use glob::Pattern;

use crate::classify::{ClassifiedPaths, ModuleKind};
use crate::error::{PyfilesError, Result};

/// Reserved token that requests inclusion of bindir executables.
pub const BINDIR_FLAG: &str = "+bindir";

/// Validated varargs from the save-files invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveArgs {
    /// Module globs in their original order.
    pub globs: Vec<String>,
    pub include_bindir: bool,
}

/// Split varargs into the bindir flag and validated module globs.
///
/// Tokens are checked in order and the first offender is fatal:
/// unknown `+` flags, dotted (namespaced) selectors, and patterns the
/// glob engine rejects.
pub fn parse_varargs<S: AsRef<str>>(varargs: &[S]) -> Result<SaveArgs> {
    let mut include_bindir = false;
    let mut globs = Vec::new();

    for arg in varargs {
        let arg = arg.as_ref();
        if arg == BINDIR_FLAG {
            include_bindir = true;
        } else if arg.starts_with('+') {
            return Err(PyfilesError::InvalidArgument {
                token: arg.to_string(),
            });
        } else if let Some((segment, _)) = arg.split_once('.') {
            return Err(PyfilesError::NamespacedPattern {
                pattern: arg.to_string(),
                segment: segment.to_string(),
            });
        } else {
            Pattern::new(arg).map_err(|_| PyfilesError::InvalidArgument {
                token: arg.to_string(),
            })?;
            globs.push(arg.to_string());
        }
    }

    Ok(SaveArgs {
        globs,
        include_bindir,
    })
}

/// Produce the sorted, deduplicated list of %files lines.
///
/// Every supplied glob must match at least one module name; the ones that
/// do not are reported together, in their original order.
pub fn generate_file_list(classified: &ClassifiedPaths, args: &SaveArgs) -> Result<Vec<String>> {
    let patterns: Vec<Pattern> = args
        .globs
        .iter()
        .map(|g| {
            Pattern::new(g).map_err(|_| PyfilesError::InvalidArgument { token: g.clone() })
        })
        .collect::<Result<_>>()?;

    let mut lines = BTreeSet::new();
    let mut matched = vec![false; patterns.len()];

    for (name, modules) in &classified.modules {
        let mut selected = false;
        for (pattern, hit) in patterns.iter().zip(matched.iter_mut()) {
            if pattern.matches(name) {
                *hit = true;
                selected = true;
            }
        }
        if !selected {
            continue;
        }

        for module in modules {
            for file in &module.files {
                match module.kind {
                    // Trailing slash: the directory and all its contents.
                    ModuleKind::Package => lines.insert(format!("{}/", file.display())),
                    ModuleKind::Script | ModuleKind::Extension => {
                        lines.insert(file.display().to_string())
                    }
                };
            }
        }
    }

    let unused: Vec<String> = args
        .globs
        .iter()
        .zip(&matched)
        .filter(|(_, hit)| !**hit)
        .map(|(g, _)| g.clone())
        .collect();
    if !unused.is_empty() {
        return Err(PyfilesError::UnusedPatterns { patterns: unused });
    }

    if args.include_bindir {
        for executable in &classified.executables {
            lines.insert(executable.display().to_string());
        }
    }

    for file in &classified.metadata_files {
        lines.insert(file.display().to_string());
    }
    for dir in &classified.metadata_dirs {
        lines.insert(format!("%dir {}", dir.display()));
    }
    for file in &classified.doc_files {
        lines.insert(format!("%doc {}", file.display()));
    }
    for file in &classified.license_files {
        lines.insert(format!("%license {}", file.display()));
    }

    Ok(lines.into_iter().collect())
}
