use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PyfilesError, Result};

/// Interpreter version driving the bytecode cache naming scheme.
///
/// Always passed in explicitly; never read from the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    /// Cache tag used in `__pycache__` file names, e.g. `cpython-39`.
    pub fn cache_tag(&self) -> String {
        format!("cpython-{}{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = PyfilesError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PyfilesError::InvalidPythonVersion {
            value: s.to_string(),
        };
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

/// Where an installed distribution's files land inside the buildroot.
///
/// `sitelib`, `sitearch` and `bindir` are abstract `/`-rooted paths; only
/// `buildroot` points at the real filesystem.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    pub buildroot: PathBuf,
    pub sitelib: PathBuf,
    pub sitearch: PathBuf,
    pub bindir: PathBuf,
    pub python_version: PythonVersion,
}

impl InstallLayout {
    /// Ordered, deduplicated site directories (sitelib and sitearch may be
    /// the same path on noarch installs).
    pub fn site_dirs(&self) -> Vec<&Path> {
        if self.sitelib == self.sitearch {
            vec![self.sitelib.as_path()]
        } else {
            vec![self.sitelib.as_path(), self.sitearch.as_path()]
        }
    }

    /// Map an abstract `/`-rooted path onto its real location under the
    /// buildroot.
    pub fn real_path(&self, abstract_path: &Path) -> PathBuf {
        let relative = abstract_path
            .strip_prefix("/")
            .unwrap_or(abstract_path);
        self.buildroot.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> InstallLayout {
        InstallLayout {
            buildroot: PathBuf::from("/builddir/buildroot"),
            sitelib: PathBuf::from("/usr/lib/python3.7/site-packages"),
            sitearch: PathBuf::from("/usr/lib64/python3.7/site-packages"),
            bindir: PathBuf::from("/usr/bin"),
            python_version: PythonVersion { major: 3, minor: 7 },
        }
    }

    #[test]
    fn test_parse_version() {
        let version: PythonVersion = "3.9".parse().unwrap();
        assert_eq!(version, PythonVersion { major: 3, minor: 9 });
        assert_eq!(version.cache_tag(), "cpython-39");
    }

    #[test]
    fn test_parse_version_rejects_garbage() {
        for bad in ["3", "three.nine", "3.9.1x", ""] {
            assert!(bad.parse::<PythonVersion>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_site_dirs_deduplicated() {
        let mut l = layout();
        assert_eq!(l.site_dirs().len(), 2);
        l.sitearch = l.sitelib.clone();
        assert_eq!(l.site_dirs(), vec![l.sitelib.as_path()]);
    }

    #[test]
    fn test_real_path_joins_under_buildroot() {
        let l = layout();
        assert_eq!(
            l.real_path(Path::new("/usr/bin/tldr")),
            PathBuf::from("/builddir/buildroot/usr/bin/tldr")
        );
    }
}
