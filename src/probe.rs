//! Optional-dependency probes.
//!
//! Each probe checks one optional capability of the runtime: a BLAS/LAPACK
//! shared library for the ML toolkit, and the NLTK resource sets the
//! language pipeline needs. Probes are independent and a miss is never
//! fatal; the server starts with that feature degraded.

use std::path::{Path, PathBuf};

/// Result of probing one optional capability.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: &'static str,
    pub available: bool,
    pub detail: String,
}

/// Shared-library names that satisfy the linear-algebra probe.
const BLAS_CANDIDATES: &[&str] = &["libopenblas.so", "libblas.so", "liblapack.so"];

/// System directories searched for shared libraries.
const DEFAULT_LIB_DIRS: &[&str] = &[
    "/usr/lib",
    "/usr/lib64",
    "/usr/lib/x86_64-linux-gnu",
    "/usr/lib/aarch64-linux-gnu",
    "/usr/local/lib",
];

/// NLTK resource sets required by the language pipeline, as
/// subdirectories of the NLTK data dir.
const NLTK_RESOURCES: &[&str] = &[
    "tokenizers/punkt",
    "corpora/stopwords",
    "corpora/wordnet",
];

/// Probe for a linear-algebra shared library in the given directories.
#[must_use]
pub fn probe_linear_algebra(lib_dirs: &[PathBuf]) -> Capability {
    for dir in lib_dirs {
        for candidate in BLAS_CANDIDATES {
            // Match both exact names and versioned ones (libblas.so.3).
            let exact = dir.join(candidate);
            if exact.exists() || versioned_exists(dir, candidate) {
                return Capability {
                    name: "linear-algebra",
                    available: true,
                    detail: format!("found {candidate} in {}", dir.display()),
                };
            }
        }
    }
    Capability {
        name: "linear-algebra",
        available: false,
        detail: "no BLAS/LAPACK shared library found".to_string(),
    }
}

fn versioned_exists(dir: &Path, stem: &str) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|entry| {
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(stem))
    })
}

/// Default shared-library search path.
#[must_use]
pub fn default_lib_dirs() -> Vec<PathBuf> {
    DEFAULT_LIB_DIRS.iter().map(PathBuf::from).collect()
}

/// Probe for the required NLTK resource sets under `nltk_data_dir`.
#[must_use]
pub fn probe_nltk_resources(nltk_data_dir: &Path) -> Capability {
    let missing: Vec<&str> = NLTK_RESOURCES
        .iter()
        .copied()
        .filter(|resource| !nltk_data_dir.join(resource).exists())
        .collect();

    if missing.is_empty() {
        Capability {
            name: "nltk-resources",
            available: true,
            detail: format!("all resources present in {}", nltk_data_dir.display()),
        }
    } else {
        Capability {
            name: "nltk-resources",
            available: false,
            detail: format!("missing: {}", missing.join(", ")),
        }
    }
}
