//! CLI command implementations.

mod check;
mod fmt;
mod fuzzy;
mod get;
mod lint;
mod stats;

use std::fs;
use std::path::{Path, PathBuf};

use miette::{miette, Report};
use pocat::Catalog;

use crate::output::PoDiagnostic;

pub use check::{run_check, CheckArgs};
pub use fmt::{run_fmt, FmtArgs};
pub use fuzzy::run_fuzzy;
pub use get::{run_get, GetArgs};
pub use lint::{run_lint, LintArgs};
pub use stats::run_stats;

/// Arguments shared by commands that read a list of catalogs.
#[derive(Debug, clap::Args)]
pub struct FilesArgs {
    /// Catalog files (.po)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// A catalog that could not be loaded, with the exit code to report.
pub struct LoadFailure {
    pub code: i32,
    pub report: Report,
}

/// Read and parse one catalog, turning parse errors into diagnostics that
/// point at the failing line.
pub fn read_catalog(path: &Path) -> Result<Catalog, LoadFailure> {
    read_catalog_bytes(path).map(|(catalog, _)| catalog)
}

/// Like [`read_catalog`], also returning the bytes as read from disk.
pub fn read_catalog_bytes(path: &Path) -> Result<(Catalog, Vec<u8>), LoadFailure> {
    let bytes = fs::read(path).map_err(|e| LoadFailure {
        code: exitcode::NOINPUT,
        report: miette!("Cannot read {}: {}", path.display(), e),
    })?;
    match Catalog::from_file_bytes(path, &bytes) {
        Ok(catalog) => Ok((catalog, bytes)),
        Err(err) => {
            let content = String::from_utf8_lossy(&bytes);
            Err(LoadFailure {
                code: exitcode::DATAERR,
                report: PoDiagnostic::from_parse_error(path, &content, &err).into(),
            })
        }
    }
}

/// Read every catalog, stopping at the first failure.
pub fn read_catalogs(files: &[PathBuf]) -> Result<Vec<(&PathBuf, Catalog)>, LoadFailure> {
    files
        .iter()
        .map(|path| read_catalog(path).map(|catalog| (path, catalog)))
        .collect()
}

/// Print a load failure and return its exit code.
pub fn report_failure(failure: LoadFailure) -> i32 {
    eprintln!("{:?}", failure.report);
    failure.code
}
