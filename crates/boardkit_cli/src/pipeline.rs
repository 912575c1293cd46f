//! Shared plumbing for the CLI commands: locating the board file and
//! reporting diagnostics.

use std::path::{Path, PathBuf};

use boardkit_diagnostics::{Diagnostic, DiagnosticRenderer, Severity, TerminalRenderer};

use crate::{GlobalArgs, OutputFormat};

/// Board file used when neither a positional path nor `--config` is given.
pub const DEFAULT_BOARD: &str = "board.toml";

/// Picks the board definition to load.
///
/// An explicit per-command path wins over `--config`, which wins over
/// `board.toml` in the current directory.
pub fn resolve_board_path(explicit: Option<&Path>, global: &GlobalArgs) -> PathBuf {
    match (explicit, &global.config) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(config)) => PathBuf::from(config),
        (None, None) => PathBuf::from(DEFAULT_BOARD),
    }
}

/// Renders diagnostics to stderr. Warnings are dropped under `--quiet`.
pub fn report(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in diagnostics {
        if global.quiet && diag.severity != Severity::Error {
            continue;
        }
        eprintln!("{}", renderer.render(diag));
    }
}

/// Prints the closing error/warning tally.
pub fn summary(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    eprintln!("   Result: {} error(s), {} warning(s)", errors, warnings);
}

/// The file a compiled bindings file is written to inside an output directory.
pub fn output_file(dir: &Path, bindings: &Path, format: OutputFormat) -> PathBuf {
    let stem = bindings
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "constraints".to_string());
    dir.join(format!("{stem}.{}", format.extension()))
}
