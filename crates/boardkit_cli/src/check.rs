//! `boardkit check`: validates a board definition.
//!
//! Loading runs every construction check (duplicate names, pin conflicts,
//! differential widths, connector references, default clock and reset).
//! Each resource is then compiled on its own so that unconnected connector
//! slots and attribute warnings surface before any design uses the board.

use boardkit_constraints::{compile, BindingRequest, ResourceRef};
use boardkit_diagnostics::{Diagnostic, DiagnosticSink};
use boardkit_platform::{Platform, Resource};

use crate::pipeline::{report, resolve_board_path, summary};
use crate::{CheckArgs, GlobalArgs};

/// Runs the `boardkit check` command.
///
/// Returns exit code 0 if the board is clean or only has warnings, 1 if
/// there are errors.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let path = resolve_board_path(args.board.as_deref(), global);
    if !global.quiet {
        eprintln!("   Checking {}", path.display());
    }

    let platform = match boardkit_config::load_board(&path) {
        Ok(platform) => platform,
        Err(err) => {
            let diagnostics = [err.to_diagnostic().at(path.display().to_string())];
            report(&diagnostics, global);
            summary(&diagnostics, global);
            return Ok(1);
        }
    };

    let diagnostics = check_resources(&platform, global.verbose);
    report(&diagnostics, global);

    if !global.quiet {
        eprintln!(
            "   Board {}: {} resource(s), {} connector(s)",
            platform.device(),
            platform.resources().len(),
            platform.connectors().len()
        );
    }
    summary(&diagnostics, global);

    let failed = diagnostics.iter().any(|d| d.severity.is_error());
    Ok(if failed { 1 } else { 0 })
}

/// Compiles every resource in isolation and collects what it reports.
fn check_resources(platform: &Platform, verbose: bool) -> Vec<Diagnostic> {
    let sink = DiagnosticSink::new();
    for resource in platform.resources() {
        let request = BindingRequest::new().bind(
            check_signal(resource),
            ResourceRef::new(resource.name(), resource.number()),
        );
        match compile(platform, &request, &sink) {
            Ok(set) if verbose => {
                eprintln!("      {}: {} pin(s)", resource.key(), set.len());
            }
            Ok(_) => {}
            Err(err) => sink.emit(err.to_diagnostic().at(format!("resource '{}'", resource.key()))),
        }
    }
    sink.take_all()
}

fn check_signal(resource: &Resource) -> String {
    match resource.number() {
        Some(n) => format!("{}_{n}", resource.name()),
        None => resource.name().to_string(),
    }
}
