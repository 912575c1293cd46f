//! `boardkit compile`: binding files to toolchain constraints.
//!
//! The board is loaded and validated once. Every bindings file is then
//! loaded and compiled against the shared platform in parallel; results are
//! reported and written in command-line order.

use std::fs;
use std::path::{Path, PathBuf};

use boardkit_constraints::{compile, ConstraintSet};
use boardkit_diagnostics::{Diagnostic, DiagnosticSink};
use boardkit_platform::Platform;
use rayon::prelude::*;

use crate::output;
use crate::pipeline::{output_file, report, resolve_board_path, summary};
use crate::{CompileArgs, GlobalArgs};

/// What compiling one bindings file produced.
struct Outcome {
    source: PathBuf,
    set: Option<ConstraintSet>,
    diagnostics: Vec<Diagnostic>,
}

/// Runs the `boardkit compile` command.
///
/// Returns exit code 0 if every bindings file compiled, 1 otherwise.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if args.bindings.len() > 1 && args.output.is_none() {
        return Err("--output <DIR> is required when compiling several bindings files".into());
    }

    let board = resolve_board_path(args.board.as_deref(), global);
    let platform = match boardkit_config::load_board(&board) {
        Ok(platform) => platform,
        Err(err) => {
            let diagnostics = [err.to_diagnostic().at(board.display().to_string())];
            report(&diagnostics, global);
            summary(&diagnostics, global);
            return Ok(1);
        }
    };

    if !global.quiet {
        eprintln!(
            "   Compiling {} bindings file(s) for {}",
            args.bindings.len(),
            platform.device()
        );
    }

    let outcomes: Vec<Outcome> = args
        .bindings
        .par_iter()
        .map(|path| compile_file(&platform, path))
        .collect();

    let several = args.bindings.len() > 1;
    if several {
        if let Some(dir) = &args.output {
            fs::create_dir_all(dir)?;
        }
    }

    let mut all = Vec::new();
    let mut failed = false;
    for outcome in outcomes {
        report(&outcome.diagnostics, global);
        match &outcome.set {
            Some(set) => {
                let name = outcome.source.display().to_string();
                let text = output::render(args.format, set, platform.device(), &name)?;
                let target = match &args.output {
                    Some(dir) if several => Some(output_file(dir, &outcome.source, args.format)),
                    other => other.clone(),
                };
                match &target {
                    Some(file) => fs::write(file, text)?,
                    None => print!("{text}"),
                }
                if !global.quiet {
                    eprintln!(
                        "   Compiled {}: {} pin(s), {} clock(s){}",
                        name,
                        set.len(),
                        set.clocks().len(),
                        target
                            .map(|t| format!(" -> {}", t.display()))
                            .unwrap_or_default()
                    );
                    if global.verbose {
                        for record in set {
                            eprintln!("      {record}");
                        }
                    }
                }
            }
            None => failed = true,
        }
        all.extend(outcome.diagnostics);
    }

    summary(&all, global);
    Ok(if failed { 1 } else { 0 })
}

/// Loads and compiles one bindings file. Errors become diagnostics located
/// at the file.
fn compile_file(platform: &Platform, path: &Path) -> Outcome {
    let location = path.display().to_string();
    let sink = DiagnosticSink::new();
    let set = match boardkit_config::load_bindings(path) {
        Ok(request) => match compile(platform, &request, &sink) {
            Ok(set) => Some(set),
            Err(err) => {
                sink.emit(err.to_diagnostic().at(location.as_str()));
                None
            }
        },
        Err(err) => {
            sink.emit(err.to_diagnostic().at(location.as_str()));
            None
        }
    };
    let diagnostics = sink
        .take_all()
        .into_iter()
        .map(|d| match d.location {
            Some(_) => d,
            None => d.at(location.as_str()),
        })
        .collect();
    Outcome {
        source: path.to_path_buf(),
        set,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;
    use tempfile::TempDir;

    const BOARD: &str = r#"
[device]
part = "xc7a35t"
package = "csg324"
speed = "1"

[defaults]
attrs = { IOSTANDARD = "LVCMOS33" }

[[resource]]
name = "clk"
pins = "E3"
dir = "i"
clock = "100MHz"

[[preset]]
kind = "leds"
pins = "H5 J5 T9 T10"
"#;

    const BLINKY: &str = r#"
[[bind]]
signal = "clk"
resource = "clk"

[[bind]]
signal = "led"
resource = "led"
number = 2
"#;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("board.toml"), BOARD).unwrap();
        fs::write(dir.path().join("blinky.toml"), BLINKY).unwrap();
        fs::write(
            dir.path().join("broken.toml"),
            "[[bind]]\nsignal = \"uart\"\nresource = \"uart\"\nnumber = 0\n",
        )
        .unwrap();
        dir
    }

    fn args(dir: &Path, bindings: &[&str], output: Option<PathBuf>) -> CompileArgs {
        CompileArgs {
            bindings: bindings.iter().map(|b| dir.join(b)).collect(),
            board: Some(dir.join("board.toml")),
            format: OutputFormat::Xdc,
            output,
        }
    }

    #[test]
    fn compile_file_success() {
        let dir = workspace();
        let platform = boardkit_config::load_board(&dir.path().join("board.toml")).unwrap();
        let outcome = compile_file(&platform, &dir.path().join("blinky.toml"));
        let set = outcome.set.unwrap();
        let pins: Vec<_> = set.pin_table().into_iter().map(|(p, pin)| format!("{p}={pin}")).collect();
        assert_eq!(pins, vec!["clk=E3", "led=T9"]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn compile_file_failure_is_located() {
        let dir = workspace();
        let platform = boardkit_config::load_board(&dir.path().join("board.toml")).unwrap();
        let path = dir.path().join("broken.toml");
        let outcome = compile_file(&platform, &path);
        assert!(outcome.set.is_none());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].code.to_string(), "B201");
        assert_eq!(
            outcome.diagnostics[0].location.as_deref(),
            Some(path.display().to_string().as_str())
        );
    }

    #[test]
    fn missing_bindings_file() {
        let dir = workspace();
        let platform = boardkit_config::load_board(&dir.path().join("board.toml")).unwrap();
        let outcome = compile_file(&platform, &dir.path().join("nope.toml"));
        assert!(outcome.set.is_none());
        assert_eq!(outcome.diagnostics[0].code.to_string(), "C301");
    }

    #[test]
    fn writes_single_output_file() {
        let dir = workspace();
        let out = dir.path().join("top.xdc");
        let code = run(&args(dir.path(), &["blinky.toml"], Some(out.clone())), &quiet()).unwrap();
        assert_eq!(code, 0);
        let xdc = fs::read_to_string(out).unwrap();
        assert!(xdc.contains("set_property LOC T9 [get_ports {led}]"));
        assert!(xdc.contains("create_clock -name clk -period 10.000 [get_ports {clk}]"));
    }

    #[test]
    fn several_files_into_directory() {
        let dir = workspace();
        let out = dir.path().join("constraints");
        let code = run(
            &args(dir.path(), &["blinky.toml", "broken.toml"], Some(out.clone())),
            &quiet(),
        )
        .unwrap();
        assert_eq!(code, 1);
        assert!(out.join("blinky.xdc").is_file());
        assert!(!out.join("broken.xdc").exists());
    }

    #[test]
    fn several_files_need_output_dir() {
        let dir = workspace();
        let result = run(&args(dir.path(), &["blinky.toml", "blinky.toml"], None), &quiet());
        assert!(result.is_err());
    }

    #[test]
    fn bad_board_exits_nonzero() {
        let dir = workspace();
        fs::write(dir.path().join("board.toml"), "[device]\npart = \"\"\n").unwrap();
        let code = run(&args(dir.path(), &["blinky.toml"], None), &quiet()).unwrap();
        assert_eq!(code, 1);
    }
}
