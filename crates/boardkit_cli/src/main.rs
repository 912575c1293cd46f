//! Boardkit CLI: the command-line interface for board descriptions.
//!
//! Provides `boardkit check` to validate a board definition, `boardkit
//! resources` to list what a board declares, and `boardkit compile` to turn
//! binding files into pin and timing constraints.

#![warn(missing_docs)]

mod check;
mod compile;
mod output;
mod pipeline;
mod resources;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Boardkit: declare FPGA boards, compile pin constraints.
#[derive(Parser, Debug)]
#[command(name = "boardkit", version, about = "FPGA board description toolkit")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print per-resource and per-pin detail.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to the board definition (defaults to `board.toml`).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a board definition.
    Check(CheckArgs),
    /// List the resources and connectors a board declares.
    Resources(ResourcesArgs),
    /// Compile binding files into constraints.
    Compile(CompileArgs),
}

/// Arguments for the `boardkit check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Board definition file; overrides `--config`.
    pub board: Option<PathBuf>,
}

/// Arguments for the `boardkit resources` subcommand.
#[derive(Parser, Debug)]
pub struct ResourcesArgs {
    /// Board definition file; overrides `--config`.
    pub board: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `boardkit compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// One or more bindings files.
    #[arg(required = true, num_args = 1..)]
    pub bindings: Vec<PathBuf>,

    /// Board definition file; overrides `--config`.
    #[arg(short, long)]
    pub board: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Xdc)]
    pub format: OutputFormat,

    /// Output file, or output directory when compiling several files.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Listing format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Constraint output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Xilinx design constraints.
    Xdc,
    /// Constraint records as JSON.
    Json,
    /// Aligned port/pin table.
    Table,
}

impl OutputFormat {
    /// File extension for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xdc => "xdc",
            OutputFormat::Json => "json",
            OutputFormat::Table => "txt",
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to the board definition.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Resources(ref args) => resources::run(args, &global),
        Command::Compile(ref args) => compile::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_check_default() {
        let cli = Cli::parse_from(["boardkit", "check"]);
        match cli.command {
            Command::Check(ref args) => assert!(args.board.is_none()),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_check_with_board() {
        let cli = Cli::parse_from(["boardkit", "check", "boards/cora_z7.toml"]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.board, Some(PathBuf::from("boards/cora_z7.toml")));
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_resources_json() {
        let cli = Cli::parse_from(["boardkit", "resources", "--format", "json"]);
        match cli.command {
            Command::Resources(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Resources command"),
        }
    }

    #[test]
    fn parse_compile_defaults() {
        let cli = Cli::parse_from(["boardkit", "compile", "blinky.toml"]);
        match cli.command {
            Command::Compile(ref args) => {
                assert_eq!(args.bindings, vec![PathBuf::from("blinky.toml")]);
                assert_eq!(args.format, OutputFormat::Xdc);
                assert!(args.board.is_none());
                assert!(args.output.is_none());
            }
            _ => panic!("expected Compile command"),
        }
    }

    #[test]
    fn parse_compile_many_with_options() {
        let cli = Cli::parse_from([
            "boardkit",
            "compile",
            "a.toml",
            "b.toml",
            "--board",
            "cora.toml",
            "--format",
            "table",
            "-o",
            "out",
        ]);
        match cli.command {
            Command::Compile(ref args) => {
                assert_eq!(args.bindings.len(), 2);
                assert_eq!(args.board, Some(PathBuf::from("cora.toml")));
                assert_eq!(args.format, OutputFormat::Table);
                assert_eq!(args.output, Some(PathBuf::from("out")));
            }
            _ => panic!("expected Compile command"),
        }
    }

    #[test]
    fn compile_requires_bindings() {
        assert!(Cli::try_parse_from(["boardkit", "compile"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["boardkit", "--quiet", "--color", "never", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["boardkit", "--config", "/boards/arty.toml", "resources"]);
        assert_eq!(cli.config.as_deref(), Some("/boards/arty.toml"));
    }

    #[test]
    fn output_extensions() {
        assert_eq!(OutputFormat::Xdc.extension(), "xdc");
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Table.extension(), "txt");
    }
}
