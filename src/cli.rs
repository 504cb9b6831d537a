use crate::config::Config;
use crate::linters::LinterKind;
use crate::orchestrator::{self, RunOptions, RunStatus};
use crate::report::Reporter;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::io::Write;
use std::path::PathBuf;

/// Arguments shared by `shlint` and `pwshlint`.
#[derive(Parser, Debug)]
#[command(version)]
pub struct LintArgs {
    /// Files or glob patterns to lint (defaults to the linter's own pattern)
    pub files: Vec<String>,

    /// Apply fixes automatically
    #[arg(long)]
    pub fix: bool,

    /// Directory name to ignore (repeatable)
    #[arg(long, value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Custom config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parses the process arguments under the given binary name and description.
pub fn parse_args(bin: &'static str, about: &'static str) -> LintArgs {
    let matches = LintArgs::command().name(bin).about(about).get_matches();
    LintArgs::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides `verbose`.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the linter of `kind` for already-parsed `args` and returns the exit
/// code.
pub fn execute(kind: LinterKind, args: LintArgs) -> i32 {
    init_tracing(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut stdout = std::io::stdout().lock();
    let mut report = Reporter::new(&mut stdout);

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report.fail(e);
            return RunStatus::EnvironmentError.exit_code();
        }
    };

    let options = RunOptions {
        patterns: args.files,
        fix: args.fix,
        ignore: config
            .ignore
            .dirs
            .iter()
            .cloned()
            .chain(args.ignore)
            .collect(),
    };

    let linter = kind.build(&config);
    let summary = orchestrator::run(linter.as_ref(), &options, &mut report);
    let _ = stdout.flush();
    summary.status.exit_code()
}
