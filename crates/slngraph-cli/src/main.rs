#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use cmd::RunContext;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "slng: project dependency graphs for Visual Studio solutions",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of `slngraph.toml` next to the solution.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep solution folders and other stubs nothing references.
    #[arg(long, global = true)]
    keep_stubs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Graph",
        about = "List project summaries in build order",
        long_about = "List every project with its path, references, SDK and target frameworks, in build order.",
        after_help = "EXAMPLES:\n    # Summaries for a solution\n    slng projects App.sln\n\n    # Emit machine-readable output\n    slng projects App.sln --json"
    )]
    Projects(cmd::projects::ProjectsArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Show build order",
        long_about = "Show the order projects must build in, with leaf and root levels.",
        after_help = "EXAMPLES:\n    # Build order\n    slng order App.sln\n\n    # Group into parallel build waves\n    slng order App.sln --waves"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Show dependencies of one project",
        long_about = "Show direct, transitive and pure dependencies of a project, plus its dependents.",
        after_help = "EXAMPLES:\n    # Inspect a project (names are case-insensitive)\n    slng deps App.sln web.api\n\n    # Emit machine-readable output\n    slng deps App.sln Web.Api --json"
    )]
    Deps(cmd::deps::DepsArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Print dependency trees for every project",
        long_about = "Print the full dependency tree of every project, or the tree of its dependents with --reverse.",
        after_help = "EXAMPLES:\n    # Dependency trees\n    slng report App.sln\n\n    # Dependent trees as dense JSON\n    slng report App.sln --reverse --dense --json"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Render the graph as GraphViz DOT",
        long_about = "Render the dependency graph as GraphViz DOT. Non-pure edges are dashed, or dropped with --pure-only.",
        after_help = "EXAMPLES:\n    # Pipe into graphviz\n    slng dot App.sln | dot -Tsvg > deps.svg\n\n    # Write a top-to-bottom graph of pure edges\n    slng dot App.sln --pure-only --rankdir TB -o deps.dot"
    )]
    Dot(cmd::dot::DotArgs),

    #[command(
        next_help_heading = "Solution",
        about = "Show the solution folder tree",
        long_about = "Show solution folders and the projects nested in them.",
        after_help = "EXAMPLES:\n    # Folder tree\n    slng tree App.sln\n\n    # Emit machine-readable output\n    slng tree App.sln --json"
    )]
    Tree(cmd::tree::TreeArgs),

    #[command(
        next_help_heading = "Solution",
        about = "List references to unknown projects",
        long_about = "List project references whose target is not part of the solution.",
        after_help = "EXAMPLES:\n    # Dangling references\n    slng unresolved App.sln"
    )]
    Unresolved(cmd::unresolved::UnresolvedArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    slng completions bash > /etc/bash_completion.d/slng"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

impl Commands {
    /// The solution the command operates on, if any.
    fn solution(&self) -> Option<&Path> {
        let args = match self {
            Self::Projects(args) => &args.solution,
            Self::Order(args) => &args.solution,
            Self::Deps(args) => &args.solution,
            Self::Report(args) => &args.solution,
            Self::Dot(args) => &args.solution,
            Self::Tree(args) => &args.solution,
            Self::Unresolved(args) => &args.solution,
            Self::Completions(_) => return None,
        };
        Some(&args.solution)
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SLNGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "slngraph=debug,info"
        } else {
            "slngraph=info,warn"
        })
    });

    let format = env::var("SLNGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: &mut OutputMode) -> anyhow::Result<()> {
    let config = config::load_config(cli.command.solution(), cli.config.as_deref())?;
    *output = resolve_output_mode(cli.format, cli.json, config.output.format);
    debug!(?output, ?config, "resolved settings");

    let ctx = RunContext {
        config,
        output: *output,
        keep_stubs: cli.keep_stubs,
    };

    match &cli.command {
        Commands::Projects(args) => cmd::projects::run_projects(args, &ctx),
        Commands::Order(args) => cmd::order::run_order(args, &ctx),
        Commands::Deps(args) => cmd::deps::run_deps(args, &ctx),
        Commands::Report(args) => cmd::report::run_report(args, &ctx),
        Commands::Dot(args) => cmd::dot::run_dot(args, &ctx),
        Commands::Tree(args) => cmd::tree::run_tree(args, &ctx),
        Commands::Unresolved(args) => cmd::unresolved::run_unresolved(args, &ctx),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    // Errors before the config is read still honour the flags and env.
    let mut output = resolve_output_mode(cli.format, cli.json, None);
    match run(&cli, &mut output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            if render_error(output, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["slng", "projects", "App.sln", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Projects(_)));
    }

    #[test]
    fn format_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["slng", "--format", "text", "order", "App.sln"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn global_flags_default_off() {
        let cli = Cli::parse_from(["slng", "tree", "App.sln"]);
        assert!(!cli.verbose);
        assert!(!cli.json);
        assert!(!cli.keep_stubs);
        assert!(cli.format.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn keep_stubs_and_config_parse() {
        let cli = Cli::parse_from([
            "slng",
            "projects",
            "App.sln",
            "--keep-stubs",
            "--config",
            "ci.toml",
        ]);
        assert!(cli.keep_stubs);
        assert_eq!(cli.config.as_deref(), Some(Path::new("ci.toml")));
    }

    #[test]
    fn order_waves_flag() {
        let cli = Cli::parse_from(["slng", "order", "App.sln", "--waves"]);
        match cli.command {
            Commands::Order(args) => assert!(args.waves),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn deps_takes_project_name() {
        let cli = Cli::parse_from(["slng", "deps", "App.sln", "Web.Api"]);
        match cli.command {
            Commands::Deps(args) => {
                assert_eq!(args.project, "Web.Api");
                assert_eq!(args.solution.solution, PathBuf::from("App.sln"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn dot_parses_rankdir_case_insensitively() {
        let cli = Cli::parse_from([
            "slng", "dot", "App.sln", "--rankdir", "tb", "--pure-only", "-o", "out.dot",
        ]);
        match cli.command {
            Commands::Dot(args) => {
                assert_eq!(args.rankdir, Some(slngraph_core::report::RankDir::TopBottom));
                assert!(args.pure_only);
                assert_eq!(args.output, Some(PathBuf::from("out.dot")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bad_rankdir_is_rejected() {
        let result = Cli::try_parse_from(["slng", "dot", "App.sln", "--rankdir", "diagonal"]);
        assert!(result.is_err());
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["slng", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
        assert!(cli.command.solution().is_none());
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["slng", "projects", "a.sln"],
            vec!["slng", "order", "a.sln"],
            vec!["slng", "deps", "a.sln", "Core"],
            vec!["slng", "report", "a.sln", "--reverse", "--dense"],
            vec!["slng", "dot", "a.sln"],
            vec!["slng", "tree", "a.sln"],
            vec!["slng", "unresolved", "a.sln"],
            vec!["slng", "completions", "zsh"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "Failed to parse: {args:?}: {:?}", result.err());
        }
    }

    #[test]
    fn clap_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
