use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap_complete::Shell;

use laub::config::RenderConfig;
use laub::output::{print_error, Output, OutputFormat};
use laub::render::render;

#[derive(Parser)]
#[command(name = "laub")]
#[command(about = "Render a hyperlinked LaTeX dirtree appendix from a directory tree")]
#[command(version = env!("LAUB_VERSION"))]
struct Cli {
    /// Directory to render the tree from
    #[arg(value_name = "ROOT")]
    root: Option<PathBuf>,

    /// Configuration file (default: laub.yaml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Repository base URL the links point into
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Branch name used in link targets
    #[arg(long, value_name = "NAME")]
    branch: Option<String>,

    /// Top-level directory to include (repeatable; default: all)
    #[arg(long = "allow", value_name = "NAME", action = clap::ArgAction::Append)]
    allow: Vec<String>,

    /// Directory name or file extension to exclude (repeatable)
    #[arg(long = "ignore", value_name = "NAME", action = clap::ArgAction::Append)]
    ignore: Vec<String>,

    /// Output file (overwritten unconditionally)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the render summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion scripts and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let out = Output::new(format, cli.verbose);

    if let Err(e) = run(cli, &out) {
        print_error(&e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli, out: &Output) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::load_default()?,
    };

    // CLI flags override the config file
    config.merge(RenderConfig {
        root: cli.root,
        url: cli.url,
        branch: cli.branch,
        allow: cli.allow,
        ignore: cli.ignore,
        output: cli.output,
    });

    let settings = config.resolve()?;

    out.status("Rendering", &settings.root.display().to_string());
    let summary = render(&settings, out)?;

    match out.format {
        OutputFormat::Human => out.success(&format!(
            "{} directories, {} files -> {}",
            summary.directories, summary.files, summary.output
        )),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
