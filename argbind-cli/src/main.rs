use std::path::{Path, PathBuf};

use anyhow::Result;
use argbind_core::Manifest;
use argbind_render::{CliRenderer, DisplayType, HelpData, Renderer};
use clap::{Parser, ValueEnum};
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML manifest declaring the parameters
    #[arg(long, short)]
    manifest: PathBuf,

    /// Output format for the bound values
    #[arg(long, value_enum, default_value_t = Output::Pretty)]
    output: Output,

    /// Print the usage text instead of binding
    #[arg(long)]
    usage: bool,

    /// Color the usage text
    #[arg(long)]
    color: bool,

    /// Log binding decisions to stderr
    #[arg(long)]
    debug: bool,

    /// Tokens to bind, given after `--`
    #[arg(last = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    Pretty,
    Raw,
}

impl From<Output> for DisplayType {
    fn from(output: Output) -> Self {
        match output {
            Output::Pretty => DisplayType::Pretty,
            Output::Raw => DisplayType::Raw,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let manifest = Manifest::load(&cli.manifest)?;
    let renderer = CliRenderer::new(cli.color);

    if cli.usage {
        let program = manifest.program_name(file_stem(&cli.manifest));
        let help = HelpData::from_registry(program, &manifest.registry()?);
        print!("{}", renderer.render_usage(&help)?);
        return Ok(());
    }

    debug!(manifest = %cli.manifest.display(), tokens = cli.tokens.len(), "binding");

    let mut interpreter = manifest.interpreter()?.arguments(cli.tokens);
    interpreter.run()?;

    let values = interpreter.registry().to_json();
    println!("{}", renderer.render(&values, &cli.output.into())?);
    Ok(())
}

fn file_stem(path: &Path) -> &str {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("program")
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        "argbind=debug,argbind_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
