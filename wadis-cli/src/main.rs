use anyhow::{Context, Result};
use clap::Parser;
use patharg::{InputArg, OutputArg};
use std::io::{Read, Write};
use std::process::exit;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wadis::Module;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON description of the module to render. If not provided or is '-', read from
    /// standard input.
    #[arg(default_value_t)]
    pub input: InputArg,

    /// Where to write the rendered text. If not provided or is '-', write to standard output.
    #[arg(short, long, default_value_t)]
    pub output: OutputArg,

    /// Enable verbose output, including a debug representation of the parsed module on
    /// standard error.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(err) = run(&cli) {
        abort(&cli, err)
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut json = String::new();
    cli.input
        .open()
        .and_then(|mut reader| reader.read_to_string(&mut json))
        .with_context(|| format!("failed to read {:#}", cli.input))?;

    let module: Module = serde_json::from_str(&json).context("failed to parse module")?;
    if cli.verbose {
        eprintln!("{module:#?}");
    }

    let text = wadis::print_module(&module).context("failed to render module")?;
    tracing::debug!(bytes = text.len(), "rendered module");

    let mut writer = cli
        .output
        .create()
        .with_context(|| format!("failed to open {:#}", cli.output))?;
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {:#}", cli.output))?;
    Ok(())
}

fn abort(cli: &Cli, err: anyhow::Error) -> ! {
    eprintln!("ERROR: {err}");

    let sources: Vec<_> = err.chain().skip(1).collect();
    if !sources.is_empty() {
        eprintln!("\nCaused by:");
        for (i, cause) in sources.iter().enumerate() {
            eprintln!("    {i}: {cause}");
        }
    }

    if cli.verbose {
        eprintln!("\nDEBUG OUTPUT:\n{err:?}");
    }

    exit(1)
}
