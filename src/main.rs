use clap::{Parser, Subcommand};
use og_compose::{compose, config, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "og-compose")]
#[command(about = "Compose the OpenGraph share image")]
#[command(long_about = "\
Compose the OpenGraph share image

Draws a product photo, logo, headline and badge onto a 1200x630 canvas and
writes it as a PNG. Without --config, ./og-image.toml is used when present,
otherwise the stock defaults.

Missing product or logo files skip their layer. Missing fonts fall back to a
built-in face.

Run 'og-compose gen-config' to print a documented og-image.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./og-image.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render and write the image (default)
    Compose,
    /// Validate the config and report which assets and fonts resolve
    Check,
    /// Print a stock og-image.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Command::Compose) {
        Command::Compose => {
            let config = load(cli.config.as_deref())?;
            let report = compose::compose(&config)?;
            output::print_compose_output(&report);
        }
        Command::Check => {
            let config = load(cli.config.as_deref())?;
            let inspection = compose::inspect(&config)?;
            output::print_check_output(&inspection);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }
    Ok(())
}

/// An explicit `--config` must exist; otherwise look in the working directory.
fn load(path: Option<&Path>) -> Result<config::ComposerConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new("")),
    }
}
