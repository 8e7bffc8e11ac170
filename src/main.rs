use clap::{Parser, Subcommand};
use pagewright::build::build_site;
use pagewright::config::SiteConfig;
use pagewright::plugin;
use std::path::PathBuf;

/// A static site generator for a small personal website.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site and publish it when a deploy target is configured.
    Build {
        /// Project directory to search for `site.yaml` (defaults to the
        /// current directory).
        #[arg(long)]
        project: Option<PathBuf>,

        /// Override the configured output directory (relative to the
        /// project root).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Skip the deploy step even when a target is configured.
        #[arg(long)]
        no_deploy: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build {
            project,
            output,
            no_deploy,
        } => {
            let project = match project {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let mut config = SiteConfig::from_directory(&project)?;
            if let Some(output) = output {
                config.output_dir = output;
            }
            build_site(&config, &[plugin::highlight_js()], !no_deploy)?;
            Ok(())
        }
    }
}
