mod cli;
mod commands;
mod config;
mod render;

use std::io;

use clap::Parser;
use eyre::Result;
use tracing::info;

use crate::cli::{Commands, OutputArgs};
use crate::commands::{
    LoadOptions, LoadSummary, handle_config_command, handle_show_command, load_directory,
};
use crate::config::Config;
use crate::render::Renderer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::get_config_path);

    match cli.command {
        Commands::Load {
            dir,
            late_bind,
            policy,
            output,
        } => {
            let config = Config::load_from(&config_path).await?;
            let options = LoadOptions {
                late_bind,
                policy: policy.unwrap_or(config.registry.pending_policy),
                renderer: build_renderer(&config, &output)?,
            };

            let mut stdout = io::stdout().lock();
            let LoadSummary {
                files,
                rendered,
                pending,
            } = load_directory(&dir, &options, &mut stdout).await?;
            info!(files, rendered, pending, "Finished loading implementors");
        }
        Commands::Show { file, output } => {
            let config = Config::load_from(&config_path).await?;
            let renderer = build_renderer(&config, &output)?;
            let mut stdout = io::stdout().lock();
            handle_show_command(&file, &renderer, &mut stdout).await?;
        }
        Commands::Config { command } => {
            handle_config_command(command, &config_path).await?;
        }
    }

    Ok(())
}

/// Command-line flags take precedence over the configuration file.
fn build_renderer(config: &Config, output: &OutputArgs) -> Result<Renderer> {
    let base_url = match &output.base_url {
        Some(url) => Some(url.clone()),
        None => config.registry.base_url()?,
    };

    Ok(Renderer::new(output.format.unwrap_or(config.output.format))
        .with_base_url(base_url)
        .with_markup(output.show_markup || config.output.show_markup))
}
