#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod generate;
mod generator;
mod prelude;
mod providers;
mod web;

#[derive(Debug, clap::Parser)]
#[command(
    version,
    about,
    long_about = "Generate question-answer pairs from text using an LLM provider"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "QAGEN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Generate QA pairs from a text file
    Generate(generate::GenerateOptions),

    /// Serve the web form for interactive generation
    Serve(web::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(options) => generate::run(options, app.global).await,
        SubCommands::Serve(options) => web::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
