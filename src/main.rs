use clap::Parser;
use internhub_rs::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.needs_config() {
        return cli::execute_command(&cli, None, internhub_rs::config::Environment::from_env()).await;
    }

    let (settings, environment) = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    cli::execute_command(&cli, Some(settings), environment).await
}
