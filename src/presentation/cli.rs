use crate::application::services::IterableService;
use crate::domain::error::IterableError;
use crate::infrastructure::config::{API_KEY_ENV, BASE_URL_ENV, Config, DEFAULT_BASE_URL};
use crate::presentation::campaigns::CampaignsCommand;
use crate::presentation::lists::ListsCommand;
use crate::presentation::users::UsersCommand;
use anyhow::Result;
use clap::{Parser, Subcommand};

/// CLI configuration for iterablectl
#[derive(Parser, Debug)]
#[command(name = "iterablectl", version)]
#[command(about = "iterablectl - A command-line tool for Iterable API")]
#[command(
    long_about = "iterablectl is a CLI tool that allows you to interface with the Iterable API.\nYou can look up and update user profiles, merge and delete users, and inspect lists and campaigns."
)]
pub struct Cli {
    /// Iterable API key
    #[arg(short = 'k', long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Iterable API
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log each request to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage Iterable users
    #[command(subcommand)]
    Users(UsersCommand),

    /// Manage Iterable lists
    #[command(subcommand)]
    Lists(ListsCommand),

    /// Manage Iterable campaigns
    #[command(subcommand)]
    Campaigns(CampaignsCommand),
}

impl Cli {
    pub fn config(&self) -> Result<Config, IterableError> {
        Config::new(self.api_key.as_deref(), &self.base_url)
    }

    pub async fn run(&self, service: &IterableService) -> Result<()> {
        match &self.command {
            Commands::Users(command) => command.run(service).await,
            Commands::Lists(command) => command.run(service).await,
            Commands::Campaigns(command) => command.run(service).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::output::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "iterablectl",
            "campaigns",
            "get",
            "--format",
            "json",
            "-k",
            "abc",
            "--base-url",
            "http://127.0.0.1:9/api/",
        ])
        .unwrap();

        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.config().unwrap().base_url.as_str(), "http://127.0.0.1:9/api/");
        match cli.command {
            Commands::Campaigns(CampaignsCommand::Get { format }) => {
                assert_eq!(format, OutputFormat::Json)
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn format_defaults_to_table() {
        let cli = Cli::try_parse_from(["iterablectl", "lists", "get", "-k", "abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Lists(ListsCommand::Get {
                format: OutputFormat::Table
            })
        ));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["iterablectl", "lists", "get", "--format", "yaml"]).is_err());
    }
}
