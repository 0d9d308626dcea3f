use crate::application::services::IterableService;
use crate::infrastructure::output::{OutputFormat, render_lists, render_raw};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug)]
pub enum ListsCommand {
    /// Get all lists from Iterable
    Get {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Get users in a list
    #[command(after_help = "Example: iterablectl lists users <listId> [--ids]")]
    Users {
        list_id: u64,

        /// Prefer userIds over email
        #[arg(short, long)]
        ids: bool,
    },
}

impl ListsCommand {
    pub async fn run(&self, service: &IterableService) -> Result<()> {
        match self {
            ListsCommand::Get { format } => {
                let lists = service.get_lists().await.context("error getting lists")?;
                print!("{}", render_lists(&lists, *format)?);
            }
            ListsCommand::Users { list_id, ids } => {
                let body = service
                    .get_list_users(*list_id, *ids)
                    .await
                    .context("error getting users in list")?;
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&render_raw(&body))?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
