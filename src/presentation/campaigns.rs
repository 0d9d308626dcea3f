use crate::application::services::IterableService;
use crate::infrastructure::output::{OutputFormat, render_campaigns};
use anyhow::{Context, Result};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum CampaignsCommand {
    /// Get all campaigns from Iterable
    Get {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

impl CampaignsCommand {
    pub async fn run(&self, service: &IterableService) -> Result<()> {
        match self {
            CampaignsCommand::Get { format } => {
                let campaigns = service
                    .get_campaigns()
                    .await
                    .context("error getting campaigns")?;
                print!("{}", render_campaigns(&campaigns, *format)?);
            }
        }
        Ok(())
    }
}
