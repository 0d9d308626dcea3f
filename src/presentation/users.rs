use crate::application::builders::update_builder::UserUpdateBuilder;
use crate::application::services::IterableService;
use crate::domain::records::MergeUsersRequest;
use crate::domain::value_objects::{DataField, UserIdentifier};
use crate::infrastructure::output::{OutputFormat, render_user};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// Get a user from Iterable by email
    Get {
        email: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Update a user in Iterable
    Update(UpdateArgs),

    /// Merge two users
    #[command(
        after_help = "Example: iterablectl users merge --from-email old@example.com --to-user-id 1234"
    )]
    Merge(MergeArgs),

    /// Delete a user from Iterable
    #[command(after_help = "Example: iterablectl users delete user@example.com")]
    Delete {
        /// Email address, or user ID with --by-userid
        identifier: String,

        /// Delete user by user ID instead of email
        #[arg(long = "by-userid")]
        by_user_id: bool,
    },
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// User email address
    #[arg(long)]
    pub email: Option<String>,

    /// User ID
    #[arg(long = "user-id")]
    pub user_id: Option<String>,

    /// Data field in key=value format (can be used multiple times)
    #[arg(long = "data-field", value_name = "KEY=VALUE")]
    pub data_fields: Vec<DataField>,

    /// JSON file containing data fields; its keys win over --data-field
    #[arg(long = "data-file", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Whether to merge nested objects
    #[arg(long)]
    pub merge_nested_objects: bool,

    /// Whether new fields should be ingested and added to the schema
    #[arg(long)]
    pub create_new_fields: bool,

    /// Whether a new user should be created if the request includes a userId
    /// that doesn't yet exist in the Iterable project
    #[arg(long)]
    pub prefer_user_id: bool,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Email of the user merged away
    #[arg(long)]
    pub from_email: Option<String>,

    /// User ID of the user merged away
    #[arg(long)]
    pub from_user_id: Option<String>,

    /// Email of the user that remains
    #[arg(long)]
    pub to_email: Option<String>,

    /// User ID of the user that remains
    #[arg(long)]
    pub to_user_id: Option<String>,
}

impl UsersCommand {
    pub async fn run(&self, service: &IterableService) -> Result<()> {
        match self {
            UsersCommand::Get { email, format } => {
                let user = service.get_user(email).await.context("error getting user")?;
                print!("{}", render_user(&user, *format)?);
            }
            UsersCommand::Update(args) => {
                let update = UserUpdateBuilder::new()
                    .email(args.email.clone())
                    .user_id(args.user_id.clone())
                    .data_fields(&args.data_fields)
                    .data_file(args.data_file.as_deref())?
                    .merge_nested_objects(args.merge_nested_objects)
                    .create_new_fields(args.create_new_fields)
                    .prefer_user_id(args.prefer_user_id)
                    .build()?;
                service
                    .update_user(&update)
                    .await
                    .context("failed to update user")?;
                println!("{}", "User updated successfully".green());
            }
            UsersCommand::Merge(args) => {
                let merge = MergeUsersRequest::from_flags(
                    args.from_email.as_deref(),
                    args.from_user_id.as_deref(),
                    args.to_email.as_deref(),
                    args.to_user_id.as_deref(),
                )?;
                service
                    .merge_users(&merge)
                    .await
                    .context("error merging users")?;
                println!("{}", "Users merged successfully".green());
            }
            UsersCommand::Delete {
                identifier,
                by_user_id,
            } => {
                let target = if *by_user_id {
                    UserIdentifier::UserId(identifier.clone())
                } else {
                    UserIdentifier::Email(identifier.clone())
                };
                let deleted = match &target {
                    UserIdentifier::Email(email) => service.delete_user(email).await,
                    UserIdentifier::UserId(user_id) => service.delete_user_by_id(user_id).await,
                };
                deleted.context("error deleting user")?;
                println!(
                    "{}",
                    format!(
                        "User with {} '{}' successfully deleted",
                        target.kind(),
                        target.value()
                    )
                    .green()
                );
            }
        }
        Ok(())
    }
}
