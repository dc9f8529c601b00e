//! Admin user CLI commands

use clap::Subcommand;

use crate::auth::SessionSource;
use crate::config::settings::Settings;
use crate::display::admin_user::format_admin_user_list;
use crate::error::VaultResult;
use crate::models::ListQuery;
use crate::services::{AdminUserInput, AdminUserService};
use crate::storage::Storage;

/// Admin user subcommands
#[derive(Subcommand)]
pub enum AdminCommands {
    /// Create the first admin user (only while none exist)
    Bootstrap {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Sign-in email
        #[arg(short, long)]
        email: String,
    },
    /// Add an admin user
    Add {
        /// Display name
        name: String,
        /// Sign-in email
        email: String,
    },
    /// List admin users
    List {
        /// Filter by name or email
        #[arg(short, long)]
        search: Option<String>,
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Page size (10, 25 or 50)
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Edit an admin user
    Edit {
        /// Email or ID
        user: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New email
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Remove an admin user
    Remove {
        /// Email or ID
        user: String,
    },
}

/// Handle an admin user command
pub fn handle_admin_command(
    storage: &Storage,
    settings: &Settings,
    session: &dyn SessionSource,
    cmd: AdminCommands,
) -> VaultResult<()> {
    let service = AdminUserService::new(storage, session);

    match cmd {
        AdminCommands::Bootstrap { name, email } => {
            let user = AdminUserService::bootstrap(storage, AdminUserInput { name, email })?;
            println!("Created admin user: {}", user);
            println!("  ID: {}", user.id);
            println!();
            println!("Run commands as this user with '--as {}'.", user.email);
        }

        AdminCommands::Add { name, email } => {
            let user = service.create(AdminUserInput { name, email })?;
            println!("Created admin user: {}", user);
            println!("  ID: {}", user.id);
        }

        AdminCommands::List {
            search,
            page,
            page_size,
        } => {
            let mut query = ListQuery::page(page)
                .with_page_size(page_size.unwrap_or(settings.default_page_size));
            if let Some(search) = search {
                query = query.with_search(search);
            }

            let page = service.list(&query)?;
            print!("{}", format_admin_user_list(&page));
        }

        AdminCommands::Edit { user, name, email } => {
            if name.is_none() && email.is_none() {
                println!("No changes specified. Use --name or --email.");
                return Ok(());
            }

            let found = service.resolve(&user)?;
            let updated = service.update(
                found.id,
                AdminUserInput {
                    name: name.unwrap_or(found.name),
                    email: email.unwrap_or(found.email),
                },
            )?;
            println!("Updated admin user: {}", updated);
        }

        AdminCommands::Remove { user } => {
            let found = service.resolve(&user)?;
            let removed = service.delete(found.id)?;
            println!("Removed admin user: {}", removed);
        }
    }

    Ok(())
}
