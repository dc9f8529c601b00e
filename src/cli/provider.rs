//! Provider CLI commands
//!
//! Implements CLI commands for the provider catalog and its API keys.

use clap::Subcommand;

use crate::auth::SessionSource;
use crate::config::settings::Settings;
use crate::crypto::{EnvelopeCipher, SecretString};
use crate::display::provider::{format_provider_details, format_provider_list};
use crate::error::VaultResult;
use crate::models::ListQuery;
use crate::services::{KeyChange, NewProvider, ProviderService, ProviderUpdate};
use crate::storage::Storage;

use super::prompt_secret;

/// Provider subcommands
#[derive(Subcommand)]
pub enum ProviderCommands {
    /// Add a provider to the catalog
    Add {
        /// Provider name (unique, stored lower-case)
        name: String,
        /// Human-readable name
        #[arg(short, long)]
        display_name: String,
        /// Logo URL
        #[arg(short, long)]
        logo_url: Option<String>,
        /// API key to store (prompted with hidden input when --with-key is set)
        #[arg(long, conflicts_with = "with_key")]
        api_key: Option<String>,
        /// Prompt for an API key
        #[arg(long)]
        with_key: bool,
    },
    /// List providers with masked keys
    List {
        /// Filter by name or display name
        #[arg(short, long)]
        search: Option<String>,
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Page size (10, 25 or 50)
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Show provider details
    Show {
        /// Provider name or ID
        provider: String,
    },
    /// Edit a provider
    Edit {
        /// Provider name or ID
        provider: String,
        /// New display name
        #[arg(short, long)]
        display_name: Option<String>,
        /// New logo URL (empty to remove)
        #[arg(short, long)]
        logo_url: Option<String>,
        /// Replace the API key
        #[arg(long)]
        api_key: Option<String>,
        /// Remove the API key
        #[arg(long)]
        clear_key: bool,
    },
    /// Remove a provider and its API key
    Remove {
        /// Provider name or ID
        provider: String,
    },
    /// Store or rotate a provider's API key
    SetKey {
        /// Provider name or ID
        provider: String,
        /// API key (prompted with hidden input when omitted)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Remove a provider's API key
    ClearKey {
        /// Provider name or ID
        provider: String,
    },
    /// Print a provider's decrypted API key
    Reveal {
        /// Provider name or ID
        provider: String,
    },
}

/// Handle a provider command
pub fn handle_provider_command(
    storage: &Storage,
    settings: &Settings,
    session: &dyn SessionSource,
    cipher: &EnvelopeCipher,
    cmd: ProviderCommands,
) -> VaultResult<()> {
    let service = ProviderService::new(storage, session, cipher);

    match cmd {
        ProviderCommands::Add {
            name,
            display_name,
            logo_url,
            api_key,
            with_key,
        } => {
            let api_key = match api_key {
                Some(key) => Some(SecretString::from(key)),
                None if with_key => Some(prompt_secret("API key: ")?),
                None => None,
            };

            let provider = service.create(NewProvider {
                name,
                display_name,
                logo_url,
                api_key,
            })?;

            println!("Created provider: {}", provider.display_name);
            println!("  Name: {}", provider.name);
            println!(
                "  API key: {}",
                if provider.has_api_key() { "stored" } else { "none" }
            );
            println!("  ID: {}", provider.id);
        }

        ProviderCommands::List {
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
            print!("{}", format_provider_list(&page));
        }

        ProviderCommands::Show { provider } => {
            let found = service.resolve(&provider)?;
            let view = service.view(found.id)?;
            print!("{}", format_provider_details(&view));
        }

        ProviderCommands::Edit {
            provider,
            display_name,
            logo_url,
            api_key,
            clear_key,
        } => {
            if display_name.is_none() && logo_url.is_none() && api_key.is_none() && !clear_key {
                println!("No changes specified. Use --display-name, --logo-url, --api-key or --clear-key.");
                return Ok(());
            }

            let found = service.resolve(&provider)?;
            let updated = service.update(
                found.id,
                ProviderUpdate {
                    display_name: display_name.unwrap_or(found.display_name),
                    logo_url: logo_url.or(found.logo_url),
                    api_key: KeyChange::from_fields(api_key.map(SecretString::from), clear_key),
                },
            )?;

            println!("Updated provider: {}", updated.display_name);
        }

        ProviderCommands::Remove { provider } => {
            let found = service.resolve(&provider)?;
            let removed = service.delete(found.id)?;
            println!("Removed provider: {}", removed.display_name);
        }

        ProviderCommands::SetKey { provider, api_key } => {
            let found = service.resolve(&provider)?;
            let api_key = match api_key {
                Some(key) => SecretString::from(key),
                None => prompt_secret("API key: ")?,
            };

            service.set_api_key(found.id, &api_key)?;
            println!("API key stored for: {}", found.display_name);
        }

        ProviderCommands::ClearKey { provider } => {
            let found = service.resolve(&provider)?;
            service.clear_api_key(found.id)?;
            println!("API key cleared for: {}", found.display_name);
        }

        ProviderCommands::Reveal { provider } => {
            let found = service.resolve(&provider)?;
            let secret = service.reveal_api_key(found.id)?;
            println!("{}", secret.as_str());
        }
    }

    Ok(())
}
