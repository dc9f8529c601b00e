//! Model CLI commands
//!
//! Implements CLI commands for the LLM models offered by each provider.

use clap::Subcommand;

use crate::auth::SessionSource;
use crate::display::model::format_model_list;
use crate::error::VaultResult;
use crate::models::CostPer1k;
use crate::services::{ModelService, ModelUpdate, NewModel};
use crate::storage::Storage;

/// Model subcommands
#[derive(Subcommand)]
pub enum ModelCommands {
    /// Add a model to a provider (starts inactive)
    Add {
        /// Provider name or ID
        provider: String,
        /// Provider-side model identifier, e.g. gpt-4o
        model_id: String,
        /// Human-readable name
        #[arg(short, long)]
        display_name: String,
        /// Price per 1000 input tokens
        #[arg(long)]
        input_cost: Option<String>,
        /// Price per 1000 output tokens
        #[arg(long)]
        output_cost: Option<String>,
    },
    /// List a provider's models
    List {
        /// Provider name or ID
        provider: String,
    },
    /// Edit a model
    Edit {
        /// Provider name or ID
        provider: String,
        /// Model ID or record ID
        model: String,
        /// New display name
        #[arg(short, long)]
        display_name: Option<String>,
        /// New input cost (empty to remove)
        #[arg(long)]
        input_cost: Option<String>,
        /// New output cost (empty to remove)
        #[arg(long)]
        output_cost: Option<String>,
    },
    /// Remove a model
    Remove {
        /// Provider name or ID
        provider: String,
        /// Model ID or record ID
        model: String,
    },
    /// Activate a model, or deactivate it when already active
    Toggle {
        /// Provider name or ID
        provider: String,
        /// Model ID or record ID
        model: String,
    },
}

fn keep_cost(flag: Option<String>, current: Option<CostPer1k>) -> Option<String> {
    flag.or_else(|| current.map(|c| c.to_string()))
}

/// Handle a model command
pub fn handle_model_command(
    storage: &Storage,
    session: &dyn SessionSource,
    cmd: ModelCommands,
) -> VaultResult<()> {
    let service = ModelService::new(storage, session);

    match cmd {
        ModelCommands::Add {
            provider,
            model_id,
            display_name,
            input_cost,
            output_cost,
        } => {
            let provider = service.resolve_provider(&provider)?;
            let model = service.create(NewModel {
                provider_id: provider.id,
                model_id,
                display_name,
                input_cost,
                output_cost,
            })?;

            println!("Created model: {}", model);
            println!("  Provider: {}", provider.display_name);
            println!("  ID: {}", model.id);
        }

        ModelCommands::List { provider } => {
            let provider = service.resolve_provider(&provider)?;
            let models = service.list_for_provider(provider.id)?;
            println!("Models for {} ({})", provider.display_name, models.len());
            print!("{}", format_model_list(&models));
        }

        ModelCommands::Edit {
            provider,
            model,
            display_name,
            input_cost,
            output_cost,
        } => {
            if display_name.is_none() && input_cost.is_none() && output_cost.is_none() {
                println!("No changes specified. Use --display-name, --input-cost or --output-cost.");
                return Ok(());
            }

            let provider = service.resolve_provider(&provider)?;
            let found = service.resolve(provider.id, &model)?;
            let updated = service.update(
                found.id,
                ModelUpdate {
                    display_name: display_name.unwrap_or(found.display_name),
                    input_cost: keep_cost(input_cost, found.input_cost_per_1k),
                    output_cost: keep_cost(output_cost, found.output_cost_per_1k),
                },
            )?;

            println!("Updated model: {}", updated);
        }

        ModelCommands::Remove { provider, model } => {
            let provider = service.resolve_provider(&provider)?;
            let found = service.resolve(provider.id, &model)?;
            let removed = service.delete(found.id)?;
            println!("Removed model: {}", removed);
        }

        ModelCommands::Toggle { provider, model } => {
            let provider = service.resolve_provider(&provider)?;
            let found = service.resolve(provider.id, &model)?;
            let toggled = service.toggle_active(found.id)?;
            println!(
                "{} model: {}",
                if toggled.is_active { "Activated" } else { "Deactivated" },
                toggled
            );
        }
    }

    Ok(())
}
