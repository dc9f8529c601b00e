use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use provider_vault::auth::DirectorySession;
use provider_vault::cli::{handle_admin_command, handle_model_command, handle_provider_command};
use provider_vault::config::{paths::VaultPaths, settings::Settings};
use provider_vault::crypto::EnvelopeCipher;
use provider_vault::storage::Storage;

#[derive(Parser)]
#[command(
    name = "vault",
    version,
    about = "Encrypted storage and controlled disclosure of LLM provider API keys",
    long_about = "provider-vault keeps LLM provider API keys encrypted at rest with \
                  a master secret from ENCRYPTION_SECRET, shows them masked in \
                  listings, and reveals them only to admin users."
)]
struct Cli {
    /// Act as this admin user (email)
    #[arg(long = "as", global = true, env = "PROVIDER_VAULT_ACTOR")]
    actor: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provider catalog and API key commands
    #[command(subcommand)]
    Provider(provider_vault::cli::ProviderCommands),

    /// LLM model commands
    #[command(subcommand)]
    Model(provider_vault::cli::ModelCommands),

    /// Admin user commands
    #[command(subcommand)]
    Admin(provider_vault::cli::AdminCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = VaultPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let session = DirectorySession::new(&storage.admin_users, cli.actor.as_deref());

    match cli.command {
        Some(Commands::Provider(cmd)) => {
            let cipher = EnvelopeCipher::from_env();
            handle_provider_command(&storage, &settings, &session, &cipher, cmd)?;
        }
        Some(Commands::Model(cmd)) => {
            handle_model_command(&storage, &session, cmd)?;
        }
        Some(Commands::Admin(cmd)) => {
            handle_admin_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing provider-vault at: {}", paths.base_dir().display());
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Create the first admin user with:");
            println!("  vault admin bootstrap --name <NAME> --email <EMAIL>");
        }
        Some(Commands::Config) => {
            let cipher = EnvelopeCipher::from_env();
            println!("provider-vault Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Initialized:      {}", if paths.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Default page size: {}", settings.default_page_size);
            println!("  Log filter:        {}", settings.log_filter);
            println!(
                "  Encryption secret: {}",
                if cipher.is_configured() { "set" } else { "not set" }
            );
        }
        None => {
            println!("provider-vault - encrypted LLM provider API keys");
            println!();
            println!("Run 'vault --help' for usage information.");
        }
    }

    Ok(())
}
