//! Strongroom CLI - command line interface for the encrypted file vault.
//!
//! Plays the role of the surrounding application: it authenticates the
//! acting user out of band, prompts for the vault password, and drives
//! the lifecycle operations against a local storage root.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use strongroom_common::{StoredId, UserId};
use strongroom_storage::LocalProvider;
use strongroom_vault::{VaultConfig, VaultManager};

#[derive(Parser)]
#[command(name = "strongroom")]
#[command(about = "Strongroom - per-user encrypted file vault")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Storage root directory.
    #[arg(short, long, default_value = ".strongroom")]
    root: PathBuf,

    /// Acting user identifier.
    #[arg(short, long)]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file into the vault. The source file is consumed.
    Lock {
        /// File to lock away.
        source: PathBuf,
    },

    /// List files currently in the vault.
    List,

    /// Decrypt a stored file and write it to a destination.
    Retrieve {
        /// Stored-file identifier, as printed by `list`.
        stored_id: String,

        /// Destination file path.
        #[arg(short, long)]
        dest: PathBuf,
    },

    /// Move a stored file to the recycle bin.
    Delete {
        /// Stored-file identifier.
        stored_id: String,
    },

    /// List files currently in the recycle bin.
    Recycle,

    /// Move a stored file from the recycle bin back to the vault.
    Restore {
        /// Stored-file identifier.
        stored_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let user = UserId::new(cli.user.as_str()).context("Invalid user identifier")?;
    let vault = open_vault(&cli.root).await?;

    match cli.command {
        Commands::Lock { source } => cmd_lock(&vault, &user, &source).await,

        Commands::List => cmd_list(&vault, &user).await,

        Commands::Retrieve { stored_id, dest } => {
            cmd_retrieve(&vault, &user, &stored_id, &dest).await
        }

        Commands::Delete { stored_id } => cmd_delete(&vault, &user, &stored_id).await,

        Commands::Recycle => cmd_recycle(&vault, &user).await,

        Commands::Restore { stored_id } => cmd_restore(&vault, &user, &stored_id).await,
    }
}

async fn open_vault(root: &PathBuf) -> Result<VaultManager> {
    let provider = LocalProvider::new(root).context("Failed to open storage root")?;
    VaultManager::open(VaultConfig::default(), Arc::new(provider))
        .await
        .context("Failed to open vault")
}

/// Prompt for password securely.
fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("Failed to read password")
}

/// Encrypt a file into the vault and consume the source.
async fn cmd_lock(vault: &VaultManager, user: &UserId, source: &PathBuf) -> Result<()> {
    let original_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .context("Source path has no usable filename")?
        .to_string();

    let data = tokio::fs::read(source)
        .await
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let password = prompt_password("Enter password: ")?;

    let id = vault.lock(user, &password, &data, &original_name).await?;

    // The vault owns the content now; the plaintext source goes away.
    tokio::fs::remove_file(source)
        .await
        .with_context(|| format!("Locked, but failed to remove {}", source.display()))?;

    info!("Locked {} as {}", original_name, id);
    println!("{}", id);
    Ok(())
}

/// List files currently in the vault.
async fn cmd_list(vault: &VaultManager, user: &UserId) -> Result<()> {
    let ids = vault.list(user).await?;

    if ids.is_empty() {
        println!("No files in the vault.");
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

/// Decrypt a stored file to a destination path.
async fn cmd_retrieve(
    vault: &VaultManager,
    user: &UserId,
    stored_id: &str,
    dest: &PathBuf,
) -> Result<()> {
    let id = StoredId::new(stored_id)?;
    let password = prompt_password("Enter password: ")?;

    let data = vault.retrieve(&id, user, &password).await?;

    tokio::fs::write(dest, &data)
        .await
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    info!("Retrieved {} to {}", id, dest.display());
    Ok(())
}

/// Move a stored file to the recycle bin.
async fn cmd_delete(vault: &VaultManager, user: &UserId, stored_id: &str) -> Result<()> {
    let id = StoredId::new(stored_id)?;
    let password = prompt_password("Enter password: ")?;

    if !vault.delete(&id, user, &password).await? {
        bail!("{} is not in the vault", id);
    }

    info!("Moved {} to the recycle bin", id);
    Ok(())
}

/// List files currently in the recycle bin.
async fn cmd_recycle(vault: &VaultManager, user: &UserId) -> Result<()> {
    let ids = vault.list_recycle_bin(user).await?;

    if ids.is_empty() {
        println!("Recycle bin is empty.");
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

/// Move a stored file from the recycle bin back to the vault.
async fn cmd_restore(vault: &VaultManager, user: &UserId, stored_id: &str) -> Result<()> {
    let id = StoredId::new(stored_id)?;
    let password = prompt_password("Enter password: ")?;

    if !vault.restore(&id, user, &password).await? {
        bail!("{} is not in the recycle bin", id);
    }

    info!("Restored {} from the recycle bin", id);
    Ok(())
}
