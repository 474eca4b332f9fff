//! `tenderwatch config init` and `tenderwatch config show`.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use tenderwatch_core::UserId;
use tenderwatch_sync::{config as client_config, ClientConfig};

use super::home_dir;
use crate::ConnectionArgs;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write ~/.tenderwatch/config.yaml (use the global --base-url and --cookie flags).
    Init(InitArgs),

    /// Print the active configuration with the cookie redacted.
    Show,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Your own user id, used for the "followed by me" indicator.
    #[arg(long)]
    pub user_id: Option<UserId>,

    /// Name of the cookie holding the CSRF token.
    #[arg(long, default_value = client_config::DEFAULT_CSRF_COOKIE)]
    pub csrf_cookie: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = client_config::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(command: ConfigCommand, connection: &ConnectionArgs) -> Result<()> {
    match command {
        ConfigCommand::Init(args) => init(args, connection),
        ConfigCommand::Show => show(),
    }
}

fn init(args: InitArgs, connection: &ConnectionArgs) -> Result<()> {
    let home = home_dir()?;
    let path = client_config::config_path_at(&home);
    if path.exists() && !args.force {
        bail!(
            "config already exists at {}; pass --force to overwrite",
            path.display()
        );
    }

    let base_url = connection
        .base_url
        .clone()
        .context("provide the server with --base-url")?;
    let mut config = ClientConfig::new(base_url)?;
    config.cookie = connection.cookie.clone();
    config.csrf_cookie = args.csrf_cookie;
    config.user_id = args.user_id;
    config.timeout_secs = args.timeout_secs;

    let written = client_config::save_at(&home, &config).context("failed to save config")?;
    println!("✓ wrote {}", written.display());
    Ok(())
}

fn show() -> Result<()> {
    let home = home_dir()?;
    let config = client_config::load_at(&home).context("failed to load client config")?;

    println!("config:      {}", client_config::config_path_at(&home).display());
    println!("base_url:    {}", config.base_url);
    println!(
        "cookie:      {}",
        if config.cookie.is_some() { "<set>" } else { "<none>" }
    );
    println!("csrf_cookie: {}", config.csrf_cookie);
    println!(
        "user_id:     {}",
        config
            .user_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );
    println!("timeout:     {}s", config.timeout_secs);
    println!("endpoints:");
    println!("  followers: {}", config.endpoints.followers);
    println!("  favourite: {}", config.endpoints.favourite);
    println!("  seen:      {}", config.endpoints.seen);
    println!("  delete:    {}", config.endpoints.delete);
    Ok(())
}
