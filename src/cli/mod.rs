use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{generate_jwt, Claims, Principal};
use crate::config::AppConfig;

/// Flags accepted by the server binary. Each one overrides the matching
/// environment-derived setting when present.
#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Keep all primary data in process memory instead of PostgreSQL")]
    pub memory: bool,

    #[arg(long, help = "Port to listen on")]
    pub port: Option<u16>,

    #[arg(long, help = "Directory of extra .json layouts")]
    pub canned_path: Option<PathBuf>,

    #[arg(long, help = "Directory of .dashboard, .src, .kap and .org files")]
    pub resources_path: Option<PathBuf>,

    #[arg(long, help = "Directory of .json protoboards")]
    pub protoboards_path: Option<PathBuf>,

    #[arg(long, help = "Directory of .template collector configs")]
    pub templates_path: Option<PathBuf>,
}

impl ServeArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(path) = &self.canned_path {
            config.resolver.canned_path = Some(path.clone());
        }
        if let Some(path) = &self.resources_path {
            config.resolver.resources_path = Some(path.clone());
        }
        if let Some(path) = &self.protoboards_path {
            config.resolver.protoboards_path = Some(path.clone());
        }
        if let Some(path) = &self.templates_path {
            config.resolver.templates_path = Some(path.clone());
        }
    }
}

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil CLI - administrative helpers for the monitoring console")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a session token for a principal, bypassing the OAuth handshake")]
    Token {
        #[arg(long, help = "External user name")]
        subject: String,

        #[arg(long, help = "OAuth provider, e.g. github or auth0")]
        issuer: String,

        #[arg(long, default_value = "", help = "Organization to act in")]
        organization: String,

        #[arg(long, default_value = "", help = "Comma-separated provider groups")]
        group: String,
    },

    #[command(about = "Print the effective configuration")]
    Config,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Token {
            subject,
            issuer,
            organization,
            group,
        } => {
            let principal = Principal {
                subject,
                issuer,
                organization,
                group,
            };
            let claims = Claims::new(&principal, config.security.jwt_expiry_hours);
            let token = generate_jwt(&claims, &config.security.jwt_secret)?;

            match output_format {
                OutputFormat::Json => {
                    let response = json!({
                        "success": true,
                        "data": { "token": token, "expires_at": claims.exp }
                    });
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                OutputFormat::Text => println!("{}", token),
            }
        }
        Commands::Config => {
            let mut shown = config;
            if !shown.security.jwt_secret.is_empty() {
                shown.security.jwt_secret = "********".to_string();
            }
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
    }

    Ok(())
}
