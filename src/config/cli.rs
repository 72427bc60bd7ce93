use crate::config::Settings;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command line flags. Each one overrides the config file and may also come from the environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "contact-hub")]
#[command(about = "Contact service with identity pass-through and CSV bulk import")]
pub struct CliArgs {
    #[arg(long, env = "CONTACT_HUB_CONFIG", help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    #[arg(long, env = "CONTACTS_STORE_PATH", help = "Persist contacts to this JSON file")]
    pub store_path: Option<PathBuf>,

    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    #[arg(long)]
    pub max_upload_bytes: Option<u64>,

    #[arg(long)]
    pub max_import_rows: Option<usize>,

    #[arg(long)]
    pub import_timeout_secs: Option<u64>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliArgs {
    pub fn into_settings(self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(url) = self.supabase_url {
            settings.identity.url = url;
        }
        if let Some(key) = self.supabase_key {
            settings.identity.service_key = key;
        }
        if let Some(path) = self.store_path {
            settings.store.path = Some(path);
        }
        if let Some(dir) = self.upload_dir {
            settings.import.upload_dir = dir;
        }
        if let Some(bytes) = self.max_upload_bytes {
            settings.import.max_file_bytes = bytes;
        }
        if let Some(rows) = self.max_import_rows {
            settings.import.max_rows = rows;
        }
        if let Some(seconds) = self.import_timeout_secs {
            settings.import.timeout_seconds = seconds;
        }

        Ok(settings)
    }
}
