use clap::Parser;
use inwestor_pro::Settings;
use inwestor_pro::config::SettingsError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inwestor-pro")]
#[command(about = "Inwestor Pro - generator of persuasive investment brochures")]
#[command(version)]
#[command(after_help = "Examples:
  inwestor-pro --url https://example.com
  inwestor-pro --url https://startup.pl --output broszura.md")]
pub struct Args {
    /// URL of the web page to analyse
    #[arg(long)]
    pub url: String,

    /// Output file name (default: broszura_[domain].md)
    #[arg(long)]
    pub output: Option<String>,

    /// Print detailed information about the process
    #[arg(long)]
    pub verbose: bool,

    /// Maximum number of subpages to analyse (default: 5)
    #[arg(long)]
    pub max_subpages: Option<usize>,

    /// Page fetch timeout in seconds (default: 30)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Root directory for the dated result folders (default: wyniki)
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Resolve settings: defaults, then the settings file, the environment and finally flags
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        let settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        let mut settings = settings.with_env();

        if let Some(max_subpages) = self.max_subpages {
            settings.max_subpages = max_subpages;
        }
        if let Some(timeout) = self.timeout {
            settings.fetch_timeout_secs = timeout;
        }
        if let Some(results_dir) = &self.results_dir {
            settings.results_dir = results_dir.clone();
        }
        Ok(settings)
    }
}
