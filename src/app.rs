use clap::{Args, Subcommand};
use gcloud::{ConfigureRequest, Configured, Gcloud, IapError, IapService};
use serde::Serialize;
use settings::{Settings, SettingsError};
use ssh::{ConfigError, ConfigFile, LogForwarder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add or update the SSH config entry for an instance
    Configure(ConfigureArgs),
    /// List the compute.* hosts already in the SSH config
    Hosts {
        /// SSH config file to read instead of the configured one
        #[arg(long, value_name = "PATH")]
        ssh_config: Option<PathBuf>,
    },
    /// Show the settings file and the SSH config file in use
    Paths,
    /// Write a default settings file if there is none
    Init,
}

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    /// Instance name
    #[arg(short, long)]
    instance: String,

    /// Project ID [default: defaultProject setting]
    #[arg(short, long)]
    project: Option<String>,

    /// Zone [default: defaultZone setting]
    #[arg(short, long)]
    zone: Option<String>,

    /// Create a missing SSH config file and replace an existing entry
    #[arg(short, long)]
    force: bool,

    /// Print the entry instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Print the dry-run result as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,

    /// SSH config file to update instead of the configured one
    #[arg(long, value_name = "PATH")]
    ssh_config: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Iap(#[from] IapError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Project ID is required: pass --project or set defaultProject in {}", settings_hint())]
    MissingProject,

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

fn settings_hint() -> String {
    Settings::config_path().map_or_else(
        || "the settings file".to_string(),
        |p| p.display().to_string(),
    )
}

/// Dry-run result surfaced to the caller.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Preview<'a> {
    content: &'a str,
    config_path: &'a Path,
}

pub async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Configure(args) => configure(args).await,
        Command::Hosts { ssh_config } => hosts(ssh_config.as_deref()).await,
        Command::Paths => paths(),
        Command::Init => init(),
    }
}

async fn configure(args: ConfigureArgs) -> Result<(), AppError> {
    let settings = Settings::load()?;

    let project_id = args
        .project
        .or_else(|| settings.default_project.clone())
        .ok_or(AppError::MissingProject)?;
    let zone = args.zone.unwrap_or_else(|| settings.default_zone.clone());
    let config_path = settings.ssh_config_path(args.ssh_config.as_deref())?;

    let gcloud = Gcloud::locate(settings.gcloud_path.as_deref());
    let service = IapService::new(gcloud, config_path, Arc::new(LogForwarder));

    let request = ConfigureRequest {
        project_id,
        instance_name: args.instance,
        zone,
        force: args.force,
        dry_run: args.dry_run,
    };

    match service.configure(&request).await? {
        Configured::Written { path, updated } => {
            println!(
                "{} {} in {}",
                if updated { "Updated" } else { "Added" },
                ssh::host_alias(&request.instance_name),
                path.display()
            );
        }
        Configured::Preview {
            content,
            config_path,
        } => {
            if args.json {
                let preview = Preview {
                    content: &content,
                    config_path: &config_path,
                };
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                println!("# {}", config_path.display());
                println!("{content}");
            }
        }
    }

    Ok(())
}

async fn hosts(ssh_config: Option<&Path>) -> Result<(), AppError> {
    let path = Settings::load()?.ssh_config_path(ssh_config)?;

    for host in ConfigFile::new(path).compute_hosts().await? {
        println!("{host}");
    }

    Ok(())
}

fn paths() -> Result<(), AppError> {
    let settings = Settings::load()?;

    if let Some(path) = Settings::config_path() {
        println!("settings:   {}", path.display());
    }
    println!("ssh config: {}", settings.ssh_config_path(None)?.display());

    Ok(())
}

fn init() -> Result<(), AppError> {
    let path = Settings::ensure_config_exists()?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("gcp-iap-ssh").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_configure_arguments() {
        let command = parse(&[
            "configure", "-i", "web1", "-p", "proj", "-z", "us-east1-b", "--force", "--dry-run",
        ])
        .unwrap();

        let Command::Configure(args) = command else {
            panic!("Expected Configure");
        };
        assert_eq!(args.instance, "web1");
        assert_eq!(args.project.as_deref(), Some("proj"));
        assert_eq!(args.zone.as_deref(), Some("us-east1-b"));
        assert!(args.force);
        assert!(args.dry_run);
    }

    #[test]
    fn test_configure_requires_instance() {
        assert!(parse(&["configure", "--project", "proj"]).is_err());
    }

    #[test]
    fn test_json_requires_dry_run() {
        assert!(parse(&["configure", "-i", "web1", "--json"]).is_err());
        assert!(parse(&["configure", "-i", "web1", "--json", "--dry-run"]).is_ok());
    }

    #[test]
    fn test_hosts_ssh_config_override() {
        let Command::Hosts { ssh_config } =
            parse(&["hosts", "--ssh-config", "/tmp/config"]).unwrap()
        else {
            panic!("Expected Hosts");
        };
        assert_eq!(ssh_config, Some(PathBuf::from("/tmp/config")));
    }

    #[test]
    fn test_preview_json_shape() {
        let preview = Preview {
            content: "Host compute.web1",
            config_path: Path::new("/home/u/.ssh/config"),
        };

        let json: serde_json::Value = serde_json::to_value(&preview).unwrap();

        assert_eq!(json["content"], "Host compute.web1");
        assert_eq!(json["configPath"], "/home/u/.ssh/config");
    }
}
