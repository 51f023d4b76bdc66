//! Google Cloud side of IAP configuration: running `gcloud compute ssh
//! --dry-run` and turning its output into an SSH config entry.

mod cli;
mod iap;

pub use cli::{CommandSource, DryRun, Gcloud, GcloudError};
pub use iap::{ConfigureRequest, Configured, ErrorKind, IapError, IapService};
