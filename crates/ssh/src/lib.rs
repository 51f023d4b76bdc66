//! SSH side of IAP configuration: reading the command gcloud would run and
//! merging the resulting `Host` block into an SSH config file.

mod block;
mod command;
mod document;
mod error;
mod file;
mod hosts;
mod logger;
mod merge;
mod options;

pub use block::{HostBlock, host_alias, is_compute_alias};
pub use command::{Dialect, parse};
pub use document::Document;
pub use error::ConfigError;
pub use file::ConfigFile;
pub use hosts::compute_hosts;
pub use logger::{LogForwarder, Logger};
pub use merge::{MergeOutcome, MergeRequest, Merger};
pub use options::SshOptions;
