//! The `Host` stanza written for one Compute Engine instance.

use crate::options::SshOptions;

const ALIAS_PREFIX: &str = "compute.";
const INDENT: &str = "  ";

/// Returns the config alias for an instance: `compute.<instance>`.
pub fn host_alias(instance_name: &str) -> String {
    format!("{ALIAS_PREFIX}{instance_name}")
}

/// Returns true if `alias` looks like one this tool generated.
pub fn is_compute_alias(alias: &str) -> bool {
    alias.len() > ALIAS_PREFIX.len() && alias.starts_with(ALIAS_PREFIX)
}

/// One `Host` block, kept as its rendered lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBlock {
    alias: String,
    lines: Vec<String>,
}

impl HostBlock {
    /// Builds the block for `instance_name`.
    ///
    /// `local_user` is only used when the options carry no `User`.
    pub fn new(instance_name: &str, options: &SshOptions, local_user: &str) -> Self {
        let alias = host_alias(instance_name);

        let mut lines = vec![format!("Host {alias}"), format!("{INDENT}HostName {alias}")];

        for (key, value) in options.iter() {
            lines.push(format!("{INDENT}{} {value}", key.replace('"', "")));
        }

        if !options.contains_key("User") {
            lines.push(format!("{INDENT}User {local_user}"));
        }

        Self { alias, lines }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Lines joined by `\n`, without a trailing newline.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}
