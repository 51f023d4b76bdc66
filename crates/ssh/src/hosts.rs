//! Host aliases already present in an SSH config file.

use crate::block::is_compute_alias;
use ssh2_config::{ParseRule, SshConfig};
use std::io::BufReader;

/// Lists the `compute.*` host aliases defined in SSH config text.
///
/// Wildcard and negated patterns are skipped; names are sorted
/// case-insensitively.
///
/// # Errors
///
/// Returns the parser's message if the text is not a valid SSH config.
pub fn compute_hosts(text: &str) -> Result<Vec<String>, String> {
    let mut reader = BufReader::new(text.as_bytes());
    let config = SshConfig::default()
        .parse(
            &mut reader,
            ParseRule::ALLOW_UNKNOWN_FIELDS | ParseRule::ALLOW_UNSUPPORTED_FIELDS,
        )
        .map_err(|e| e.to_string())?;

    let mut hosts = Vec::new();

    for host in config.get_hosts() {
        for clause in &host.pattern {
            let name = clause.pattern.as_str();

            // Skip wildcards and patterns
            if name.contains('*') || name.contains('?') || clause.negated {
                continue;
            }

            if is_compute_alias(name) && !hosts.iter().any(|h| h == name) {
                hosts.push(name.to_string());
            }
        }
    }

    hosts.sort_by_key(|a| a.to_lowercase());
    Ok(hosts)
}
