//! Extraction of SSH options from the command printed by
//! `gcloud compute ssh --dry-run`.
//!
//! gcloud prints an OpenSSH invocation on Unix-like systems and a PuTTY
//! invocation on Windows. Each dialect has its own extraction rules.

use crate::options::SshOptions;
use regex::Regex;
use std::sync::LazyLock;

const IDENTITY_FILE: &str = "IdentityFile";
const PROXY_COMMAND: &str = "ProxyCommand";
const USER: &str = "User";

const OPTION_SEPARATOR: &str = " -o ";

static UNIX_IDENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-i\s+(\S+)").expect("identity pattern should compile"));

static PUTTY_IDENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-i\s+(\S+\.ppk)").expect("ppk identity pattern should compile")
});

static PUTTY_PROXY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)-proxycmd\s+"([^"]+)""#).expect("proxycmd pattern should compile")
});

static PUTTY_USER_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+([\w.-]+)@([\w.-]+)$").expect("user@host pattern should compile")
});

/// The flavour of SSH client command gcloud emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// OpenSSH: `ssh -t -i KEY -o K=V ... user@host`
    Unix,
    /// PuTTY: `putty.exe -t -i KEY.ppk -proxycmd "..." user@host`
    Putty,
}

impl Dialect {
    pub fn detect(command: &str) -> Self {
        if command.to_ascii_lowercase().contains("putty.exe") {
            Dialect::Putty
        } else {
            Dialect::Unix
        }
    }
}

/// Parses a dry-run SSH command into config directives.
///
/// Never fails: unrecognised text yields an empty map and the caller
/// decides whether that is an error.
pub fn parse(command: &str) -> SshOptions {
    let command = command.trim();

    match Dialect::detect(command) {
        Dialect::Unix => parse_unix(command),
        Dialect::Putty => parse_putty(command),
    }
}

fn parse_unix(command: &str) -> SshOptions {
    let mut options = SshOptions::new();

    let identity = UNIX_IDENTITY
        .captures(command)
        .map(|caps| strip_double_quotes(&caps[1]));
    if let Some(identity) = &identity {
        options.insert(IDENTITY_FILE, identity.as_str());
    }

    let segments: Vec<&str> = command.split(OPTION_SEPARATOR).skip(1).collect();
    let last = segments.len().saturating_sub(1);

    for (index, segment) in segments.into_iter().enumerate() {
        // The destination and any remote command trail the final option.
        let segment = if index == last {
            segment
                .find(char::is_whitespace)
                .map_or(segment, |end| &segment[..end])
        } else {
            segment
        };

        let Some((key, value)) = split_option(segment) else {
            continue;
        };

        // An explicit `-i` wins over a duplicate `-o IdentityFile=`.
        if key == IDENTITY_FILE && identity.is_some() {
            continue;
        }

        options.insert(key, value);
    }

    options
}

fn parse_putty(command: &str) -> SshOptions {
    let mut options = SshOptions::new();

    if let Some(caps) = PUTTY_IDENTITY.captures(command) {
        options.insert(IDENTITY_FILE, strip_double_quotes(&caps[1]));
    }

    if let Some(caps) = PUTTY_PROXY.captures(command) {
        options.insert(PROXY_COMMAND, caps[1].replace('\\', "\\\\"));
    }

    if let Some(caps) = PUTTY_USER_HOST.captures(command) {
        options.insert(USER, &caps[1]);
    }

    options
}

/// Splits `key=value` on the first `=`. The value stops at the end of its
/// line and loses every quote character.
fn split_option(segment: &str) -> Option<(&str, String)> {
    let (key, rest) = segment.split_once('=')?;
    let value = rest.lines().next().unwrap_or_default();

    if value.is_empty() {
        return None;
    }

    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value = value.trim().replace(['\'', '"'], "");
    Some((key, value))
}

fn strip_double_quotes(s: &str) -> String {
    s.replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    const GCLOUD_UNIX: &str = "/usr/bin/ssh -t -i /home/alice/.ssh/google_compute_engine \
        -o CheckHostIP=no -o HashKnownHosts=no \
        -o HostKeyAlias=compute.1234567890 -o IdentitiesOnly=yes \
        -o StrictHostKeyChecking=no -o UserKnownHostsFile=/home/alice/.ssh/google_compute_known_hosts \
        -o ProxyCommand='/usr/bin/python3 -S /usr/lib/google-cloud-sdk/lib/gcloud.py compute start-iap-tunnel web1 %p --listen-on-stdin --project=proj --zone=us-west1-a --verbosity=warning' \
        -o ProxyUseFdpass=no alice@compute.1234567890\n";

    const GCLOUD_PUTTY: &str = r#"C:\Users\alice\AppData\Local\Google\Cloud SDK\google-cloud-sdk\bin\sdk\putty.exe -t -i C:\Users\alice\.ssh\google_compute_engine.ppk -proxycmd "C:\Python\python.exe -S C:\sdk\lib\gcloud.py compute start-iap-tunnel web1 %port --listen-on-stdin --project=proj --zone=us-west1-a" alice@10.0.0.5"#;

    #[test]
    fn test_detect_dialect() {
        assert_eq!(Dialect::detect("ssh -i key host"), Dialect::Unix);
        assert_eq!(Dialect::detect(GCLOUD_PUTTY), Dialect::Putty);
        assert_eq!(Dialect::detect(r"C:\bin\PuTTY.exe -i k.ppk"), Dialect::Putty);
    }

    #[test]
    fn test_unix_identity_and_options() {
        let options = parse(GCLOUD_UNIX);

        assert_eq!(
            options.get("IdentityFile"),
            Some("/home/alice/.ssh/google_compute_engine")
        );
        assert_eq!(options.get("CheckHostIP"), Some("no"));
        assert_eq!(options.get("HostKeyAlias"), Some("compute.1234567890"));
        assert_eq!(
            options.get("UserKnownHostsFile"),
            Some("/home/alice/.ssh/google_compute_known_hosts")
        );
        assert_eq!(options.get("ProxyUseFdpass"), Some("no"));
        assert!(!options.contains_key("User"));
    }

    #[test]
    fn test_unix_proxy_command_keeps_inner_spaces_and_drops_quotes() {
        let options = parse(GCLOUD_UNIX);
        let proxy = options.get("ProxyCommand").unwrap();

        assert!(proxy.starts_with("/usr/bin/python3 -S "));
        assert!(proxy.ends_with("--verbosity=warning"));
        assert!(!proxy.contains('\''));
    }

    #[test]
    fn test_unix_option_order_is_preserved() {
        let options = parse(GCLOUD_UNIX);
        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys[0], "IdentityFile");
        assert_eq!(keys[1], "CheckHostIP");
        assert_eq!(keys.last(), Some(&"ProxyUseFdpass"));
    }

    #[test]
    fn test_unix_identity_flag_wins_over_option() {
        let options = parse("ssh -i /path/key -o IdentityFile=/ignored -o User=bob");

        assert_eq!(options.get("IdentityFile"), Some("/path/key"));
        assert_eq!(options.get("User"), Some("bob"));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_unix_identity_quotes_stripped() {
        let options = parse(r#"ssh -i "/path/my key" host"#);
        assert_eq!(options.get("IdentityFile"), Some("/path/my"));

        let options = parse(r#"ssh -i "/path/key" host"#);
        assert_eq!(options.get("IdentityFile"), Some("/path/key"));
    }

    #[test]
    fn test_unix_last_option_truncated_at_whitespace() {
        let options = parse("ssh -o User=bob -o Port=22 bob@host -- uptime");
        assert_eq!(options.get("Port"), Some("22"));
        assert_eq!(options.get("User"), Some("bob"));
    }

    #[test]
    fn test_unix_last_option_truncated_at_tab() {
        let options = parse("ssh -o Port=22\tbob@host");
        assert_eq!(options.get("Port"), Some("22"));
    }

    #[test]
    fn test_unix_value_splits_on_first_equals() {
        let options = parse("ssh -o SetEnv=A=B -o Port=22");
        assert_eq!(options.get("SetEnv"), Some("A=B"));
    }

    #[test]
    fn test_unix_segments_without_equals_ignored() {
        let options = parse("ssh -o Compression -o Port= -o =x -o Port=2222");
        assert_eq!(options.len(), 1);
        assert_eq!(options.get("Port"), Some("2222"));
    }

    #[test]
    fn test_unix_later_option_overwrites_earlier() {
        let options = parse("ssh -o User=a -o User=b -o Port=1");
        assert_eq!(options.get("User"), Some("b"));
    }

    #[test]
    fn test_unix_no_options() {
        assert!(parse("").is_empty());
        assert!(parse("gcloud: command not found").is_empty());
    }

    #[test]
    fn test_putty_extraction() {
        let options = parse(GCLOUD_PUTTY);

        assert_eq!(
            options.get("IdentityFile"),
            Some(r"C:\Users\alice\.ssh\google_compute_engine.ppk")
        );
        assert_eq!(options.get("User"), Some("alice"));

        let proxy = options.get("ProxyCommand").unwrap();
        assert!(proxy.starts_with(r"C:\\Python\\python.exe -S C:\\sdk\\lib\\gcloud.py"));
        assert!(proxy.ends_with("--zone=us-west1-a"));
    }

    #[test]
    fn test_putty_option_order() {
        let options = parse(GCLOUD_PUTTY);
        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["IdentityFile", "ProxyCommand", "User"]);
    }

    #[test]
    fn test_putty_quoted_ppk() {
        let options = parse(r#"putty.exe -i "C:\keys\gce.ppk" bob@host"#);
        assert_eq!(options.get("IdentityFile"), Some(r"C:\keys\gce.ppk"));
        assert_eq!(options.get("User"), Some("bob"));
    }

    #[test]
    fn test_putty_proxycmd_flag_case_insensitive() {
        let options = parse(r#"putty.exe -ProxyCmd "proxy.exe --x" u@h"#);
        assert_eq!(options.get("ProxyCommand"), Some("proxy.exe --x"));
    }

    #[test]
    fn test_putty_user_must_trail_command() {
        let options = parse(r"putty.exe -i k.ppk alice@10.0.0.5 -batch");
        assert!(!options.contains_key("User"));
        assert_eq!(options.get("IdentityFile"), Some("k.ppk"));
    }

    #[test]
    fn test_putty_ignores_non_ppk_identity() {
        let options = parse(r"putty.exe -i C:\keys\id_rsa alice@host");
        assert!(!options.contains_key("IdentityFile"));
        assert_eq!(options.get("User"), Some("alice"));
    }
}
