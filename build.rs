use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=GCP_IAP_SSH_VERSION");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let version = std::env::var("GCP_IAP_SSH_VERSION")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "dev".to_string());
    println!("cargo:rustc-env=GCP_IAP_SSH_VERSION={version}");

    let hash = git(&["rev-parse", "--short=10", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GCP_IAP_SSH_BUILD_HASH={hash}");
}

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
}
