use std::{
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output();

    let version = match output {
        Ok(o) if o.status.success() => {
            let described = String::from_utf8(o.stdout).unwrap_or_default();
            let described = described.trim();
            let version = described.strip_prefix('v').unwrap_or(described);

            if version.is_empty() {
                format!("{}-{}", env!("CARGO_PKG_VERSION"), timestamp())
            } else if version.ends_with("-dirty") {
                format!("{}-{}", version, timestamp())
            } else {
                version.to_string()
            }
        }
        // Not a git checkout, e.g. a packaged source tarball
        _ => env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("cargo:rustc-env=RELWIN_VERSION={}", version);
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
