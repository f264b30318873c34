fn main() {
    // Re-run if git HEAD changes so the asset version follows commits.
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    // Stylesheet URLs carry `?v=<hash>` so deploys bust browser caches.
    let asset_version = if hash.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        hash.clone()
    };

    println!("cargo:rustc-env=GIT_HASH={hash}");
    println!("cargo:rustc-env=ASSET_VERSION={asset_version}");
}
