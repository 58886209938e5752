use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Exposed on /health so a running server can be matched to its build.
    let build_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=CIVIC_BUILD_ID={}", build_id);
    println!("cargo:rerun-if-changed=build.rs");
}
