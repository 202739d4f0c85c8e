//! Build script for LifeMon
//!
//! Embeds the build number, timestamp, profile and target triple.
//! A `LIFEMON_BUILD_NUMBER` set by CI wins over the local counter.

use std::env;
use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn next_local_build() -> u64 {
    let path = Path::new(COUNTER_FILE);
    let current = fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let next = current.saturating_add(1);

    if fs::write(path, next.to_string()).is_err() {
        println!("cargo:warning=could not persist {}", COUNTER_FILE);
    }
    next
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=LIFEMON_BUILD_NUMBER");

    let build_number = match env::var("LIFEMON_BUILD_NUMBER") {
        Ok(pinned) if pinned.trim().parse::<u64>().is_ok() => pinned.trim().to_string(),
        _ => next_local_build().to_string(),
    };
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=LIFEMON_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=LIFEMON_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=LIFEMON_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=LIFEMON_BUILD_TARGET={}", target);
}
