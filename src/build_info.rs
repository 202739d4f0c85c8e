//! Compile-time build metadata
//!
//! Shown in the startup banner, reported by `/api/status` and sent as the
//! `User-Agent` of outbound requests.

use serde::Serialize;

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 0 when the build script did not run
pub const BUILD_NUMBER: u64 = build_number(option_env!("LIFEMON_BUILD_NUMBER"));

pub const BUILD_TIMESTAMP: &str = or_unknown(option_env!("LIFEMON_BUILD_TIMESTAMP"));

/// Cargo profile, `debug` or `release`
pub const BUILD_PROFILE: &str = or_unknown(option_env!("LIFEMON_BUILD_PROFILE"));

pub const BUILD_TARGET: &str = or_unknown(option_env!("LIFEMON_BUILD_TARGET"));

const fn or_unknown(value: Option<&'static str>) -> &'static str {
    match value {
        Some(s) => s,
        None => "unknown",
    }
}

/// Decimal digits only. Anything else, or an overflow, gives 0.
const fn build_number(value: Option<&str>) -> u64 {
    let bytes = match value {
        Some(s) => s.as_bytes(),
        None => return 0,
    };
    if bytes.is_empty() {
        return 0;
    }
    let mut number: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            return 0;
        }
        number = match number.checked_mul(10) {
            Some(n) => match n.checked_add((digit - b'0') as u64) {
                Some(n) => n,
                None => return 0,
            },
            None => return 0,
        };
        i += 1;
    }
    number
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub profile: &'static str,
    pub target: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            profile: BUILD_PROFILE,
            target: BUILD_TARGET,
        }
    }

    /// `lifemon/<version> (build <n>)`
    pub fn user_agent(&self) -> String {
        format!("{}/{} (build {})", self.name, self.version, self.build_number)
    }

    fn banner_lines(&self) -> Vec<String> {
        vec![
            format!("  LifeMon API {}", self.version),
            format!("  Build: {} ({}, {})", self.build_number, self.profile, self.target),
            format!("  Compiled: {}", self.build_timestamp),
        ]
    }
}

/// Log the startup banner
pub fn log_startup_banner() {
    tracing::info!("===============================================");
    for line in BuildInfo::current().banner_lines() {
        tracing::info!("{}", line);
    }
    tracing::info!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_number_parsing() {
        assert_eq!(build_number(Some("1234")), 1234);
        assert_eq!(build_number(Some("12a")), 0);
        assert_eq!(build_number(Some("")), 0);
        assert_eq!(build_number(Some("99999999999999999999999")), 0);
        assert_eq!(build_number(None), 0);
    }

    #[test]
    fn test_user_agent_names_package_and_build() {
        let info = BuildInfo {
            build_number: 42,
            ..BuildInfo::current()
        };
        let agent = info.user_agent();
        assert_eq!(agent, format!("lifemon/{} (build 42)", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_banner_mentions_profile() {
        let info = BuildInfo {
            profile: "release",
            target: "x86_64-unknown-linux-gnu",
            ..BuildInfo::current()
        };
        let lines = info.banner_lines();
        assert!(lines[1].contains("(release, x86_64-unknown-linux-gnu)"));
    }
}
