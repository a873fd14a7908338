use std::fmt;

use serde::Serialize;

/// Compile-time build metadata, filled in by `build.rs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub build_profile: String,
    pub build_features: String,
    pub build_timestamp: String,
    pub rust_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_target: Option<String>,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("REPO_VERSION").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
        build_features: env!("BUILD_FEATURES").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        rust_version: env!("RUST_VERSION").to_string(),
        build_target: option_env!("BUILD_TARGET").map(str::to_string),
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "flatcms {} ({} build, features: {}, built {} with {})",
            self.version,
            self.build_profile,
            self.build_features,
            self.build_timestamp,
            self.rust_version
        )?;
        if let Some(target) = &self.build_target {
            write!(f, " for {}", target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_is_populated() {
        let info = build_info();
        assert!(!info.version.is_empty());
        assert!(!info.build_profile.is_empty());
        assert!(info.to_string().starts_with("flatcms "));
    }

    #[test]
    fn test_build_info_serializes() {
        let info = build_info();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["version"], info.version);
        assert!(json.get("rust_version").is_some());
    }
}
