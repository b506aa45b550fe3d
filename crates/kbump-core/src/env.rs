//! Process environment captured once into an immutable record.
//!
//! Components never read `std::env` themselves; they receive a [`RunEnv`]
//! so tests can run the whole pipeline against a synthetic environment.

use crate::error::{BumpError, Result};
use std::fmt;
use std::path::PathBuf;

/// Environment values the pipeline consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunEnv {
    /// `HOME`
    pub home: Option<PathBuf>,
    /// `GITHUB_ACTOR`
    pub actor: Option<String>,
    /// `GITHUB_TOKEN`
    pub token: Option<String>,
    /// `DRYRUN=1`
    pub dry_run: bool,
    /// `GITHUB_PATH`: file the runner reads PATH additions from.
    pub github_path: Option<PathBuf>,
    /// `RUNNER_TOOL_CACHE`
    pub tool_cache_root: Option<PathBuf>,
    /// `RUNNER_TEMP`
    pub temp_dir: Option<PathBuf>,
}

impl RunEnv {
    /// Capture the current process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        RunEnv {
            home: get("HOME").map(PathBuf::from),
            actor: get("GITHUB_ACTOR"),
            token: get("GITHUB_TOKEN"),
            dry_run: get("DRYRUN").as_deref() == Some("1"),
            github_path: get("GITHUB_PATH").map(PathBuf::from),
            tool_cache_root: get("RUNNER_TOOL_CACHE").map(PathBuf::from),
            temp_dir: get("RUNNER_TEMP").map(PathBuf::from),
        }
    }

    /// Where downloaded tools are kept.
    pub fn cache_root(&self) -> PathBuf {
        if let Some(root) = &self.tool_cache_root {
            return root.clone();
        }
        match &self.home {
            Some(home) => home.join(".cache").join("kustomize-bump").join("tools"),
            None => self.staging_dir().join("kustomize-bump-tools"),
        }
    }

    /// Where downloads are staged before extraction.
    pub fn staging_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Credentials for authenticated git pushes.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            home: self.home.clone().ok_or(BumpError::MissingEnv("HOME"))?,
            actor: self.actor.clone().ok_or(BumpError::MissingEnv("GITHUB_ACTOR"))?,
            token: self.token.clone().ok_or(BumpError::MissingEnv("GITHUB_TOKEN"))?,
        })
    }
}

/// Actor, token and the home directory their credential file lives in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub home: PathBuf,
    pub actor: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("home", &self.home)
            .field("actor", &self.actor)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> RunEnv {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RunEnv::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_dry_run_only_for_one() {
        assert!(env_of(&[("DRYRUN", "1")]).dry_run);
        assert!(!env_of(&[("DRYRUN", "true")]).dry_run);
        assert!(!env_of(&[("DRYRUN", "0")]).dry_run);
        assert!(!env_of(&[]).dry_run);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = env_of(&[("GITHUB_ACTOR", ""), ("HOME", "/home/runner")]);
        assert!(env.actor.is_none());
        assert_eq!(env.home, Some(PathBuf::from("/home/runner")));
    }

    #[test]
    fn test_credentials_require_all_three() {
        let env = env_of(&[("HOME", "/h"), ("GITHUB_ACTOR", "octocat")]);
        let err = env.credentials().unwrap_err();
        assert!(matches!(err, BumpError::MissingEnv("GITHUB_TOKEN")));

        let env = env_of(&[("HOME", "/h"), ("GITHUB_ACTOR", "octocat"), ("GITHUB_TOKEN", "t")]);
        let creds = env.credentials().unwrap();
        assert_eq!(creds.actor, "octocat");
        assert_eq!(creds.home, PathBuf::from("/h"));
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = Credentials {
            home: PathBuf::from("/h"),
            actor: "octocat".to_string(),
            token: "ghp_secret".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_cache_root_precedence() {
        let env = env_of(&[("RUNNER_TOOL_CACHE", "/opt/hostedtoolcache"), ("HOME", "/h")]);
        assert_eq!(env.cache_root(), PathBuf::from("/opt/hostedtoolcache"));

        let env = env_of(&[("HOME", "/h")]);
        assert_eq!(env.cache_root(), PathBuf::from("/h/.cache/kustomize-bump/tools"));
    }
}
