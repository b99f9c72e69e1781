//! Configuration module
//!
//! This module provides the process-wide configuration: the fixed set of named
//! roots exposed to clients, HTTP server settings and listing limits. It is
//! loaded once at startup and shared read-only afterwards.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PAGE_SIZE, INPUT_ROOT, MAX_PAGE_SIZE, OUTPUT_ROOT};
use crate::paths::absolutize;

// Common constants
const SERVER_PORT: u16 = 8188;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// A named top-level directory exposed under a short identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Root {
    pub name: String,
    /// Absolute, lexically normalized base directory.
    pub base_dir: PathBuf,
}

/// Immutable mapping from root identifier to base directory, ordered by name.
#[derive(Clone, Debug, Default)]
pub struct RootSet {
    roots: Vec<Root>,
}

impl RootSet {
    /// Build a root set, absolutizing every base directory.
    ///
    /// Fails on empty names, names containing a path separator, or duplicates.
    pub fn new<I, N, P>(roots: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: AsRef<Path>,
    {
        let mut out: Vec<Root> = Vec::new();
        for (name, dir) in roots {
            let name = name.into();
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(anyhow::anyhow!("Invalid root name '{}'", name));
            }
            if out.iter().any(|r| r.name == name) {
                return Err(anyhow::anyhow!("Duplicate root name '{}'", name));
            }
            let base_dir = absolutize(dir.as_ref()).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to absolutize root '{}' ({}): {}",
                    name,
                    dir.as_ref().display(),
                    e
                )
            })?;
            out.push(Root { name, base_dir });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(RootSet { roots: out })
    }

    pub fn get(&self, name: &str) -> Option<&Root> {
        self.roots.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Root> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The root that owns the Saved area.
    pub fn output(&self) -> Option<&Root> {
        self.get(OUTPUT_ROOT)
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    roots: RootSet,
    pub bind_address: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub http_concurrency_limit: usize,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Configuration with the given roots and default server settings.
    pub fn new(roots: RootSet) -> Self {
        Config {
            roots,
            bind_address: "0.0.0.0".to_string(),
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let output_dir = env::var("PLUCKER_OUTPUT_DIR")
            .map_err(|_| anyhow::anyhow!("PLUCKER_OUTPUT_DIR must be set"))?;
        let input_dir = env::var("PLUCKER_INPUT_DIR")
            .map_err(|_| anyhow::anyhow!("PLUCKER_INPUT_DIR must be set"))?;

        let mut roots = vec![
            (OUTPUT_ROOT.to_string(), PathBuf::from(output_dir)),
            (INPUT_ROOT.to_string(), PathBuf::from(input_dir)),
        ];
        if let Ok(extra) = env::var("PLUCKER_EXTRA_ROOTS") {
            roots.extend(parse_extra_roots(&extra)?);
        }

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            roots: RootSet::new(roots)?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_PAGE_SIZE),
            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| MAX_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(MAX_PAGE_SIZE),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.roots.output().is_none() {
            return Err(anyhow::anyhow!(
                "An '{}' root must be configured",
                OUTPUT_ROOT
            ));
        }

        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(anyhow::anyhow!("Page sizes must be greater than zero"));
        }

        if self.default_page_size > self.max_page_size {
            return Err(anyhow::anyhow!(
                "DEFAULT_PAGE_SIZE ({}) cannot exceed MAX_PAGE_SIZE ({})",
                self.default_page_size,
                self.max_page_size
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Cap a requested page size at `max_page_size`. Zero is kept and
    /// selects no files.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }
}

/// Parse `Name=/dir,Other=/dir2`.
fn parse_extra_roots(raw: &str) -> Result<Vec<(String, PathBuf)>, anyhow::Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (name, dir) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("PLUCKER_EXTRA_ROOTS entry '{}' must be Name=/dir", pair))?;
            Ok((name.trim().to_string(), PathBuf::from(dir.trim())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_set_sorted_and_absolute() {
        let roots = RootSet::new([("Output", "/tmp/out/../out2"), ("Input", "/tmp/in")]).unwrap();
        let names: Vec<&str> = roots.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Input", "Output"]);
        assert_eq!(roots.output().unwrap().base_dir, PathBuf::from("/tmp/out2"));
        assert_eq!(roots.len(), 2);
    }

    #[test]
    fn test_root_set_rejects_bad_names() {
        assert!(RootSet::new([("", "/tmp")]).is_err());
        assert!(RootSet::new([("a/b", "/tmp")]).is_err());
        assert!(RootSet::new([("A", "/tmp"), ("A", "/var")]).is_err());
    }

    #[test]
    fn test_validate_requires_output_root() {
        let config = Config::new(RootSet::new([("Input", "/tmp/in")]).unwrap());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_in_production() {
        let mut config = Config::new(RootSet::new([("Output", "/tmp/out")]).unwrap());
        assert!(config.validate().is_ok());
        config.environment = "Production".to_string();
        assert!(config.validate().is_err());
        config.cors_origins = vec!["https://example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_size_clamped() {
        let config = Config::new(RootSet::new([("Output", "/tmp/out")]).unwrap());
        assert_eq!(config.page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(config.page_size(Some(0)), 0);
        assert_eq!(config.page_size(Some(10_000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_parse_extra_roots() {
        let parsed = parse_extra_roots("Models=/m, Loras = /l ,").unwrap();
        assert_eq!(
            parsed,
            vec![
                ("Models".to_string(), PathBuf::from("/m")),
                ("Loras".to_string(), PathBuf::from("/l")),
            ]
        );
        assert!(parse_extra_roots("broken").is_err());
    }
}
