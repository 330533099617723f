use anyhow::Context;
use serde::Deserialize;
use std::{ env, str::FromStr };

use crate::services::diet_plan_export::DEFAULT_ROWS_PER_PAGE;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub food_lookup: FoodLookupConfig,
    pub export: ExportConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_tool_rounds: usize,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FoodLookupBackend {
    Stub,
    Ninja,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodLookupConfig {
    pub backend: FoodLookupBackend,
    pub ninja_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub rows_per_page: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub cors_enabled: bool,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy
            ::from_filename(".env.local")
            .or_else(|_| dotenvy::dotenv())
            .ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let environment = var("NODE_ENV")
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase();

        let is_production = environment == "production";

        let dev_origins = var("DEV_FRONTEND_ORIGIN").unwrap_or_default();
        let prod_origins = var("PRODUCTION_FRONTEND_ORIGIN").unwrap_or_default();

        let allowed_origins: Vec<String> = (if is_production { prod_origins } else { dev_origins })
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let backend = match
            var("FOOD_LOOKUP_BACKEND")
                .unwrap_or_else(|| "stub".to_string())
                .to_lowercase()
                .as_str()
        {
            "stub" => FoodLookupBackend::Stub,
            "ninja" => FoodLookupBackend::Ninja,
            other => anyhow::bail!("FOOD_LOOKUP_BACKEND must be 'stub' or 'ninja', got '{}'", other),
        };

        let ninja_api_key = var("NINJA_NUTRITION_API_KEY").filter(|key| !key.trim().is_empty());
        if backend == FoodLookupBackend::Ninja && ninja_api_key.is_none() {
            anyhow::bail!("NINJA_NUTRITION_API_KEY must be set when FOOD_LOOKUP_BACKEND=ninja");
        }

        let api_key = var("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY must be set in environment variables")?;

        let config = Config {
            server: ServerConfig {
                port: parse_or(&var, "PORT", 4000)?,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                environment: if is_production {
                    Environment::Production
                } else {
                    Environment::Development
                },
            },
            gemini: GeminiConfig {
                api_key,
                model: var("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string()),
                base_url: var("GEMINI_BASE_URL").unwrap_or_else(||
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                ),
                timeout_secs: parse_or(&var, "GEMINI_TIMEOUT_SECS", 60)?,
                max_tool_rounds: parse_or(&var, "GEMINI_MAX_TOOL_ROUNDS", 4)?,
            },
            food_lookup: FoodLookupConfig {
                backend,
                ninja_api_key,
            },
            export: ExportConfig {
                rows_per_page: parse_or(&var, "EXPORT_ROWS_PER_PAGE", DEFAULT_ROWS_PER_PAGE)?,
            },
            security: SecurityConfig {
                cors_enabled: is_production,
                allowed_origins,
            },
        };

        if config.export.rows_per_page == 0 {
            anyhow::bail!("EXPORT_ROWS_PER_PAGE must be at least 1");
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.server.environment == Environment::Production
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
    where T: FromStr, T::Err: std::error::Error + Send + Sync + 'static
{
    match var(key) {
        Some(raw) if !raw.trim().is_empty() =>
            raw.trim().parse().with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = load(&[("GEMINI_API_KEY", "abc")]).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.is_production());
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.base_url, "https://generativelanguage.googleapis.com/v1beta");
        assert_eq!(config.gemini.timeout_secs, 60);
        assert_eq!(config.gemini.max_tool_rounds, 4);
        assert_eq!(config.food_lookup.backend, FoodLookupBackend::Stub);
        assert_eq!(config.export.rows_per_page, 20);
        assert!(!config.security.cors_enabled);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_production_uses_production_origins() {
        let config = load(
            &[
                ("GEMINI_API_KEY", "abc"),
                ("NODE_ENV", "Production"),
                ("PRODUCTION_FRONTEND_ORIGIN", "https://a.example, https://b.example,"),
                ("DEV_FRONTEND_ORIGIN", "http://localhost:3000"),
            ]
        ).unwrap();

        assert!(config.is_production());
        assert!(config.security.cors_enabled);
        assert_eq!(config.security.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_ninja_backend_requires_its_key() {
        let err = load(&[("GEMINI_API_KEY", "abc"), ("FOOD_LOOKUP_BACKEND", "ninja")]).unwrap_err();
        assert!(err.to_string().contains("NINJA_NUTRITION_API_KEY"));

        let config = load(
            &[
                ("GEMINI_API_KEY", "abc"),
                ("FOOD_LOOKUP_BACKEND", "ninja"),
                ("NINJA_NUTRITION_API_KEY", "ninja-key"),
            ]
        ).unwrap();
        assert_eq!(config.food_lookup.backend, FoodLookupBackend::Ninja);
        assert_eq!(config.food_lookup.ninja_api_key.as_deref(), Some("ninja-key"));
    }

    #[test]
    fn test_invalid_numbers_and_backends_are_rejected() {
        let err = load(&[("GEMINI_API_KEY", "abc"), ("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        assert!(load(&[("GEMINI_API_KEY", "abc"), ("FOOD_LOOKUP_BACKEND", "usda")]).is_err());
        assert!(load(&[("GEMINI_API_KEY", "abc"), ("EXPORT_ROWS_PER_PAGE", "0")]).is_err());
    }
}
