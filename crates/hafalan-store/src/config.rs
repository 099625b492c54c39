//! Store configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use hafalan_core::traits::Store;

use crate::file::FileStore;
use crate::postgrest::PostgrestStore;

/// Which backend holds the user's data.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    Postgrest {
        url: String,
        api_key: String,
    },
    File {
        #[serde(default = "default_store_path")]
        path: PathBuf,
    },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::Postgrest { url, api_key: _ } => f
                .debug_struct("Postgrest")
                .field("url", url)
                .field("api_key", &"***")
                .finish(),
            StoreConfig::File { path } => f.debug_struct("File").field("path", path).finish(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("hafalan-data.json")
}

/// Top-level hafalan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HafalanConfig {
    /// The user whose data is practiced.
    #[serde(default = "default_owner")]
    pub owner_id: i64,
    #[serde(default)]
    pub store: StoreConfig,
    /// Default question cap per quiz.
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
    /// Whether quizzes include already-mastered items by default.
    #[serde(default)]
    pub include_mastered: bool,
}

fn default_owner() -> i64 {
    1
}
fn default_max_questions() -> usize {
    40
}

impl Default for HafalanConfig {
    fn default() -> Self {
        Self {
            owner_id: default_owner(),
            store: StoreConfig::default(),
            max_questions: default_max_questions(),
            include_mastered: false,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Single pass: substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::Postgrest { url, api_key } => StoreConfig::Postgrest {
            url: resolve_env_vars(url),
            api_key: resolve_env_vars(api_key),
        },
        StoreConfig::File { path } => StoreConfig::File {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `hafalan.toml` in the current directory
/// 2. `~/.config/hafalan/config.toml`
///
/// Environment variable overrides: `HAFALAN_URL`, `HAFALAN_API_KEY`
/// (both switch the store to PostgREST).
pub fn load_config() -> Result<HafalanConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<HafalanConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("hafalan.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<HafalanConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => HafalanConfig::default(),
    };

    apply_env_overrides(
        &mut config,
        std::env::var("HAFALAN_URL").ok(),
        std::env::var("HAFALAN_API_KEY").ok(),
    );
    config.store = resolve_store_config(&config.store);

    tracing::debug!(path = ?config_path, store = ?config.store, "loaded config");
    Ok(config)
}

fn apply_env_overrides(config: &mut HafalanConfig, url: Option<String>, key: Option<String>) {
    if url.is_none() && key.is_none() {
        return;
    }
    let (old_url, old_key) = match &config.store {
        StoreConfig::Postgrest { url, api_key } => (url.clone(), api_key.clone()),
        StoreConfig::File { .. } => (String::new(), String::new()),
    };
    config.store = StoreConfig::Postgrest {
        url: url.unwrap_or(old_url),
        api_key: key.unwrap_or(old_key),
    };
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("hafalan"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn Store>> {
    match config {
        StoreConfig::Postgrest { url, api_key } => {
            anyhow::ensure!(!url.is_empty(), "postgrest store needs a url");
            let store = PostgrestStore::new(url, api_key).context("failed to create store")?;
            Ok(Box::new(store))
        }
        StoreConfig::File { path } => Ok(Box::new(FileStore::new(path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_HAFALAN_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_HAFALAN_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_HAFALAN_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_HAFALAN_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_HAFALAN_SELF_REF", "${_HAFALAN_SELF_REF}");
        std::env::set_var("_HAFALAN_OTHER", "x");
        assert_eq!(
            resolve_env_vars("a${_HAFALAN_SELF_REF}b${_HAFALAN_OTHER}"),
            "a${_HAFALAN_SELF_REF}bx"
        );
        assert_eq!(resolve_env_vars("unclosed ${_HAFALAN_OTHER"), "unclosed ${_HAFALAN_OTHER");
        std::env::remove_var("_HAFALAN_SELF_REF");
        std::env::remove_var("_HAFALAN_OTHER");
    }

    #[test]
    fn default_config() {
        let config = HafalanConfig::default();
        assert_eq!(config.owner_id, 1);
        assert_eq!(config.max_questions, 40);
        assert!(!config.include_mastered);
        assert!(matches!(config.store, StoreConfig::File { .. }));
    }

    #[test]
    fn parse_postgrest_config() {
        let toml_str = r#"
owner_id = 12
max_questions = 30

[store]
type = "postgrest"
url = "https://example.supabase.co"
api_key = "secret"
"#;
        let config: HafalanConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.owner_id, 12);
        assert_eq!(config.max_questions, 30);
        assert!(matches!(
            config.store,
            StoreConfig::Postgrest { ref url, .. } if url == "https://example.supabase.co"
        ));
    }

    #[test]
    fn debug_masks_api_key() {
        let store = StoreConfig::Postgrest {
            url: "https://x".into(),
            api_key: "super-secret".into(),
        };
        let shown = format!("{store:?}");
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("***"));
    }

    #[test]
    fn env_overrides_switch_to_postgrest() {
        let mut config = HafalanConfig::default();
        apply_env_overrides(&mut config, Some("https://db".into()), Some("k".into()));
        assert!(matches!(
            config.store,
            StoreConfig::Postgrest { ref url, ref api_key } if url == "https://db" && api_key == "k"
        ));

        let mut untouched = HafalanConfig::default();
        apply_env_overrides(&mut untouched, None, None);
        assert!(matches!(untouched.store, StoreConfig::File { .. }));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hafalan.toml");
        std::fs::write(
            &path,
            "owner_id = 5\n[store]\ntype = \"file\"\npath = \"data.json\"\n",
        )
        .unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.owner_id, 5);

        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn file_store_factory() {
        let store = create_store(&StoreConfig::File {
            path: PathBuf::from("x.json"),
        })
        .unwrap();
        assert_eq!(store.name(), "file");
    }
}
