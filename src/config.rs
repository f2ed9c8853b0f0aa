use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV_PREFIX: &str = "BLOG_CARDS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub page: PageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Used when the post list carries no `data-csv-path`.
    #[serde(default = "default_source_path")]
    pub default_path: String,
    #[serde(default = "default_site_root")]
    pub site_root: PathBuf,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            default_path: default_source_path(),
            site_root: default_site_root(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
        }
    }
}

fn default_source_path() -> String {
    "data/blog_posts.csv".into()
}

fn default_site_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_user_agent() -> String {
    format!("blog-cards/{}", crate::VERSION)
}

fn default_timeout() -> Duration {
    crate::loader::DEFAULT_TIMEOUT
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_cap")]
    pub cap: usize,
    #[serde(default = "default_chip_limit")]
    pub chip_limit: usize,
    #[serde(default)]
    pub excerpt_placeholder: String,
    #[serde(default)]
    pub expand_resets_filter: bool,
    #[serde(default = "default_primary_topics")]
    pub primary_topics: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cap: default_cap(),
            chip_limit: default_chip_limit(),
            excerpt_placeholder: String::new(),
            expand_resets_filter: false,
            primary_topics: default_primary_topics(),
        }
    }
}

fn default_cap() -> usize {
    crate::window::DEFAULT_CAP
}

fn default_chip_limit() -> usize {
    3
}

fn default_primary_topics() -> usize {
    5
}

/// Element ids the page exposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageConfig {
    #[serde(default = "default_post_list_id")]
    pub post_list_id: String,
    #[serde(default = "default_filter_root_id")]
    pub filter_root_id: String,
    #[serde(default = "default_overflow_toggle_id")]
    pub overflow_toggle_id: String,
    #[serde(default = "default_overflow_menu_id")]
    pub overflow_menu_id: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            post_list_id: default_post_list_id(),
            filter_root_id: default_filter_root_id(),
            overflow_toggle_id: default_overflow_toggle_id(),
            overflow_menu_id: default_overflow_menu_id(),
        }
    }
}

fn default_post_list_id() -> String {
    "blog-cards".into()
}

fn default_filter_root_id() -> String {
    "blog-filters".into()
}

fn default_overflow_toggle_id() -> String {
    "more-topics-btn".into()
}

fn default_overflow_menu_id() -> String {
    "more-topics-menu".into()
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        let from_file = read_config_file(path)?;
        cfg = merge_config(cfg, from_file);
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);
    cfg.source.timeout = crate::loader::effective_timeout(cfg.source.timeout);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.source.default_path.trim().is_empty() {
        base.source.default_path = other.source.default_path;
    }
    if !other.source.site_root.as_os_str().is_empty() {
        base.source.site_root = other.source.site_root;
    }
    if !other.source.user_agent.trim().is_empty() {
        base.source.user_agent = other.source.user_agent;
    }
    if !other.source.timeout.is_zero() {
        base.source.timeout = other.source.timeout;
    }

    if other.display.cap != 0 {
        base.display.cap = other.display.cap;
    }
    if other.display.chip_limit != 0 {
        base.display.chip_limit = other.display.chip_limit;
    }
    base.display.excerpt_placeholder = other.display.excerpt_placeholder;
    base.display.expand_resets_filter = other.display.expand_resets_filter;
    base.display.primary_topics = other.display.primary_topics;

    if !other.page.post_list_id.is_empty() {
        base.page.post_list_id = other.page.post_list_id;
    }
    if !other.page.filter_root_id.is_empty() {
        base.page.filter_root_id = other.page.filter_root_id;
    }
    if !other.page.overflow_toggle_id.is_empty() {
        base.page.overflow_toggle_id = other.page.overflow_toggle_id;
    }
    if !other.page.overflow_menu_id.is_empty() {
        base.page.overflow_menu_id = other.page.overflow_menu_id;
    }

    base
}

// Applied on top of the merged config so that only variables that are
// actually set take effect.
fn apply_env(cfg: &mut Config, prefix: &str) {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(cfg, &key, value);
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "source.default_path" => cfg.source.default_path = value,
        "source.site_root" => cfg.source.site_root = PathBuf::from(value),
        "source.user_agent" => cfg.source.user_agent = value,
        "source.timeout" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.source.timeout = duration;
            }
        }
        "display.cap" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.display.cap = parsed;
            }
        }
        "display.chip_limit" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.display.chip_limit = parsed;
            }
        }
        "display.excerpt_placeholder" => cfg.display.excerpt_placeholder = value,
        "display.expand_resets_filter" => {
            cfg.display.expand_resets_filter =
                matches!(value.as_str(), "1" | "true" | "TRUE" | "True");
        }
        "display.primary_topics" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.display.primary_topics = parsed;
            }
        }
        "page.post_list_id" => cfg.page.post_list_id = value,
        "page.filter_root_id" => cfg.page.filter_root_id = value,
        "page.overflow_toggle_id" => cfg.page.overflow_toggle_id = value,
        "page.overflow_menu_id" => cfg.page.overflow_menu_id = value,
        _ => {}
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blog-cards").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::tempdir;

    fn isolated(prefix: &str) -> (tempfile::TempDir, LoadOptions) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "{}\n").unwrap();
        let options = LoadOptions {
            config_file: Some(path),
            env_prefix: Some(prefix.into()),
        };
        (dir, options)
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let (_dir, options) = isolated("BLOG_CARDS_TEST_EMPTY");
        let cfg = load(options).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.display.cap, 8);
        assert_eq!(cfg.source.default_path, "data/blog_posts.csv");
        assert_eq!(cfg.page.post_list_id, "blog-cards");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "source:\n  default_path: posts.csv\n  timeout: 3s\ndisplay:\n  cap: 6\n  expand_resets_filter: true\n  excerpt_placeholder: Read more\n",
        )
        .unwrap();
        let cfg = load(LoadOptions {
            config_file: Some(path),
            env_prefix: Some("BLOG_CARDS_TEST_FILE".into()),
        })
        .unwrap();
        assert_eq!(cfg.source.default_path, "posts.csv");
        assert_eq!(cfg.source.timeout, Duration::from_secs(3));
        assert_eq!(cfg.display.cap, 6);
        assert_eq!(cfg.display.chip_limit, 3);
        assert!(cfg.display.expand_resets_filter);
        assert_eq!(cfg.display.excerpt_placeholder, "Read more");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = load(LoadOptions {
            config_file: Some(dir.path().join("absent.yaml")),
            env_prefix: Some("BLOG_CARDS_TEST_MISSING".into()),
        });
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides() {
        env::set_var("BLOG_CARDS_TEST_ENV_DISPLAY__CAP", "6");
        env::set_var("BLOG_CARDS_TEST_ENV_SOURCE__TIMEOUT", "2s");
        env::set_var("BLOG_CARDS_TEST_ENV_DISPLAY__CAP_TYPO", "9");
        let (_dir, options) = isolated("BLOG_CARDS_TEST_ENV");
        let cfg = load(options).unwrap();
        assert_eq!(cfg.display.cap, 6);
        assert_eq!(cfg.source.timeout, Duration::from_secs(2));
        env::remove_var("BLOG_CARDS_TEST_ENV_DISPLAY__CAP");
        env::remove_var("BLOG_CARDS_TEST_ENV_SOURCE__TIMEOUT");
        env::remove_var("BLOG_CARDS_TEST_ENV_DISPLAY__CAP_TYPO");
    }

    #[test]
    fn timeout_is_resolved_once() {
        env::set_var("BLOG_CARDS_TEST_ZERO_SOURCE__TIMEOUT", "0s");
        let (_dir, options) = isolated("BLOG_CARDS_TEST_ZERO");
        let cfg = load(options).unwrap();
        assert_eq!(cfg.source.timeout, crate::loader::DEFAULT_TIMEOUT);
        env::remove_var("BLOG_CARDS_TEST_ZERO_SOURCE__TIMEOUT");

        env::set_var("BLOG_CARDS_TEST_HUGE_SOURCE__TIMEOUT", "500years");
        let (_dir, options) = isolated("BLOG_CARDS_TEST_HUGE");
        let cfg = load(options).unwrap();
        assert_eq!(cfg.source.timeout, crate::loader::MAX_TIMEOUT);
        env::remove_var("BLOG_CARDS_TEST_HUGE_SOURCE__TIMEOUT");
    }
}
