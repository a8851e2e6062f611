use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EXECUTION_API_URL: &str = "https://emkc.org/api/v2/piston/execute";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();

        // Read .explainrc if exists
        read_rc_file(&default_config_path(), &mut map);

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map }
    }

    /// Build a config from defaults plus explicit pairs, ignoring the
    /// environment and the rc file.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = default_map();
        for (k, v) in pairs {
            map.insert(k.into(), v.into());
        }
        Self { inner: map }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn api_key(&self) -> Option<String> {
        self.get("OPENAI_API_KEY").filter(|k| !k.trim().is_empty())
    }

    /// Chat completions base URL, normalized to end in `/v1`.
    pub fn api_base_url(&self) -> String {
        let raw = self.get("API_BASE_URL").unwrap_or_else(|| "default".into());
        if raw == "default" {
            return DEFAULT_API_BASE_URL.to_string();
        }
        let trimmed = raw.trim_end_matches('/');
        if !trimmed.ends_with("/v1") && !trimmed.contains("/v1/") {
            format!("{}/v1", trimmed)
        } else {
            trimmed.to_string()
        }
    }

    pub fn model(&self) -> String {
        self.get("DEFAULT_MODEL").unwrap_or_else(|| "gpt-4.1".into())
    }

    pub fn execution_url(&self) -> String {
        self.get("EXECUTION_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EXECUTION_API_URL.to_string())
    }

    pub fn listen_addr(&self) -> String {
        self.get("LISTEN_ADDR").unwrap_or_else(|| "127.0.0.1:3000".into())
    }

    /// `None` when unset or zero: outbound calls wait indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.get("REQUEST_TIMEOUT")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.get("LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("code_explainer").join("tui.log"))
    }
}

fn read_rc_file(path: &Path, map: &mut HashMap<String, String>) {
    if !path.exists() {
        return;
    }
    if let Ok(file) = fs::File::open(path) {
        let reader = BufReader::new(file);
        for line in reader.lines().map_while(Result::ok) {
            if let Some((k, v)) = parse_rc_line(&line) {
                map.insert(k, v);
            }
        }
    }
}

fn parse_rc_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (k, v) = line.split_once('=')?;
    Some((k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    // Accept known keys or EXPLAINER_*/OPENAI_* for forward-compat
    const KEYS: &[&str] = &[
        "OPENAI_API_KEY",
        "API_BASE_URL",
        "DEFAULT_MODEL",
        "DEFAULT_LANGUAGE",
        "EXECUTION_API_URL",
        "LISTEN_ADDR",
        "REQUEST_TIMEOUT",
        "PRETTIFY_MARKDOWN",
        "LOG_PATH",
    ];

    KEYS.contains(&k) || k.starts_with("EXPLAINER_") || k.starts_with("OPENAI_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("code_explainer").join(".explainrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Strings
    m.insert("API_BASE_URL".into(), "default".into());
    m.insert("DEFAULT_MODEL".into(), "gpt-4.1".into());
    m.insert("DEFAULT_LANGUAGE".into(), "javascript".into());
    m.insert("EXECUTION_API_URL".into(), DEFAULT_EXECUTION_API_URL.into());
    m.insert("LISTEN_ADDR".into(), "127.0.0.1:3000".into());

    // Bools as strings
    m.insert("PRETTIFY_MARKDOWN".into(), "true".into());

    m
}
