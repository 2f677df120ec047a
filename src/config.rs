use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokenmark_parser::ParserOptions;
use tokenmark_parser::options::DEFAULT_MAX_CONTAINER_DEPTH;

/// How the `tokens` command prints a token stream.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One bracketed token per line
    #[default]
    Text,
    /// A JSON array of tokens
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Container markers nested deeper than this are read as text.
    pub max_container_depth: usize,
    pub output: OutputFormat,
    /// Whether `check` compares the rehydrated text with the input.
    pub verify_rehydration: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_container_depth: DEFAULT_MAX_CONTAINER_DEPTH,
            output: OutputFormat::Text,
            verify_rehydration: true,
        }
    }
}

impl Config {
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            max_container_depth: self.max_container_depth,
        }
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn max_container_depth(mut self, depth: usize) -> Self {
        self.config.max_container_depth = depth;
        self
    }

    pub fn output(mut self, output: OutputFormat) -> Self {
        self.config.output = output;
        self
    }

    pub fn verify_rehydration(mut self, verify: bool) -> Self {
        self.config.verify_rehydration = verify;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".tokenmark.toml", "tokenmark.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str::<Config>(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

fn read_config(path: &Path) -> io::Result<Config> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path)?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn user_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("tokenmark").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    let p = dirs::config_dir()?.join("tokenmark").join("config.toml");
    p.is_file().then_some(p)
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .tokenmark.toml, tokenmark.toml
/// 3) $XDG_CONFIG_HOME/tokenmark/config.toml or the platform config dir
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir) {
        match read_config(&p) {
            Ok(cfg) => return Ok((cfg, Some(p))),
            Err(e) => log::warn!("Ignoring {}: {e}", p.display()),
        }
    }

    if let Some(p) = user_config_path()
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_fields_use_defaults() {
        let cfg = toml::from_str::<Config>("output = \"json\"").unwrap();
        assert_eq!(cfg.output, OutputFormat::Json);
        assert_eq!(cfg.max_container_depth, DEFAULT_MAX_CONTAINER_DEPTH);
        assert!(cfg.verify_rehydration);
    }

    #[test]
    fn test_parser_options_carry_depth() {
        let cfg = ConfigBuilder::default().max_container_depth(3).build();
        assert_eq!(cfg.parser_options().max_container_depth, 3);
    }

    #[test]
    fn test_unknown_output_is_rejected() {
        let err = parse_config_str("output = \"yaml\"", Path::new("x.toml")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_found_in_parent_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".tokenmark.toml"),
            "max_container_depth = 8\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let (cfg, path) = load(None, &nested).unwrap();
        assert_eq!(cfg.max_container_depth, 8);
        assert_eq!(path, Some(dir.path().join(".tokenmark.toml")));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load(Some(&missing), dir.path()).is_err());
    }
}
