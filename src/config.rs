use crate::errors::ConfigError;
use crate::source::{DEFAULT_MEME_API_URL, REQUEST_TIMEOUT};
use std::{env, path::PathBuf, time::Duration};

/// Number of memes collected each day.
pub const MEME_COUNT: usize = 5;
pub const DEFAULT_SAVE_PATH: &str = "memes";

pub const DEFAULT_GIT_REMOTE: &str = "origin";
pub const DEFAULT_GIT_BRANCH: &str = "gh-pages";
pub const DEFAULT_COMMITTER_NAME: &str = "daily-meme-bot";
pub const DEFAULT_COMMITTER_EMAIL: &str = "meme-bot@example.com";
pub const DEFAULT_GENERATE_COMMAND: &str = "python3 generate_site.py";
pub const COLLECTOR_BIN: &str = "fetch_memes";

#[derive(Clone, Debug)]
pub struct CollectorConfig {
    pub api_url: String,
    pub target_count: usize,
    pub save_path: PathBuf,
    pub request_timeout: Duration,
}

impl CollectorConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("MEME_API_URL").unwrap_or_else(|| DEFAULT_MEME_API_URL.to_string());
        let save_path = lookup("MEMES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH));

        CollectorConfig {
            api_url,
            target_count: MEME_COUNT,
            save_path,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PublisherConfig {
    /// Project root: working directory of the build commands and the repo whose remote is read.
    pub root: PathBuf,
    /// Where the site generator leaves its output.
    pub build_dir: PathBuf,
    pub git_remote: String,
    pub git_branch: String,
    pub committer_name: String,
    pub committer_email: String,
    pub fetch_command: Vec<String>,
    pub generate_command: Vec<String>,
}

impl PublisherConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let root = match env::var("PUBLISH_ROOT") {
            Ok(root) => PathBuf::from(root),
            Err(_) => env::current_dir().map_err(|e| ConfigError::InvalidVar("PUBLISH_ROOT".into(), e.to_string()))?,
        };
        let collector = env::current_exe()
            .map_err(ConfigError::CurrentExe)?
            .with_file_name(format!("{COLLECTOR_BIN}{}", env::consts::EXE_SUFFIX));

        Self::from_lookup(root, collector, |key| env::var(key).ok())
    }

    /// Builds the configuration from `lookup`. `collector` is the default fetch command.
    pub fn from_lookup(
        root: PathBuf,
        collector: PathBuf,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let build_dir = lookup("SITE_DIR")
            .map(PathBuf::from)
            .map(|dir| if dir.is_absolute() { dir } else { root.join(dir) })
            .unwrap_or_else(|| root.join("site"));

        let fetch_command = match lookup("FETCH_COMMAND") {
            Some(line) => split_command("FETCH_COMMAND", &line)?,
            None => vec![collector.to_string_lossy().into_owned()],
        };
        let generate_command = split_command(
            "GENERATE_COMMAND",
            &var_or("GENERATE_COMMAND", DEFAULT_GENERATE_COMMAND),
        )?;

        Ok(PublisherConfig {
            build_dir,
            git_remote: var_or("GIT_REMOTE", DEFAULT_GIT_REMOTE),
            git_branch: var_or("GIT_BRANCH", DEFAULT_GIT_BRANCH),
            committer_name: var_or("COMMITTER_NAME", DEFAULT_COMMITTER_NAME),
            committer_email: var_or("COMMITTER_EMAIL", DEFAULT_COMMITTER_EMAIL),
            fetch_command,
            generate_command,
            root,
        })
    }
}

fn split_command(var: &str, line: &str) -> Result<Vec<String>, ConfigError> {
    let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if words.is_empty() {
        return Err(ConfigError::InvalidVar(var.into(), "command is empty".into()));
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn collector_defaults() {
        let config = CollectorConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.api_url, "https://meme-api.com/gimme");
        assert_eq!(config.save_path, PathBuf::from("memes"));
        assert_eq!(config.target_count, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn collector_overrides() {
        let config = CollectorConfig::from_lookup(lookup_from(&[
            ("MEME_API_URL", "http://localhost:8080/gimme"),
            ("MEMES_DIR", "/var/lib/memes"),
        ]));
        assert_eq!(config.api_url, "http://localhost:8080/gimme");
        assert_eq!(config.save_path, PathBuf::from("/var/lib/memes"));
    }

    #[test]
    fn publisher_defaults() {
        let config = PublisherConfig::from_lookup(
            PathBuf::from("/srv/memes"),
            PathBuf::from("/opt/bin/fetch_memes"),
            lookup_from(&[]),
        )
        .unwrap();
        assert_eq!(config.build_dir, PathBuf::from("/srv/memes/site"));
        assert_eq!(config.git_remote, "origin");
        assert_eq!(config.git_branch, "gh-pages");
        assert_eq!(config.committer_name, "daily-meme-bot");
        assert_eq!(config.committer_email, "meme-bot@example.com");
        assert_eq!(config.fetch_command, vec!["/opt/bin/fetch_memes".to_string()]);
        assert_eq!(config.generate_command, vec!["python3", "generate_site.py"]);
    }

    #[test]
    fn publisher_overrides() {
        let config = PublisherConfig::from_lookup(
            PathBuf::from("/srv/memes"),
            PathBuf::from("/opt/bin/fetch_memes"),
            lookup_from(&[
                ("GIT_REMOTE", "upstream"),
                ("GIT_BRANCH", "pages"),
                ("COMMITTER_NAME", "bot"),
                ("COMMITTER_EMAIL", "bot@memes.test"),
                ("SITE_DIR", "public"),
                ("FETCH_COMMAND", "cargo run --bin fetch_memes"),
                ("GENERATE_COMMAND", "./generate.sh  --minify"),
            ]),
        )
        .unwrap();
        assert_eq!(config.git_remote, "upstream");
        assert_eq!(config.git_branch, "pages");
        assert_eq!(config.committer_name, "bot");
        assert_eq!(config.committer_email, "bot@memes.test");
        assert_eq!(config.build_dir, PathBuf::from("/srv/memes/public"));
        assert_eq!(config.fetch_command, vec!["cargo", "run", "--bin", "fetch_memes"]);
        assert_eq!(config.generate_command, vec!["./generate.sh", "--minify"]);
    }

    #[test]
    fn blank_command_is_rejected() {
        let err = PublisherConfig::from_lookup(
            PathBuf::from("/srv/memes"),
            PathBuf::from("fetch_memes"),
            lookup_from(&[("GENERATE_COMMAND", "   ")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar(var, _) if var == "GENERATE_COMMAND"));
    }
}
