use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "leetsync")]
#[command(about = "Runs the leetsync backend service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".leetsync")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

fn default_port() -> i32 {
    3456
}

fn default_secret() -> String {
    "dev-secret-change-me".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_port")]
    pub port: i32,
}

impl Default for App {
    fn default() -> Self {
        App {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Github {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
}

impl Github {
    /// Whether the three credentials needed to reach the target repository
    /// are all present. Checked per request, not just at boot.
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.owner.is_empty() && !self.repo.is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Auth {
    #[serde(default = "default_secret")]
    pub hmac_secret: String,
}

impl Default for Auth {
    fn default() -> Self {
        Auth {
            hmac_secret: default_secret(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub github: Github,
    #[serde(default)]
    pub auth: Auth,
}

impl Config {
    /// Loads the YAML config at `path`, substituting `${VAR}` and
    /// `${VAR:-default}` references from the environment. When no config
    /// file exists the environment alone supplies the values, which is how
    /// containerized deployments run.
    pub fn new(path: &Path) -> Result<Self> {
        if path.exists() {
            Config::load_config(path)
        } else {
            Ok(Config::from_env())
        }
    }

    fn from_env() -> Config {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);

        Config {
            app: App { port },
            github: Github {
                token: env::var("GITHUB_TOKEN").unwrap_or_default(),
                owner: env::var("GITHUB_OWNER").unwrap_or_default(),
                repo: env::var("GITHUB_REPO").unwrap_or_default(),
            },
            auth: Auth {
                hmac_secret: env::var("HMAC_SECRET").unwrap_or_else(|_| default_secret()),
            },
        }
    }

    fn load_config(path: &Path) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        let yaml_with_env = Config::substitute_env_vars(&yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // Handle default values like ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!("environment variable '{}' not found", var_name);
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
