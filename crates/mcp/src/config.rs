use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("POSTGSAIL_URL environment variable is required")]
    MissingUrl,

    #[error("POSTGSAIL_TOKEN or POSTGSAIL_USER and POSTGSAIL_PASS environment variables are required")]
    MissingCredentials,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "postgsail-mcp")]
#[command(version)]
#[command(about = "MCP server exposing PostgSail marine data over stdio")]
pub struct Config {
    #[arg(long, env = "POSTGSAIL_URL", help = "Base URL of the PostgSail API")]
    pub url: Option<String>,

    #[arg(long, env = "POSTGSAIL_TOKEN", hide_env_values = true, help = "Bearer token")]
    pub token: Option<String>,

    #[arg(long, env = "POSTGSAIL_USER", help = "Login email, used when no token is given")]
    pub user: Option<String>,

    #[arg(long, env = "POSTGSAIL_PASS", hide_env_values = true, help = "Login password")]
    pub pass: Option<String>,

    #[arg(short, long, env = "POSTGSAIL_VERBOSE", help = "Log tool calls")]
    pub verbose: bool,

    #[arg(short, long, env = "POSTGSAIL_DEBUG", help = "Log outbound requests")]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    Token(String),
    Login { email: String, password: String },
}

impl Config {
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        non_empty(&self.url).ok_or(ConfigError::MissingUrl)
    }

    /// A token wins over credentials when both are configured.
    pub fn auth(&self) -> Result<Auth, ConfigError> {
        if let Some(token) = non_empty(&self.token) {
            return Ok(Auth::Token(token.to_string()));
        }
        match (non_empty(&self.user), non_empty(&self.pass)) {
            (Some(email), Some(password)) => Ok(Auth::Login {
                email: email.to_string(),
                password: password.to_string(),
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else if self.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["postgsail-mcp"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn token_auth() {
        let c = config(&["--url", "http://localhost:3000", "--token", "abc"]);
        assert_eq!(c.base_url(), Ok("http://localhost:3000"));
        assert_eq!(c.auth(), Ok(Auth::Token("abc".to_string())));
    }

    #[test]
    fn token_wins_over_login() {
        let c = config(&["--url", "u", "--token", "abc", "--user", "a@b.c", "--pass", "p"]);
        assert_eq!(c.auth(), Ok(Auth::Token("abc".to_string())));
    }

    #[test]
    fn login_auth() {
        let c = config(&["--url", "u", "--user", "a@b.c", "--pass", "p"]);
        assert_eq!(
            c.auth(),
            Ok(Auth::Login {
                email: "a@b.c".to_string(),
                password: "p".to_string()
            })
        );
    }

    #[test]
    fn missing_everything() {
        let c = Config {
            url: None,
            token: None,
            user: Some("a@b.c".to_string()),
            pass: None,
            verbose: false,
            debug: false,
        };
        assert_eq!(c.base_url(), Err(ConfigError::MissingUrl));
        assert_eq!(c.auth(), Err(ConfigError::MissingCredentials));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let c = Config {
            url: Some("  ".to_string()),
            token: Some(String::new()),
            user: None,
            pass: None,
            verbose: false,
            debug: false,
        };
        assert_eq!(c.base_url(), Err(ConfigError::MissingUrl));
        assert_eq!(c.auth(), Err(ConfigError::MissingCredentials));
    }

    #[test]
    fn log_levels() {
        let mut c = config(&["--url", "u", "--token", "t"]);
        assert_eq!(c.log_level(), LevelFilter::Warn);
        c.verbose = true;
        assert_eq!(c.log_level(), LevelFilter::Info);
        c.debug = true;
        assert_eq!(c.log_level(), LevelFilter::Debug);
    }
}
