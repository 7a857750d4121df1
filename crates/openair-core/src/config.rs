//! Configuration module
//!
//! Environment-driven configuration for the server, the shows service
//! collaborator, and the S3-compatible object storage. Every setting has a
//! development default so the service boots against a local stack with no
//! environment at all.

use std::env;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 10600;
const DEFAULT_SHOWS_HOST: &str = "localhost";
const DEFAULT_SHOWS_PORT: u16 = 10500;
const DEFAULT_S3_HOST: &str = "localhost";
const DEFAULT_S3_PORT: u16 = 10610;
const DEFAULT_S3_USER: &str = "readwrite";
const DEFAULT_S3_PASSWORD: &str = "password";
const DEFAULT_S3_BUCKET: &str = "default";
const DEFAULT_S3_REGION: &str = "local";

/// HTTP server settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub trusted: String,
}

/// Location of the shows service HTTP API.
#[derive(Clone, Debug)]
pub struct ShowsConfig {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: Option<String>,
}

impl ShowsConfig {
    /// Base URL of the shows service.
    pub fn url(&self) -> String {
        let mut url = format!("{}://{}", self.scheme, self.host);
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        if let Some(path) = &self.path {
            url.push_str(&format!("/{}", path.trim_matches('/')));
        }
        url
    }
}

/// S3-compatible object storage settings.
#[derive(Clone, Debug)]
pub struct S3Config {
    pub secure: bool,
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub bucket: String,
    pub region: String,
}

impl S3Config {
    /// Endpoint URL to connect to the S3 API.
    pub fn endpoint(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.host),
            None => format!("{scheme}://{}", self.host),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub shows: ShowsConfig,
    pub s3: S3Config,
    pub debug: bool,
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            trusted: env::var("SERVER_TRUSTED_PROXIES").unwrap_or_else(|_| "*".to_string()),
        };

        let shows = ShowsConfig {
            scheme: env::var("SHOWS_SCHEME").unwrap_or_else(|_| "http".to_string()),
            host: env::var("SHOWS_HOST").unwrap_or_else(|_| DEFAULT_SHOWS_HOST.to_string()),
            port: env::var("SHOWS_PORT")
                .ok()
                .map(|p| p.parse())
                .transpose()?
                .or(Some(DEFAULT_SHOWS_PORT)),
            path: env::var("SHOWS_PATH").ok().filter(|p| !p.is_empty()),
        };

        let s3 = S3Config {
            secure: env::var("S3_SECURE")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
            host: env::var("S3_HOST").unwrap_or_else(|_| DEFAULT_S3_HOST.to_string()),
            port: env::var("S3_PORT")
                .ok()
                .map(|p| p.parse())
                .transpose()?
                .or(Some(DEFAULT_S3_PORT)),
            user: env::var("S3_USER").unwrap_or_else(|_| DEFAULT_S3_USER.to_string()),
            password: env::var("S3_PASSWORD").unwrap_or_else(|_| DEFAULT_S3_PASSWORD.to_string()),
            bucket: env::var("S3_BUCKET").unwrap_or_else(|_| DEFAULT_S3_BUCKET.to_string()),
            region: env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_S3_REGION.to_string()),
        };

        let debug = env::var("DEBUG")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(true);

        let config = Config {
            server,
            shows,
            s3,
            debug,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.host.is_empty() {
            anyhow::bail!("SERVER_HOST must not be empty");
        }
        if self.shows.host.is_empty() {
            anyhow::bail!("SHOWS_HOST must not be empty");
        }
        if self.s3.host.is_empty() {
            anyhow::bail!("S3_HOST must not be empty");
        }
        if self.s3.bucket.is_empty() {
            anyhow::bail!("S3_BUCKET must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shows(port: Option<u16>, path: Option<&str>) -> ShowsConfig {
        ShowsConfig {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port,
            path: path.map(str::to_string),
        }
    }

    #[test]
    fn shows_url_includes_port_and_path() {
        assert_eq!(shows(Some(10500), None).url(), "http://localhost:10500");
        assert_eq!(
            shows(Some(10500), Some("api")).url(),
            "http://localhost:10500/api"
        );
        assert_eq!(shows(None, None).url(), "http://localhost");
    }

    #[test]
    fn shows_url_trims_path_slashes() {
        assert_eq!(
            shows(None, Some("/api/v1/")).url(),
            "http://localhost/api/v1"
        );
    }

    #[test]
    fn s3_endpoint_follows_secure_flag() {
        let mut s3 = S3Config {
            secure: false,
            host: "localhost".to_string(),
            port: Some(10610),
            user: "readwrite".to_string(),
            password: "password".to_string(),
            bucket: "default".to_string(),
            region: "local".to_string(),
        };
        assert_eq!(s3.endpoint(), "http://localhost:10610");

        s3.secure = true;
        s3.port = None;
        assert_eq!(s3.endpoint(), "https://localhost");
    }

    #[test]
    fn validate_rejects_empty_bucket() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 10600,
                trusted: "*".to_string(),
            },
            shows: shows(Some(10500), None),
            s3: S3Config {
                secure: false,
                host: "localhost".to_string(),
                port: Some(10610),
                user: "readwrite".to_string(),
                password: "password".to_string(),
                bucket: String::new(),
                region: "local".to_string(),
            },
            debug: true,
        };
        assert!(config.validate().is_err());
    }
}
