//! HTTP server configuration resolved from the environment.

use std::net::SocketAddr;

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is missing.
    #[error("required environment variable {name} is not set")]
    Missing {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but unparseable.
    #[error("environment variable {name} is invalid: {message}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Parse failure description.
        message: String,
    },
}

/// Core server settings; mail and push configuration live with their
/// adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Resolve the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `DATABASE_URL` is unset or `BIND_ADDR`
    /// does not parse as a socket address.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ServerConfig::from_env`].
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing {
            name: "DATABASE_URL",
        })?;
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_owned())
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                message: err.to_string(),
            })?;
        Ok(Self {
            database_url,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[test]
    fn database_url_is_required() {
        let result = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(
            result,
            Err(ConfigError::Missing {
                name: "DATABASE_URL"
            })
        );
    }

    #[test]
    fn bind_addr_defaults_and_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[(
            "DATABASE_URL",
            "postgres://localhost/atelier",
        )]))
        .expect("config resolves");
        assert_eq!(config.bind_addr.port(), 8080);

        let config = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/atelier"),
            ("BIND_ADDR", "127.0.0.1:9000"),
        ]))
        .expect("config resolves");
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn malformed_bind_addr_is_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/atelier"),
            ("BIND_ADDR", "not-an-address"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
