//! Connection parameter handling and environment defaults.
//!
//! Defaults can be overridden through `DUCKGRESQL_*` environment variables
//! so the driver can be pointed at a local server without code changes; a
//! `.env` file in the working directory is honored when building parameters
//! from the environment.

use crate::error::ConnectionError;
use std::env;
use std::time::Duration;

/// Default server hostname.
pub const DEFAULT_HOST: &str = "localhost";
/// Default Flight SQL (gRPC) port.
pub const DEFAULT_FLIGHT_PORT: u16 = 47470;
/// Default REST API port.
pub const DEFAULT_REST_PORT: u16 = 3100;
/// Default REST transport scheme.
pub const DEFAULT_REST_SCHEME: &str = "http";
/// Default per-request timeout for control-plane calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_HOST: &str = "DUCKGRESQL_HOST";
const ENV_FLIGHT_PORT: &str = "DUCKGRESQL_FLIGHT_PORT";
const ENV_REST_PORT: &str = "DUCKGRESQL_REST_PORT";
const ENV_USE_TLS: &str = "DUCKGRESQL_USE_TLS";
const ENV_REST_SCHEME: &str = "DUCKGRESQL_REST_SCHEME";

/// Parameters for establishing a connection.
#[derive(Clone)]
pub struct ConnectionParams {
    /// Server hostname or IP
    pub host: String,
    /// Flight SQL (gRPC) port
    pub flight_port: u16,
    /// REST API port
    pub rest_port: u16,
    /// Use TLS for Flight SQL
    pub use_tls: bool,
    /// REST transport scheme, `http` or `https`
    pub rest_scheme: String,
    /// Database name or UUID
    pub database: String,
    /// Per-request timeout for control-plane calls
    pub request_timeout: Duration,
    /// API token (never logged)
    token: String,
}

impl ConnectionParams {
    /// Create a builder with hardcoded defaults.
    pub fn builder() -> ConnectionParamsBuilder {
        ConnectionParamsBuilder::new()
    }

    /// Get the API token (for internal use only, never logged).
    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Base URL for the REST control plane.
    pub fn rest_base_url(&self) -> String {
        format!("{}://{}:{}", self.rest_scheme, self.host, self.rest_port)
    }

    /// gRPC location string for the Flight SQL transport.
    pub fn flight_location(&self) -> String {
        let scheme = if self.use_tls { "grpc+tls" } else { "grpc" };
        format!("{}://{}:{}", scheme, self.host, self.flight_port)
    }
}

/// Builder for [`ConnectionParams`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionParamsBuilder {
    host: Option<String>,
    flight_port: Option<u16>,
    rest_port: Option<u16>,
    use_tls: Option<bool>,
    rest_scheme: Option<String>,
    database: Option<String>,
    request_timeout: Option<Duration>,
    token: Option<String>,
}

impl ConnectionParamsBuilder {
    /// Create a builder with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder seeded from `DUCKGRESQL_*` environment variables,
    /// loading a `.env` file first when one is present.
    ///
    /// # Errors
    /// Returns `ConnectionError::InvalidParameter` when a numeric variable
    /// does not parse.
    pub fn from_env() -> Result<Self, ConnectionError> {
        let _ = dotenvy::dotenv();

        let mut builder = Self::new();
        if let Ok(host) = env::var(ENV_HOST) {
            builder.host = Some(host);
        }
        builder.flight_port = parse_port_var(ENV_FLIGHT_PORT)?;
        builder.rest_port = parse_port_var(ENV_REST_PORT)?;
        if let Ok(raw) = env::var(ENV_USE_TLS) {
            builder.use_tls = Some(parse_bool(&raw));
        }
        if let Ok(scheme) = env::var(ENV_REST_SCHEME) {
            builder.rest_scheme = Some(scheme);
        }
        Ok(builder)
    }

    /// Set the server hostname.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the Flight SQL port.
    pub fn flight_port(mut self, port: u16) -> Self {
        self.flight_port = Some(port);
        self
    }

    /// Set the REST API port.
    pub fn rest_port(mut self, port: u16) -> Self {
        self.rest_port = Some(port);
        self
    }

    /// Enable or disable TLS for Flight SQL.
    pub fn use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = Some(use_tls);
        self
    }

    /// Set the REST transport scheme.
    pub fn rest_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.rest_scheme = Some(scheme.into());
        self
    }

    /// Set the API token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the per-request timeout for control-plane calls.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Validate and build the parameters.
    ///
    /// # Errors
    /// Returns `ConnectionError::InvalidParameter` when the token or
    /// database is missing or empty.
    pub fn build(self) -> Result<ConnectionParams, ConnectionError> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConnectionError::InvalidParameter {
                parameter: "token".to_string(),
                message: "an API token is required".to_string(),
            })?;
        let database = self
            .database
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ConnectionError::InvalidParameter {
                parameter: "database".to_string(),
                message: "a database name is required".to_string(),
            })?;

        Ok(ConnectionParams {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            flight_port: self.flight_port.unwrap_or(DEFAULT_FLIGHT_PORT),
            rest_port: self.rest_port.unwrap_or(DEFAULT_REST_PORT),
            use_tls: self.use_tls.unwrap_or(false),
            rest_scheme: self
                .rest_scheme
                .unwrap_or_else(|| DEFAULT_REST_SCHEME.to_string()),
            database,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            token,
        })
    }
}

fn parse_port_var(name: &str) -> Result<Option<u16>, ConnectionError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u16>()
            .map(Some)
            .map_err(|_| ConnectionError::InvalidParameter {
                parameter: name.to_string(),
                message: format!("'{raw}' is not a valid port"),
            }),
        Err(_) => Ok(None),
    }
}

/// TLS flags accept `true`, `1` or `yes`, case-insensitively.
fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "true" | "1" | "yes")
}
