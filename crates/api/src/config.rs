/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// the vault secrets, which must always be set explicitly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    ///
    /// Higher than a typical API default because sync requests call out to
    /// external providers with their own 30-second timeout.
    pub request_timeout_secs: u64,
    /// Encryption secret for stored provider credentials (`VAULT_SECRET_KEY`).
    pub vault_secret_key: String,
    /// Independent second secret used for IV derivation (`VAULT_SECRET_SALT`).
    pub vault_secret_salt: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                       |
    /// | `VAULT_SECRET_KEY`     | (required)                 |
    /// | `VAULT_SECRET_SALT`    | (required)                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let vault_secret_key =
            std::env::var("VAULT_SECRET_KEY").expect("VAULT_SECRET_KEY must be set");
        let vault_secret_salt =
            std::env::var("VAULT_SECRET_SALT").expect("VAULT_SECRET_SALT must be set");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            vault_secret_key,
            vault_secret_salt,
        }
    }
}
