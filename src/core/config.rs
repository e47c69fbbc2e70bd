use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "aura-development-secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_min: i64,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub app_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://aura.db?mode=rwc".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expires_min: 60,
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
            max_connections: 5,
            app_env: "development".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the environment, reading `.env` first
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        let defaults = Config::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using the development default");
            defaults.jwt_secret
        });

        let jwt_expires_min = match env::var("JWT_EXPIRES_MIN") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| "Invalid JWT_EXPIRES_MIN: must be a positive number of minutes".to_string())?,
            Err(_) => defaults.jwt_expires_min,
        };

        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?,
            Err(_) => defaults.server_port,
        };

        let max_connections = match env::var("MAX_DB_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?,
            Err(_) => defaults.max_connections,
        };

        let app_env = env::var("APP_ENV").unwrap_or(defaults.app_env);

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_expires_min,
            server_host,
            server_port,
            max_connections,
            app_env,
        })
    }

    /// Logs the configuration with secrets masked
    pub fn print_info(&self) {
        info!(environment = %self.app_env, "Server configuration");
        info!("Server address: {}:{}", self.server_host, self.server_port);
        info!("Database: {}", Self::mask_url(&self.database_url));
        info!("Max DB connections: {}", self.max_connections);
        info!("Token lifetime: {} min", self.jwt_expires_min);
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("JWT secret: using the default (insecure)");
        } else {
            info!("JWT secret: custom secret configured");
        }
    }

    /// Hides credentials and query parameters of a database URL
    fn mask_url(url: &str) -> String {
        let Some(scheme_end) = url.find("://") else {
            return "***".to_string();
        };
        let scheme = &url[..scheme_end + 3];
        match url.find('@') {
            Some(at_pos) => format!("{}***{}", scheme, &url[at_pos..]),
            None => {
                let rest = &url[scheme_end + 3..];
                let path = rest.split('?').next().unwrap_or(rest);
                format!("{scheme}{path}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_url_hides_credentials() {
        assert_eq!(
            Config::mask_url("postgres://user:pw@db:5432/aura"),
            "postgres://***@db:5432/aura"
        );
        assert_eq!(Config::mask_url("sqlite://aura.db?mode=rwc"), "sqlite://aura.db");
        assert_eq!(Config::mask_url("garbage"), "***");
    }
}
