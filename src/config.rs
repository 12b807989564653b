use std::env;

/// Session-related settings, passed to `SessionLayer` at construction time.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie. Required.
    pub secret: String,
    /// Name of the session cookie.
    pub cookie_name: String,
}

/// Application configuration, loaded once at startup and passed explicitly
/// to everything that needs it. Nothing else reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            session: SessionConfig {
                secret: env::var("SESSION_SECRET").expect("SESSION_SECRET must be set"),
                cookie_name: env::var("SESSION_COOKIE_NAME")
                    .unwrap_or_else(|_| "sessionName".to_string()),
            },
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required environment variables
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("SESSION_SECRET", "test-secret");

        let config = Config::from_env();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.session.secret, "test-secret");
        assert_eq!(config.session.cookie_name, "sessionName");

        // Test custom values
        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("SESSION_COOKIE_NAME", "bizdir.sid");

        let config = Config::from_env();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.session.cookie_name, "bizdir.sid");

        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("SESSION_COOKIE_NAME");
    }
}
