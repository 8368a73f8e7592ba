use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub mock_latency_min_ms: u64,
    pub mock_latency_max_ms: u64,
    pub seed_demo_data: bool,
    /// Fixed seed for shuffles; `None` seeds from entropy at startup.
    pub shuffle_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        let mock_latency_min_ms = env::var("MOCK_LATENCY_MIN_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let mock_latency_max_ms = env::var("MOCK_LATENCY_MAX_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0u64)
            .max(mock_latency_min_ms);

        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            mock_latency_min_ms,
            mock_latency_max_ms,
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
            shuffle_seed: env::var("SHUFFLE_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            mock_latency_min_ms: 0,
            mock_latency_max_ms: 0,
            seed_demo_data: false,
            shuffle_seed: Some(7),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.web_server_host.is_empty());
        assert!(config.mock_latency_max_ms >= config.mock_latency_min_ms);
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 8080));
        assert!(!config.seed_demo_data);
        assert_eq!(config.mock_latency_max_ms, 0);
    }
}
