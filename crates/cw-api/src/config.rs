//! HTTP surface configuration (spec section 6.5).

use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub listen_addr: String,
    pub body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            body_limit_bytes: 65_536,
        }
    }
}

impl HttpConfig {
    /// Overlay `LISTEN_ADDR` and `HTTP_BODY_LIMIT_BYTES` onto the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var("LISTEN_ADDR") {
            config.listen_addr = v;
        }
        if let Ok(v) = env::var("HTTP_BODY_LIMIT_BYTES") {
            if let Ok(n) = v.parse() {
                config.body_limit_bytes = n;
            }
        }
        config
    }
}
