use std::env;
use std::time::Duration;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Which storage backend the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// MongoDB collections plus a GridFS bucket.
    Mongo,
    /// Process-local maps; contents are lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub mongo_uri: String,
    pub database_name: String,
    pub store_backend: StoreBackend,
    pub server_host: String,
    pub server_port: u16,
    pub public_base_url: String,
    pub cors_allowed_origin: String,
    pub max_upload_bytes: usize,
    pub files_public: bool,
    pub connect_timeout: Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Builds a configuration with every default applied and the given signing secret.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        let server_port = 5000;
        Self {
            jwt_secret: jwt_secret.into(),
            mongo_uri: "mongodb://localhost:27017".to_string(),
            database_name: "taskmanagement".to_string(),
            store_backend: StoreBackend::Mongo,
            server_host: "0.0.0.0".to_string(),
            server_port,
            public_base_url: format!("http://localhost:{}", server_port),
            cors_allowed_origin: "http://localhost:3000".to_string(),
            max_upload_bytes: 10 << 20,
            files_public: false,
            connect_timeout: Duration::from_secs(10),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let mut config = Self::with_secret(jwt_secret);

        if let Ok(uri) = env::var("MONGO_URI") {
            config.mongo_uri = uri;
        }
        if let Ok(name) = env::var("DATABASE_NAME") {
            config.database_name = name;
        }
        if let Ok(backend) = env::var("STORE_BACKEND") {
            config.store_backend = match backend.to_ascii_lowercase().as_str() {
                "mongo" | "mongodb" => StoreBackend::Mongo,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "STORE_BACKEND",
                        expected: "\"mongo\" or \"memory\"",
                        value: backend,
                    })
                }
            };
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = parse_var::<u16>("PORT", "a port number")? {
            config.server_port = port;
        }
        config.public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", config.server_port))
            .trim_end_matches('/')
            .to_string();
        if let Ok(origin) = env::var("CORS_ALLOWED_ORIGIN") {
            config.cors_allowed_origin = origin;
        }
        if let Some(limit) = parse_var::<usize>("MAX_UPLOAD_BYTES", "a byte count")? {
            config.max_upload_bytes = limit;
        }
        if let Some(public) = parse_var::<bool>("FILES_PUBLIC", "true or false")? {
            config.files_public = public;
        }
        if let Some(secs) = parse_var::<u64>("MONGO_CONNECT_TIMEOUT_SECS", "a number of seconds")? {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(cost) = parse_var::<u32>("BCRYPT_COST", "a bcrypt cost between 4 and 31")? {
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::Invalid {
                    name: "BCRYPT_COST",
                    expected: "a bcrypt cost between 4 and 31",
                    value: cost.to_string(),
                });
            }
            config.bcrypt_cost = cost;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server_host.clone(), self.server_port)
    }

    /// URL under which a stored blob is served back to clients.
    pub fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.public_base_url, file_id)
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                name,
                expected,
                value,
            }),
        Err(_) => Ok(None),
    }
}
