use serde::Deserialize;
use crate::models::Role;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,  // in bytes
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub redis_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub secure: bool,  // Send the cookie over HTTPS only
}

#[derive(Debug, Deserialize, Clone)]
pub struct BuiltinAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
    // Usernames that bypass project access checks
    pub privileged_users: Vec<String>,
    // Always-valid accounts that live outside the user store
    pub builtin_accounts: Vec<BuiltinAccount>,
}

impl AuthConfig {
    pub fn builtin(&self, username: &str) -> Option<&BuiltinAccount> {
        self.builtin_accounts.iter().find(|a| a.username == username)
    }

    pub fn is_builtin(&self, username: &str) -> bool {
        self.builtin(username).is_some()
    }
}

// APP_SERVER__PORT overrides server.port
fn environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(environment())
    }

    fn load_with(env: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(env)
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
impl Config {
    /// Memory-backed configuration with the stock accounts and a cheap bcrypt cost.
    pub fn for_tests() -> Self {
        let account = |username: &str, password: &str, role| BuiltinAccount {
            username: username.to_string(),
            password: password.to_string(),
            role,
        };

        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                max_body_size: 64 * 1024,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                redis_url: String::new(),
            },
            session: SessionConfig {
                secure: false,
            },
            auth: AuthConfig {
                bcrypt_cost: 4,  // lowest cost bcrypt accepts
                privileged_users: vec!["admin".into(), "jose".into()],
                builtin_accounts: vec![
                    account("admin", "admin123", Role::Admin),
                    account("jose", "jose123", Role::User),
                    account("user", "user123", Role::User),
                ],
            },
        }
    }
}
