use sqlx::mysql::MySqlConnectOptions;
use thiserror::Error;

const ENV_PREFIX: &str = "MARIA115";
const DEFAULT_PORT: u16 = 3306;
const CHARSET: &str = "utf8mb4";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("환경 변수가 설정되지 않았습니다: {0}")]
    Missing(String),
    #[error("포트 값이 올바르지 않습니다: {0}")]
    InvalidPort(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 빈 값은 설정되지 않은 것으로 본다
        let read = |name: &str| {
            let key = format!("{ENV_PREFIX}_{name}");
            let value = lookup(&key).filter(|value| !value.trim().is_empty());
            (key, value)
        };
        let require = |name: &str| {
            let (key, value) = read(name);
            value.ok_or(ConfigError::Missing(key))
        };

        let port = match read("PORT").1 {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: require("HOST")?,
            user: require("USER")?,
            password: read("PASSWORD").1.unwrap_or_default(),
            database: require("DB")?,
            port,
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .charset(CHARSET)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}
