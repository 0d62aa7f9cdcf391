use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub chat: ChatSettings,
    pub attendance: AttendanceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub issuer: String,
}

/// Project chat storage. Messages are encrypted at rest with a key derived
/// from `secret`.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatSettings {
    pub secret: String,
    pub max_message_length: usize,
    pub history_limit: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AttendanceSettings {
    /// Fixed offset used to bucket check-ins into calendar days and to decide
    /// which weekday "today" is at the kiosk. Minutes east of UTC.
    pub utc_offset_minutes: i32,
    /// How many recent records feed a monthly calendar.
    pub calendar_log_limit: i64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("ACADEMY"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "academy")?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.access_token_ttl_secs", 3600)?
            .set_default("jwt.refresh_token_ttl_secs", 604800)?
            .set_default("jwt.issuer", "academy")?
            .set_default("chat.secret", "academy-dev-chat-secret")?
            .set_default("chat.max_message_length", 2000)?
            .set_default("chat.history_limit", 100)?
            .set_default("attendance.utc_offset_minutes", 540)?
            .set_default("attendance.calendar_log_limit", 60)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
