use std::env;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl_hours: i64,
    pub cancellation_notice_minutes: i64,
    pub booking_notice_minutes: i64,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub admin_login: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            jwt_secret: String::new(),
            jwt_issuer: "clinic-api".to_string(),
            jwt_ttl_hours: 2,
            cancellation_notice_minutes: 120,
            booking_notice_minutes: 0,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            admin_login: None,
            admin_password: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            server_port: parsed_var("SERVER_PORT", defaults.server_port),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| defaults.jwt_issuer.clone()),
            jwt_ttl_hours: parsed_var("JWT_TTL_HOURS", defaults.jwt_ttl_hours),
            cancellation_notice_minutes: parsed_var(
                "CANCELLATION_NOTICE_MINUTES",
                defaults.cancellation_notice_minutes,
            ),
            booking_notice_minutes: parsed_var(
                "BOOKING_NOTICE_MINUTES",
                defaults.booking_notice_minutes,
            ),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY").unwrap_or_default(),
            admin_login: env::var("ADMIN_LOGIN").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - JWT_SECRET is missing, every token will be rejected");
        }

        if !config.is_supabase_configured() {
            warn!("SUPABASE_URL / SUPABASE_ANON_PUBLIC_KEY not set, using in-memory storage");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn is_supabase_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

fn parsed_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
