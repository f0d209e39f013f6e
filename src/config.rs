use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub environment: String,
    pub cors_allowed_origins: Vec<String>,
    pub booking_max_attempts: u32,
    pub db_max_connections: Option<u32>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "5000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_ttl_days: env::var("JWT_TTL_DAYS").unwrap_or_else(|_| "30".to_string()).parse().expect("JWT_TTL_DAYS must be a number"),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
            booking_max_attempts: env::var("BOOKING_MAX_ATTEMPTS").unwrap_or_else(|_| "5".to_string()).parse().expect("BOOKING_MAX_ATTEMPTS must be a number"),
            db_max_connections: env::var("DB_MAX_CONNECTIONS").ok().and_then(|v| v.parse().ok()),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
