use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Password strength thresholds. These are deployment policy, not code.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_letter: bool,
    pub require_digit: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub cors_origin: String,
    pub cookie_secure: bool,
    pub jwt: JwtConfig,
    pub password: PasswordPolicy,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "blogit".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "blogit-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let password = PasswordPolicy {
            min_length: std::env::var("PASSWORD_MIN_LENGTH")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(8),
            require_letter: std::env::var("PASSWORD_REQUIRE_LETTER")
                .map(|v| v != "false")
                .unwrap_or(true),
            require_digit: std::env::var("PASSWORD_REQUIRE_DIGIT")
                .map(|v| v != "false")
                .unwrap_or(true),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")?,
            bucket: std::env::var("MINIO_BUCKET")?,
            access_key: std::env::var("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY")?,
            region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };
        Ok(Self {
            database_url,
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "true")
                .unwrap_or(false),
            jwt,
            password,
            storage,
        })
    }
}
