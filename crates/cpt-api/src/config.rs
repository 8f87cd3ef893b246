use serde::Deserialize;

/// Deployment flavor, read from `ENV`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Shortest accepted `JWT_SECRET`, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Server configuration, deserialized from upper-case environment variables
/// (`DATABASE_URL`, `JWT_SECRET`, `PORT`, ...).
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// Comma separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_jwt_expiry_hours() -> i64 {
    24
}

const fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

const fn default_db_max_connections() -> u32 {
    10
}

fn default_allowed_origins() -> String {
    "http://localhost:5173".to_string()
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Self>()?.validated()
    }

    /// Build from explicit key/value pairs, as [`ApiConfig::from_env`] would
    /// read them from the process environment.
    pub fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(vars)?.validated()
    }

    fn validated(self) -> Result<Self, envy::Error> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(envy::Error::Custom(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters long"
            )));
        }
        if self.jwt_expiry_hours <= 0 {
            return Err(envy::Error::Custom(
                "JWT_EXPIRY_HOURS must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}
