use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "Pingdom API token is missing. Set `api_token` in the provider config file \
        or the PINGDOM_API_TOKEN environment variable"
    )]
    MissingApiToken,

    #[error("SolarWinds user and password must be present together")]
    PartialSolarwindsCredentials,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
