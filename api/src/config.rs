//! Layered configuration for the server binary
//!
//! Sources, lowest precedence first:
//! 1. `AppConfig::from_env()`: compiled defaults and the plain variables
//!    (`SERVER_PORT`, `JWT_SECRET`, `LOGIN_FAIL_THRESHOLD`, ...)
//! 2. optional `config/<environment>.toml`
//! 3. `SG__<SECTION>__<KEY>` variables, e.g. `SG__SERVER__PORT=9000`

use config::{Config, ConfigError, Environment as EnvSource, File};
use sg_shared::AppConfig;

/// Prefix of the nested override variables
pub const ENV_PREFIX: &str = "SG";

pub fn load() -> Result<AppConfig, ConfigError> {
    let base = AppConfig::from_env();
    let file = base.environment.config_file().to_string();
    layer(base, &file)
}

fn layer(base: AppConfig, file: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(Config::try_from(&base)?)
        .add_source(File::with_name(file).required(false))
        .add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
