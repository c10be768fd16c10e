//! Configuration loading.
//!
//! Sources, later ones winning: the optional `config/default` file (any format
//! the `config` crate understands) and `MEDLINK__<SECTION>__<KEY>` environment
//! variables. Whatever is missing comes from `Settings::default()`.

mod settings;

use config::{Config, ConfigError, Environment, File};

pub use settings::{
    ApiSettings, ChatSettings, LogSettings, OutboundPolicy, PartialSettings, RelaySettings,
    Settings,
};

pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("MEDLINK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge_with_defaults())
}
