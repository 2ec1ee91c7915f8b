//! Settings file handling.
//!
//! Settings come from `<config_dir>/wss/config.toml` or an explicit
//! `--config` path in YAML or TOML.

mod file;
mod path;
mod settings;

pub use file::{ConfigFormat, load_settings, load_settings_from_str, load_settings_or_default, save_settings};
pub use path::{default_config_path, expand_home, home_dir, resolve_path};
pub use settings::{ExportSettings, PageSettings, RenderSettings, Settings, StoreSettings};
