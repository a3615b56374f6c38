//! Settings and variable interpolation.
//!
//! - [`settings`] - cache location, legacy host and tool overrides
//! - [`interpolation`] - `${var}` substitution used when rendering

pub mod interpolation;
pub mod settings;

pub use interpolation::{
    extract_variables, has_interpolation, parse_interpolation, resolve_string,
    InterpolationContext, Segment,
};
pub use settings::{
    default_cache_dir, default_settings_path, Settings, CACHE_DIR_ENV, CONFIG_ENV,
    DEFAULT_MAX_LEGACY_REDIRECTS,
};
