pub mod interpolation;
pub mod loader;
pub mod schema;
pub mod validation;

pub use interpolation::{
    interpolate,
    InterpolationError,
};
pub use loader::{
    ConfigLoadError,
    ConfigLoadResult,
    ConfigLoader,
};
pub use schema::{
    CliLocations,
    GlobalConfiguration,
};
pub use validation::{
    ConfigError,
    ConfigErrorCode,
    ConfigValidator,
    ConfigWarning,
    ConfigWarningCode,
    ValidationResult,
};
