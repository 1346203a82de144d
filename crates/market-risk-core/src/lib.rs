pub mod config;
pub mod error;
pub mod math;
pub mod types;

#[cfg(feature = "interest_rate_models")]
pub mod interest_rate_models;

#[cfg(feature = "derivatives")]
pub mod derivatives;

#[cfg(feature = "fixed_income")]
pub mod fixed_income;

#[cfg(feature = "volatility_surface")]
pub mod volatility_surface;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use config::AnalysisConfig;
pub use error::AnalyticsError;
pub use types::*;

/// Standard result type for all market-risk operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
