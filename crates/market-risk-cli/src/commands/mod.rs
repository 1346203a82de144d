pub mod analysis;
pub mod derivatives;
pub mod fixed_income;
pub mod interest_rate_models;
pub mod portfolio;
pub mod volatility_surface;
