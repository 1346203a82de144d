pub mod risk;
pub mod risk_score;
pub mod sizing;
