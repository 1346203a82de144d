pub mod comprehensive;
pub mod risk_report;
