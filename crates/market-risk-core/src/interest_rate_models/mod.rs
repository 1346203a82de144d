pub mod short_rate;
pub mod term_structure;
