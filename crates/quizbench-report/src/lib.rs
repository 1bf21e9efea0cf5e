//! quizbench-report — Score charts and tables.

pub mod chart;
pub mod table;
