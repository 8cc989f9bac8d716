pub mod aggregator;
pub mod presenter;
