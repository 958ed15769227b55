
pub mod fixtures;
pub mod integration;
pub mod unit;
