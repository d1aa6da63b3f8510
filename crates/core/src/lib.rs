pub mod catalog;
pub mod eml;
pub mod error;
pub mod types;
