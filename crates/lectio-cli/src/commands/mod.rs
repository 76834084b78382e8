pub mod catalog;
pub mod config;
pub mod plan;
pub mod read;
pub mod room;
pub mod streak;
