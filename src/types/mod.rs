pub mod config;
pub mod report;
pub mod roster;
pub mod scoring;
