pub mod api;
pub mod cli;
pub mod core;
pub mod github;
pub mod grid;
pub mod jobs;
