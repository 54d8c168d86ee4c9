pub mod error;
pub mod matcher;
pub mod processing;
pub mod prompt;
pub mod rename_engine;
pub mod session;
pub mod similarity;
pub mod tui;
pub mod tvdb;
