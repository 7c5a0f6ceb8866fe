pub mod client;
pub mod codegen;
pub mod collect;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod planning;
pub mod prompt;
pub mod render;
pub mod report;
pub mod resolver;
pub mod session;
pub mod types;
pub mod workflow;

pub use error::{Result, SprintdocError};
