//! CLI commands module.

mod config;
mod enroll;
mod preprocess;
mod templates;
mod util;

pub use config::ConfigCommand;
pub use enroll::EnrollCommand;
pub use preprocess::PreprocessCommand;
pub use templates::TemplatesCommand;
pub use test::TestCommand;

pub(crate) use util::*;
