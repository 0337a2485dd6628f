#[cfg(feature = "cli")]
pub mod args;
pub mod cli;
pub mod settings;

#[cfg(feature = "cli")]
pub use args::CliConfig;
pub use settings::Settings;
