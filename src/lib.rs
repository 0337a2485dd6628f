pub mod config;
pub mod core;
pub mod domain;
pub mod parser;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, Settings};

pub use core::lookup::{lookup, Lookup, UnavailableReason, WeekendPolicy};
pub use core::message::{compose, MessageFormat};
pub use core::{etl::EtlEngine, pipeline::MenuPipeline};
pub use domain::model::{DayMenu, MealSlots, MenuDocument, QuarterMenu, WeekRange, Weekday};
pub use parser::{date_range::QuarterContext, MenuParser, ParseReport};
pub use utils::error::{MenuError, Result};
