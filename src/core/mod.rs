pub mod etl;
pub mod lookup;
pub mod message;
pub mod pipeline;

pub use crate::domain::model::{DayMenu, MenuDocument, QuarterMenu, WeekRange, Weekday};
pub use crate::domain::ports::{ConfigProvider, MealClassifier, Pipeline, Storage};
pub use crate::utils::error::Result;
