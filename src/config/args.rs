use crate::core::ConfigProvider;
use crate::parser::date_range::QuarterContext;
use crate::utils::error::Result;
use crate::utils::validation::{validate_json_path, validate_range, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "menu-parser")]
#[command(about = "Convert an extracted school menu table into structured JSON")]
pub struct CliConfig {
    /// JSON produced by the PDF extraction step
    pub input: String,

    /// Output JSON file path (default: <input name>_menu.json)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Academic year the menu starts in (default: derived from today)
    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long = "print", help = "Print parsed menu to stdout")]
    pub print_output: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// "output/2025_q4.json" → "2025_q4_menu.json"
    pub fn default_output_path(input: &str) -> String {
        let stem = Path::new(input)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("menu");
        format!("{}_menu.json", stem)
    }
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| Self::default_output_path(&self.input))
    }

    fn quarter_context(&self) -> QuarterContext {
        match self.year {
            Some(year) => QuarterContext::new(year),
            None => QuarterContext::for_date(chrono::Local::now().date_naive()),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_json_path("input", &self.input)?;
        if let Some(output) = &self.output {
            validate_json_path("output", output)?;
        }
        if let Some(year) = self.year {
            validate_range("year", year, 2000, 2100)?;
        }
        Ok(())
    }
}
