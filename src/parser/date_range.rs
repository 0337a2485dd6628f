use crate::domain::model::WeekRange;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// 學年從七月開始：7-12 月屬於起始年，1-6 月屬於下一年
const COURSE_FIRST_MONTH: u32 = 7;

// "Del 9 al 12/09", "Del 29/09 al 3/10", "Del 29 al 3/10"
static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdel\s+(\d{1,2})(?:\s*/\s*(\d{1,2}))?\s+al\s+(\d{1,2})\s*/\s*(\d{1,2})")
        .expect("week range pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeParseError {
    #[error("'{token}' does not look like 'Del D al D/MM'")]
    Malformed { token: String },

    #[error("'{token}' names an impossible date {day}/{month}/{year}")]
    InvalidDate {
        token: String,
        day: u32,
        month: u32,
        year: i32,
    },

    #[error("'{token}' starts on {start} after it ends on {end}")]
    Inverted {
        token: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// 解析週次時用來決定年份的學年
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterContext {
    academic_year: i32,
}

impl QuarterContext {
    pub fn new(academic_year: i32) -> Self {
        Self { academic_year }
    }

    /// 由某一天推出所在學年
    pub fn for_date(date: NaiveDate) -> Self {
        if date.month() >= COURSE_FIRST_MONTH {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn academic_year(&self) -> i32 {
        self.academic_year
    }

    pub fn year_for_month(&self, month: u32) -> i32 {
        if month >= COURSE_FIRST_MONTH {
            self.academic_year
        } else {
            self.academic_year + 1
        }
    }
}

/// 找出文字中所有週次標記，一個儲存格可能列出好幾週
pub fn find_range_tokens(text: &str) -> Vec<&str> {
    RANGE_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn contains_range_token(text: &str) -> bool {
    RANGE_PATTERN.is_match(text)
}

pub fn resolve(token: &str, context: &QuarterContext) -> Result<WeekRange, DateRangeParseError> {
    let malformed = || DateRangeParseError::Malformed {
        token: token.to_string(),
    };
    let caps = RANGE_PATTERN.captures(token).ok_or_else(malformed)?;
    let number = |idx: usize| -> Option<u32> { caps.get(idx).and_then(|m| m.as_str().parse().ok()) };

    let start_day = number(1).ok_or_else(malformed)?;
    let end_day = number(3).ok_or_else(malformed)?;
    let end_month = number(4).ok_or_else(malformed)?;
    if !(1..=12).contains(&end_month) {
        return Err(malformed());
    }

    let start_month = match number(2) {
        Some(month) if (1..=12).contains(&month) => month,
        Some(_) => return Err(malformed()),
        // 只有一個月份時屬於結束日；開始日較大代表跨月
        None if start_day > end_day => previous_month(end_month),
        None => end_month,
    };

    // 兩端都放進同一個學年；月份倒置或跨出學年的範圍會變成 Inverted
    let start_year = context.year_for_month(start_month);
    let end_year = context.year_for_month(end_month);

    let start = make_date(token, start_year, start_month, start_day)?;
    let end = make_date(token, end_year, end_month, end_day)?;

    WeekRange::new(start, end).map_err(|_| DateRangeParseError::Inverted {
        token: token.to_string(),
        start,
        end,
    })
}

fn previous_month(month: u32) -> u32 {
    if month == 1 {
        12
    } else {
        month - 1
    }
}

fn make_date(token: &str, year: i32, month: u32, day: u32) -> Result<NaiveDate, DateRangeParseError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateRangeParseError::InvalidDate {
        token: token.to_string(),
        day,
        month,
        year,
    })
}
