use crate::domain::model::{DayMenu, MenuDocument, Weekday};
use crate::utils::error::MenuError;
use chrono::{Datelike, Days, NaiveDate};
use std::str::FromStr;

/// 週六、週日要怎麼處理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekendPolicy {
    /// 週末沒有菜單
    #[default]
    Exact,
    /// 改查前一個週五
    PreviousFriday,
    /// 改查下一個週一
    NextMonday,
}

impl WeekendPolicy {
    pub fn adjust(self, date: NaiveDate) -> NaiveDate {
        let shift = match (self, date.weekday()) {
            (WeekendPolicy::PreviousFriday, chrono::Weekday::Sat) => -1,
            (WeekendPolicy::PreviousFriday, chrono::Weekday::Sun) => -2,
            (WeekendPolicy::NextMonday, chrono::Weekday::Sat) => 2,
            (WeekendPolicy::NextMonday, chrono::Weekday::Sun) => 1,
            _ => 0,
        };
        shift_days(date, shift).unwrap_or(date)
    }
}

impl FromStr for WeekendPolicy {
    type Err = MenuError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "exact" => Ok(WeekendPolicy::Exact),
            "previous" | "friday" => Ok(WeekendPolicy::PreviousFriday),
            "next" | "monday" => Ok(WeekendPolicy::NextMonday),
            other => Err(MenuError::InvalidConfigValueError {
                field: "weekend".to_string(),
                value: other.to_string(),
                reason: "expected one of: exact, previous, next".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    Weekend,
    /// 週次有資料但這天沒有 (例如假日)
    NoDayEntry(Weekday),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Menu {
        date: NaiveDate,
        weekday: Weekday,
        menu: &'a DayMenu,
    },
    Unavailable {
        date: NaiveDate,
        reason: UnavailableReason,
    },
    NoData {
        date: NaiveDate,
    },
}

impl<'a> Lookup<'a> {
    /// 套用週末規則後實際查詢的日期
    pub fn date(&self) -> NaiveDate {
        match self {
            Lookup::Menu { date, .. } | Lookup::Unavailable { date, .. } | Lookup::NoData { date } => {
                *date
            }
        }
    }

    pub fn menu(&self) -> Option<&'a DayMenu> {
        match self {
            Lookup::Menu { menu, .. } => Some(*menu),
            _ => None,
        }
    }
}

/// 找出某天的菜單；查不到是正常結果，不是錯誤
pub fn lookup(document: &MenuDocument, date: NaiveDate, policy: WeekendPolicy) -> Lookup<'_> {
    let date = policy.adjust(date);
    let Some(weekday) = Weekday::from_date(date) else {
        return Lookup::Unavailable {
            date,
            reason: UnavailableReason::Weekend,
        };
    };

    match document.find_quarter(date) {
        None => Lookup::NoData { date },
        Some(quarter) => match quarter.day(weekday) {
            Some(menu) => Lookup::Menu {
                date,
                weekday,
                menu,
            },
            None => Lookup::Unavailable {
                date,
                reason: UnavailableReason::NoDayEntry(weekday),
            },
        },
    }
}

/// 前一個上課日 (跳過週末)
pub fn previous_school_day(date: NaiveDate) -> Option<NaiveDate> {
    let mut day = date.checked_sub_days(Days::new(1))?;
    while Weekday::from_date(day).is_none() {
        day = day.checked_sub_days(Days::new(1))?;
    }
    Some(day)
}

/// 下一個上課日 (跳過週末)
pub fn next_school_day(date: NaiveDate) -> Option<NaiveDate> {
    let mut day = date.checked_add_days(Days::new(1))?;
    while Weekday::from_date(day).is_none() {
        day = day.checked_add_days(Days::new(1))?;
    }
    Some(day)
}

fn shift_days(date: NaiveDate, shift: i64) -> Option<NaiveDate> {
    if shift >= 0 {
        date.checked_add_days(Days::new(shift.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(shift.unsigned_abs()))
    }
}
