use crate::utils::error::{ModelError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 學校週的五個工作日 (加泰隆尼亞語標籤)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Dilluns,
    Dimarts,
    Dimecres,
    Dijous,
    Divendres,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Dilluns,
        Weekday::Dimarts,
        Weekday::Dimecres,
        Weekday::Dijous,
        Weekday::Divendres,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Dilluns => "Dilluns",
            Weekday::Dimarts => "Dimarts",
            Weekday::Dimecres => "Dimecres",
            Weekday::Dijous => "Dijous",
            Weekday::Divendres => "Divendres",
        }
    }

    /// 不分大小寫、不分重音比對標籤
    pub fn from_label(text: &str) -> Option<Self> {
        let folded = fold_label(text);
        if folded.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|day| fold_label(day.label()) == folded)
    }

    pub fn from_chrono(weekday: chrono::Weekday) -> Option<Self> {
        match weekday {
            chrono::Weekday::Mon => Some(Weekday::Dilluns),
            chrono::Weekday::Tue => Some(Weekday::Dimarts),
            chrono::Weekday::Wed => Some(Weekday::Dimecres),
            chrono::Weekday::Thu => Some(Weekday::Dijous),
            chrono::Weekday::Fri => Some(Weekday::Divendres),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }

    /// 週末回傳 None
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Self::from_chrono(date.weekday())
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 任何日期的加泰隆尼亞語星期名稱 (含週末)
pub fn catalan_day_name(weekday: chrono::Weekday) -> &'static str {
    match weekday {
        chrono::Weekday::Sat => "Dissabte",
        chrono::Weekday::Sun => "Diumenge",
        other => Weekday::from_chrono(other).map(Weekday::label).unwrap_or_default(),
    }
}

// PDF 抽取結果可能是分解形式 (NFD)，先分解再去掉附加符號
fn fold_label(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !c.is_whitespace() && !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Deserialize)]
struct WeekRangeRecord {
    start: NaiveDate,
    end: NaiveDate,
}

/// 一段連續的上課週 (含頭尾)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "WeekRangeRecord")]
pub struct WeekRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl WeekRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> std::result::Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvertedWeekRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &WeekRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl TryFrom<WeekRangeRecord> for WeekRange {
    type Error = ModelError;

    fn try_from(record: WeekRangeRecord) -> std::result::Result<Self, Self::Error> {
        WeekRange::new(record.start, record.end)
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// 正規化後的三道菜，合併週次時以此比較
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MealSlots {
    pub entrant: Option<String>,
    pub main: Option<String>,
    pub dessert: Option<String>,
}

impl MealSlots {
    pub fn is_empty(&self) -> bool {
        self.entrant.is_none() && self.main.is_none() && self.dessert.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMenu {
    weekday: Weekday,
    slots: MealSlots,
    raw: Vec<String>,
}

impl DayMenu {
    pub fn new(
        weekday: Weekday,
        slots: MealSlots,
        raw: Vec<String>,
    ) -> std::result::Result<Self, ModelError> {
        if raw.is_empty() {
            return Err(ModelError::EmptyRawLines {
                weekday: weekday.to_string(),
            });
        }
        Ok(Self { weekday, slots, raw })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn entrant(&self) -> Option<&str> {
        self.slots.entrant.as_deref()
    }

    pub fn main(&self) -> Option<&str> {
        self.slots.main.as_deref()
    }

    pub fn dessert(&self) -> Option<&str> {
        self.slots.dessert.as_deref()
    }

    pub fn slots(&self) -> &MealSlots {
        &self.slots
    }

    pub fn raw(&self) -> &[String] {
        &self.raw
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DayMenuRecord {
    entrant: Option<String>,
    main: Option<String>,
    dessert: Option<String>,
    #[serde(default)]
    raw: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuarterMenuRecord {
    weeks: Vec<WeekRange>,
    #[serde(default)]
    days: BTreeMap<Weekday, DayMenuRecord>,
}

/// 一組在多個週次重複的週菜單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuarterMenuRecord", into = "QuarterMenuRecord")]
pub struct QuarterMenu {
    weeks: Vec<WeekRange>,
    days: BTreeMap<Weekday, DayMenu>,
}

impl QuarterMenu {
    pub fn new(
        mut weeks: Vec<WeekRange>,
        days: Vec<DayMenu>,
    ) -> std::result::Result<Self, ModelError> {
        if weeks.is_empty() {
            return Err(ModelError::NoWeeks);
        }
        weeks.sort();
        weeks.dedup();
        for pair in weeks.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(ModelError::OverlappingWeeks {
                    first: pair[0].to_string(),
                    second: pair[1].to_string(),
                });
            }
        }

        let mut by_day = BTreeMap::new();
        for day in days {
            let weekday = day.weekday();
            if by_day.insert(weekday, day).is_some() {
                return Err(ModelError::DuplicateDay {
                    weekday: weekday.to_string(),
                });
            }
        }

        Ok(Self {
            weeks,
            days: by_day,
        })
    }

    pub fn weeks(&self) -> &[WeekRange] {
        &self.weeks
    }

    pub fn days(&self) -> &BTreeMap<Weekday, DayMenu> {
        &self.days
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DayMenu> {
        self.days.get(&weekday)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.weeks.iter().any(|week| week.contains(date))
    }
}

impl TryFrom<QuarterMenuRecord> for QuarterMenu {
    type Error = ModelError;

    fn try_from(record: QuarterMenuRecord) -> std::result::Result<Self, Self::Error> {
        let days = record
            .days
            .into_iter()
            .map(|(weekday, day)| {
                DayMenu::new(
                    weekday,
                    MealSlots {
                        entrant: day.entrant,
                        main: day.main,
                        dessert: day.dessert,
                    },
                    day.raw,
                )
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        QuarterMenu::new(record.weeks, days)
    }
}

impl From<QuarterMenu> for QuarterMenuRecord {
    fn from(menu: QuarterMenu) -> Self {
        let days = menu
            .days
            .into_iter()
            .map(|(weekday, day)| {
                (
                    weekday,
                    DayMenuRecord {
                        entrant: day.slots.entrant,
                        main: day.slots.main,
                        dessert: day.slots.dessert,
                        raw: day.raw,
                    },
                )
            })
            .collect();
        QuarterMenuRecord {
            weeks: menu.weeks,
            days,
        }
    }
}

/// 一份 PDF 解析出的全部菜單，以 JSON 陣列輸出
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuDocument {
    quarters: Vec<QuarterMenu>,
}

impl MenuDocument {
    pub fn new(quarters: Vec<QuarterMenu>) -> Self {
        Self { quarters }
    }

    pub fn quarters(&self) -> &[QuarterMenu] {
        &self.quarters
    }

    pub fn is_empty(&self) -> bool {
        self.quarters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quarters.len()
    }

    /// 依文件順序找第一個包含該日期的菜單
    pub fn find_quarter(&self, date: NaiveDate) -> Option<&QuarterMenu> {
        self.quarters.iter().find(|quarter| quarter.contains(date))
    }

    /// 最早開始日到最晚結束日
    pub fn coverage(&self) -> Option<RangeInclusive<NaiveDate>> {
        let weeks = self.quarters.iter().flat_map(|quarter| quarter.weeks());
        let start = weeks.clone().map(WeekRange::start).min()?;
        let end = weeks.map(WeekRange::end).max()?;
        Some(start..=end)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.coverage()
            .map(|range| range.contains(&date))
            .unwrap_or(false)
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
