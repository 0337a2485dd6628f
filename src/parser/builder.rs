use crate::domain::model::{DayMenu, MealSlots, MenuDocument, QuarterMenu, WeekRange, Weekday};
use crate::domain::ports::MealClassifier;
use crate::parser::segmenter::{
    BlockLocation, ResolvedWeek, SegmentationError, SkippedBlock, WeekGroup,
};
use crate::utils::error::Result;
use std::collections::BTreeMap;

struct PendingMenu {
    pattern: BTreeMap<Weekday, MealSlots>,
    raw: BTreeMap<Weekday, Vec<String>>,
    weeks: Vec<WeekRange>,
}

impl PendingMenu {
    /// 重疊的週不加入，回報給呼叫端
    fn add_weeks(
        &mut self,
        weeks: Vec<ResolvedWeek>,
        location: BlockLocation,
        dropped: &mut Vec<SkippedBlock>,
    ) {
        for week in weeks {
            if self.weeks.contains(&week.range) {
                continue;
            }
            if let Some(existing) = self.weeks.iter().find(|kept| kept.overlaps(&week.range)) {
                let error = SegmentationError::OverlappingWeek {
                    token: week.token,
                    existing: *existing,
                };
                tracing::warn!("⚠️ Dropping week at {}: {}", location, error);
                dropped.push(SkippedBlock { location, error });
                continue;
            }
            self.weeks.push(week.range);
        }
    }

    fn into_quarter(self) -> Result<QuarterMenu> {
        let days = self
            .pattern
            .into_iter()
            .map(|(weekday, slots)| {
                let raw = self.raw.get(&weekday).cloned().unwrap_or_default();
                DayMenu::new(weekday, slots, raw)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(QuarterMenu::new(self.weeks, days)?)
    }
}

/// 正規化每一週並把內容相同的週合併成同一份菜單
pub struct MenuModelBuilder<'a> {
    classifier: &'a dyn MealClassifier,
}

impl<'a> MenuModelBuilder<'a> {
    pub fn new(classifier: &'a dyn MealClassifier) -> Self {
        Self { classifier }
    }

    /// 回傳文件與因重疊被丟掉的週
    pub fn build(&self, groups: Vec<WeekGroup>) -> Result<(MenuDocument, Vec<SkippedBlock>)> {
        let mut pending: Vec<PendingMenu> = Vec::new();
        let mut dropped = Vec::new();

        for group in groups {
            let pattern: BTreeMap<Weekday, MealSlots> = group
                .days
                .iter()
                .map(|(weekday, lines)| (*weekday, self.classifier.classify(lines)))
                .collect();

            // 以正規化後的三道菜比較，不看原始大小寫或空白
            match pending.iter_mut().find(|menu| menu.pattern == pattern) {
                Some(menu) => {
                    tracing::debug!(
                        "Merging week block at {} ({}) into an existing menu",
                        group.location,
                        group
                            .weeks
                            .iter()
                            .map(|week| week.token.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                    menu.add_weeks(group.weeks, group.location, &mut dropped);
                }
                None => {
                    let mut menu = PendingMenu {
                        pattern,
                        raw: group.days,
                        weeks: Vec::new(),
                    };
                    menu.add_weeks(group.weeks, group.location, &mut dropped);
                    pending.push(menu);
                }
            }
        }

        let quarters = pending
            .into_iter()
            .map(PendingMenu::into_quarter)
            .collect::<Result<Vec<_>>>()?;
        Ok((MenuDocument::new(quarters), dropped))
    }
}
