use crate::domain::model::{WeekRange, Weekday};
use crate::parser::date_range::{self, DateRangeParseError, QuarterContext};
use crate::parser::table::{Row, Table};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("week block appears before any weekday header")]
    MissingHeader,

    #[error("weekday header is malformed: {reason}")]
    MalformedHeader { reason: String },

    #[error("unrecognized week header '{text}'")]
    UnrecognizedWeekHeader { text: String },

    #[error(transparent)]
    DateRange(#[from] DateRangeParseError),

    #[error("week '{token}' overlaps {existing}, already listed for the same menu")]
    OverlappingWeek { token: String, existing: WeekRange },
}

/// 區塊在抽取結果中的位置 (從 0 起算)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockLocation {
    pub table: usize,
    pub row: usize,
}

impl fmt::Display for BlockLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {}, row {}", self.table + 1, self.row + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    pub location: BlockLocation,
    pub error: SegmentationError,
}

/// 週次標記與解析出的日期
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWeek {
    pub token: String,
    pub range: WeekRange,
}

/// 一列週次：解析好的日期範圍與各天的原始文字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGroup {
    pub location: BlockLocation,
    pub weeks: Vec<ResolvedWeek>,
    pub days: BTreeMap<Weekday, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub groups: Vec<WeekGroup>,
    pub skipped: Vec<SkippedBlock>,
}

#[derive(Debug, Clone)]
enum HeaderState {
    Missing,
    Malformed(String),
    Valid(BTreeMap<usize, Weekday>),
}

pub struct TableSegmenter {
    context: QuarterContext,
}

impl TableSegmenter {
    pub fn new(context: QuarterContext) -> Self {
        Self { context }
    }

    pub fn segment(&self, tables: &[Table]) -> Segmentation {
        let mut result = Segmentation::default();
        for (table_idx, table) in tables.iter().enumerate() {
            // 每張表都要有自己的星期標題列
            let mut header = HeaderState::Missing;
            for (row_idx, row) in table.rows.iter().enumerate() {
                let location = BlockLocation {
                    table: table_idx,
                    row: row_idx,
                };
                if let Some(state) = Self::read_header(row) {
                    if let HeaderState::Malformed(reason) = &state {
                        tracing::warn!("⚠️ Malformed weekday header at {}: {}", location, reason);
                    }
                    header = state;
                    continue;
                }
                match self.read_week(row, &header, location) {
                    Ok(Some(group)) => result.groups.push(group),
                    Ok(None) => {}
                    Err(error) => {
                        tracing::warn!("⚠️ Skipping block at {}: {}", location, error);
                        result.skipped.push(SkippedBlock { location, error });
                    }
                }
            }
        }
        result
    }

    /// 有任何一格是星期名稱就視為標題列
    fn read_header(row: &Row) -> Option<HeaderState> {
        let labelled: Vec<(usize, Weekday)> = row
            .cells
            .iter()
            .filter_map(|cell| Weekday::from_label(&cell.text()).map(|day| (cell.column, day)))
            .collect();
        if labelled.is_empty() {
            return None;
        }

        let mut columns = BTreeMap::new();
        for (column, day) in &labelled {
            if columns.values().any(|seen| seen == day) {
                return Some(HeaderState::Malformed(format!("{} appears twice", day)));
            }
            if columns.insert(*column, *day).is_some() {
                return Some(HeaderState::Malformed(format!(
                    "column {} holds two weekday labels",
                    column
                )));
            }
        }

        let missing: Vec<&str> = Weekday::ALL
            .iter()
            .filter(|day| !columns.values().any(|seen| seen == *day))
            .map(|day| day.label())
            .collect();
        if !missing.is_empty() {
            return Some(HeaderState::Malformed(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        Some(HeaderState::Valid(columns))
    }

    fn read_week(
        &self,
        row: &Row,
        header: &HeaderState,
        location: BlockLocation,
    ) -> Result<Option<WeekGroup>, SegmentationError> {
        let range_cell = row
            .cells
            .iter()
            .position(|cell| date_range::contains_range_token(&cell.text()));

        let columns = match (header, range_cell) {
            (HeaderState::Valid(columns), _) => columns,
            (HeaderState::Missing, Some(_)) => return Err(SegmentationError::MissingHeader),
            (HeaderState::Malformed(reason), Some(_)) => {
                return Err(SegmentationError::MalformedHeader {
                    reason: reason.clone(),
                })
            }
            (_, None) => {
                if !row.is_blank() {
                    tracing::debug!("Discarding row at {} outside any week block", location);
                }
                return Ok(None);
            }
        };

        let Some(range_idx) = range_cell else {
            return Self::unrecognized_week(row, columns, location);
        };

        let text = row.cells[range_idx].text();
        let mut weeks = Vec::new();
        let mut first_error = None;
        for token in date_range::find_range_tokens(&text) {
            match date_range::resolve(token, &self.context) {
                Ok(range) => weeks.push(ResolvedWeek {
                    token: token.to_string(),
                    range,
                }),
                Err(err) => {
                    tracing::warn!("⚠️ Ignoring week range '{}' at {}: {}", token, location, err);
                    first_error.get_or_insert(err);
                }
            }
        }
        if weeks.is_empty() {
            return Err(first_error
                .map(SegmentationError::from)
                .unwrap_or(SegmentationError::UnrecognizedWeekHeader { text }));
        }

        let mut days: BTreeMap<Weekday, Vec<String>> = BTreeMap::new();
        for (idx, cell) in row.cells.iter().enumerate() {
            if idx == range_idx {
                continue;
            }
            match columns.get(&cell.column) {
                Some(day) => {
                    let lines = cell.content_lines();
                    if !lines.is_empty() {
                        days.entry(*day).or_default().extend(lines);
                    }
                }
                None if !cell.is_blank() => {
                    tracing::debug!(
                        "Discarding cell '{}' at {}: not under a weekday column",
                        cell.text(),
                        location
                    );
                }
                None => {}
            }
        }

        Ok(Some(WeekGroup {
            location,
            weeks,
            days,
        }))
    }

    // 沒有週次標記：有菜色內容而開頭格不是空白才算壞掉的區塊
    fn unrecognized_week(
        row: &Row,
        columns: &BTreeMap<usize, Weekday>,
        location: BlockLocation,
    ) -> Result<Option<WeekGroup>, SegmentationError> {
        let has_day_content = row
            .cells
            .iter()
            .any(|cell| columns.contains_key(&cell.column) && !cell.is_blank());
        let leading = row
            .cells
            .iter()
            .filter(|cell| !columns.contains_key(&cell.column))
            .min_by_key(|cell| cell.column)
            .filter(|cell| !cell.is_blank());

        match leading {
            Some(cell) if has_day_content => Err(SegmentationError::UnrecognizedWeekHeader {
                text: cell.text(),
            }),
            _ => {
                if !row.is_blank() {
                    tracing::debug!("Discarding row at {} without a week header", location);
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::table::Cell;
    use chrono::NaiveDate;

    fn row(cells: &[&[&str]]) -> Row {
        Row::new(
            cells
                .iter()
                .enumerate()
                .map(|(column, lines)| Cell::new(column, lines.iter().copied()))
                .collect(),
        )
    }

    fn header() -> Row {
        row(&[
            &["SETMANA"],
            &["Dilluns"],
            &["Dimarts"],
            &["Dimecres"],
            &["Dijous"],
            &["Divendres"],
        ])
    }

    fn week(range: &str, dish: &str) -> Row {
        row(&[
            &[range],
            &[dish, "Pollastre rostit", "Fruita"],
            &["Macarrons", "Lluç", "Iogurt"],
            &["Cigrons", "Truita", "Fruita"],
            &["Arròs", "Croquetes", "Fruita"],
            &["Pizza", "Amanida", "Gelat"],
        ])
    }

    fn segmenter() -> TableSegmenter {
        TableSegmenter::new(QuarterContext::new(2025))
    }

    #[test]
    fn test_segments_week_rows_under_header() {
        let table = Table::new(vec![
            header(),
            week("Del 9 al 12/09 Del 6 al 10/10", "Mongeta"),
            week("Del 15 al 19/09", "Llenties"),
        ]);

        let result = segmenter().segment(&[table]);
        assert!(result.skipped.is_empty());
        assert_eq!(result.groups.len(), 2);

        let first = &result.groups[0];
        let tokens: Vec<&str> = first.weeks.iter().map(|week| week.token.as_str()).collect();
        assert_eq!(tokens, vec!["Del 9 al 12/09", "Del 6 al 10/10"]);
        assert_eq!(first.weeks[1].range.start(), NaiveDate::from_ymd_opt(2025, 10, 6).unwrap());
        assert_eq!(first.days.len(), 5);
        assert_eq!(first.days[&Weekday::Dilluns][0], "Mongeta");
        assert_eq!(result.groups[1].days[&Weekday::Divendres], vec!["Pizza", "Amanida", "Gelat"]);
    }

    #[test]
    fn test_rows_before_header_are_skipped() {
        let table = Table::new(vec![
            row(&[&["MENÚ ESCOLAR"]]),
            week("Del 1 al 5/09", "Sopa"),
            header(),
            week("Del 9 al 12/09", "Mongeta"),
        ]);

        let result = segmenter().segment(&[table]);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].error, SegmentationError::MissingHeader);
        assert_eq!(result.skipped[0].location, BlockLocation { table: 0, row: 1 });
    }

    #[test]
    fn test_bad_range_skips_only_that_block() {
        let table = Table::new(vec![
            header(),
            week("Setmana 2", "Sopa"),
            week("Del 30 al 31/02", "Crema"),
            week("Del 15 al 19/09", "Llenties"),
        ]);

        let result = segmenter().segment(&[table]);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].weeks[0].token, "Del 15 al 19/09");
        assert_eq!(result.groups[0].weeks.len(), 1);
        assert_eq!(result.skipped.len(), 2);
        assert!(matches!(
            result.skipped[0].error,
            SegmentationError::UnrecognizedWeekHeader { ref text } if text == "Setmana 2"
        ));
        assert!(matches!(
            result.skipped[1].error,
            SegmentationError::DateRange(DateRangeParseError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_malformed_header_skips_blocks_until_next_table() {
        let broken = Table::new(vec![
            row(&[&["SETMANA"], &["Dilluns"], &["Dimarts"], &["Dimecres"]]),
            week("Del 9 al 12/09", "Mongeta"),
        ]);
        let good = Table::new(vec![header(), week("Del 15 al 19/09", "Llenties")]);

        let result = segmenter().segment(&[broken, good]);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].location, BlockLocation { table: 1, row: 1 });
        assert!(matches!(
            &result.skipped[0].error,
            SegmentationError::MalformedHeader { reason } if reason.contains("Dijous")
        ));
    }

    #[test]
    fn test_decomposed_header_labels_are_recognized() {
        let table = Table::new(vec![
            row(&[
                &["SETMANA"],
                &["DILLUNS"],
                &["DIMARTS"],
                &["DIMECRES"],
                &["Dijo\u{301}us"],
                &["DIVENDRES"],
            ]),
            week("Del 9 al 12/09", "Mongeta"),
        ]);

        let result = segmenter().segment(&[table]);
        assert!(result.skipped.is_empty());
        assert_eq!(result.groups[0].days[&Weekday::Dijous], vec!["Arròs", "Croquetes", "Fruita"]);
    }

    #[test]
    fn test_header_state_does_not_leak_between_tables() {
        let first = Table::new(vec![header(), week("Del 9 al 12/09", "Mongeta")]);
        let second = Table::new(vec![week("Del 15 al 19/09", "Llenties")]);

        let result = segmenter().segment(&[first, second]);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.skipped[0].error, SegmentationError::MissingHeader);
    }

    #[test]
    fn test_duplicate_weekday_is_malformed() {
        let table = Table::new(vec![
            row(&[
                &["SETMANA"],
                &["Dilluns"],
                &["Dilluns"],
                &["Dimecres"],
                &["Dijous"],
                &["Divendres"],
            ]),
            week("Del 9 al 12/09", "Mongeta"),
        ]);

        let result = segmenter().segment(&[table]);
        assert!(result.groups.is_empty());
        assert!(matches!(
            result.skipped[0].error,
            SegmentationError::MalformedHeader { .. }
        ));
    }

    #[test]
    fn test_columns_follow_header_order_and_drop_unaligned_cells() {
        let table = Table::new(vec![
            Row::new(vec![
                Cell::new(0, ["SETMANA"]),
                Cell::new(10, ["Divendres"]),
                Cell::new(20, ["Dijous"]),
                Cell::new(30, ["Dimecres"]),
                Cell::new(40, ["Dimarts"]),
                Cell::new(50, ["Dilluns"]),
            ]),
            Row::new(vec![
                Cell::new(0, ["Del 9 al 12/09"]),
                Cell::new(10, ["Pizza"]),
                Cell::new(50, ["Mongeta"]),
                Cell::new(55, ["Nota al peu"]),
                Cell::new(30, ["", "  "]),
            ]),
        ]);

        let result = segmenter().segment(&[table]);
        let group = &result.groups[0];
        assert_eq!(group.days[&Weekday::Divendres], vec!["Pizza"]);
        assert_eq!(group.days[&Weekday::Dilluns], vec!["Mongeta"]);
        assert!(!group.days.contains_key(&Weekday::Dimecres));
        assert_eq!(group.days.len(), 2);
    }

    #[test]
    fn test_blank_leading_cell_is_not_an_error() {
        let table = Table::new(vec![
            header(),
            row(&[&[""], &["Nota"], &[], &[], &[], &[]]),
        ]);

        let result = segmenter().segment(&[table]);
        assert!(result.groups.is_empty());
        assert!(result.skipped.is_empty());
    }
}
