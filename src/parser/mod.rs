//! Turns extracted PDF table text into a dated [`MenuDocument`].
//!
//! The work is split in four steps: the segmenter finds week blocks under a
//! weekday header, the date-range resolver dates each block, the normalizer
//! classifies each day's lines into meal slots and the builder merges blocks
//! that repeat the same weekly menu.

pub mod builder;
pub mod date_range;
pub mod normalizer;
pub mod segmenter;
pub mod table;

use crate::domain::model::MenuDocument;
use crate::domain::ports::MealClassifier;
use crate::utils::error::{MenuError, Result};
use builder::MenuModelBuilder;
use date_range::QuarterContext;
use normalizer::PositionalClassifier;
use segmenter::{SkippedBlock, TableSegmenter};
use table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub document: MenuDocument,
    pub skipped: Vec<SkippedBlock>,
}

pub struct MenuParser<C: MealClassifier = PositionalClassifier> {
    context: QuarterContext,
    classifier: C,
}

impl MenuParser<PositionalClassifier> {
    pub fn new(context: QuarterContext) -> Self {
        Self::with_classifier(context, PositionalClassifier)
    }
}

impl<C: MealClassifier> MenuParser<C> {
    pub fn with_classifier(context: QuarterContext, classifier: C) -> Self {
        Self {
            context,
            classifier,
        }
    }

    pub fn context(&self) -> QuarterContext {
        self.context
    }

    /// 區塊錯誤只記錄下來；完全建不出菜單才算失敗
    pub fn parse(&self, tables: &[Table]) -> Result<ParseReport> {
        if tables.iter().all(Table::is_blank) {
            return Err(MenuError::EmptyInput);
        }

        let segmentation = TableSegmenter::new(self.context).segment(tables);
        tracing::debug!(
            "Segmented {} week blocks, skipped {}",
            segmentation.groups.len(),
            segmentation.skipped.len()
        );

        let (document, dropped) = MenuModelBuilder::new(&self.classifier).build(segmentation.groups)?;
        let mut skipped = segmentation.skipped;
        skipped.extend(dropped);
        skipped.sort_by_key(|block| block.location);

        if document.is_empty() {
            return Err(MenuError::EmptyDocument {
                skipped: skipped.len(),
            });
        }

        Ok(ParseReport { document, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Weekday;
    use crate::parser::normalizer::LabelledClassifier;
    use crate::parser::segmenter::SegmentationError;
    use crate::parser::table::{Cell, Row};

    fn header() -> Row {
        Row::new(
            ["SETMANA", "Dilluns", "Dimarts", "Dimecres", "Dijous", "Divendres"]
                .iter()
                .enumerate()
                .map(|(column, label)| Cell::new(column, [*label]))
                .collect(),
        )
    }

    fn week(range: &str, monday: &[&str]) -> Row {
        Row::new(vec![
            Cell::new(0, [range]),
            Cell::new(1, monday.iter().copied()),
        ])
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let parser = MenuParser::new(QuarterContext::new(2025));
        assert!(matches!(parser.parse(&[]), Err(MenuError::EmptyInput)));
        assert!(matches!(
            parser.parse(&[Table::new(vec![Row::default()])]),
            Err(MenuError::EmptyInput)
        ));
    }

    #[test]
    fn test_no_usable_block_is_terminal() {
        let parser = MenuParser::new(QuarterContext::new(2025));
        let table = Table::new(vec![week("Del 9 al 12/09", &["Sopa"])]);
        assert!(matches!(
            parser.parse(&[table]),
            Err(MenuError::EmptyDocument { skipped: 1 })
        ));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = MenuParser::new(QuarterContext::new(2025));
        let tables = vec![Table::new(vec![
            header(),
            week("Del 9 al 12/09", &["SOPA", "PEIX", "FRUITA"]),
            week("Setmana ?", &["Res"]),
            week("Del 15 al 19/09", &["Sopa ", "peix", "fruita"]),
        ])];

        let first = parser.parse(&tables).unwrap();
        let second = parser.parse(&tables).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.document.to_json_pretty().unwrap(),
            second.document.to_json_pretty().unwrap()
        );
        assert_eq!(first.document.len(), 1);
        assert_eq!(first.document.quarters()[0].weeks().len(), 2);
        assert_eq!(first.skipped.len(), 1);
    }

    #[test]
    fn test_overlapping_week_is_reported_as_skipped() {
        let parser = MenuParser::new(QuarterContext::new(2025));
        let tables = vec![Table::new(vec![
            header(),
            week("Del 15 al 19/09", &["SOPA", "PEIX"]),
            week("Del 17/09 al 23/09", &["Sopa", "Peix"]),
        ])];

        let report = parser.parse(&tables).unwrap();
        assert_eq!(report.document.quarters()[0].weeks().len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].location.row, 2);
        assert!(matches!(
            &report.skipped[0].error,
            SegmentationError::OverlappingWeek { token, .. } if token == "Del 17/09 al 23/09"
        ));
    }

    #[test]
    fn test_custom_classifier() {
        let parser = MenuParser::with_classifier(QuarterContext::new(2025), LabelledClassifier);
        let tables = vec![Table::new(vec![
            header(),
            week("Del 9 al 12/09", &["Postre: Fruita", "Segon: Peix"]),
        ])];

        let report = parser.parse(&tables).unwrap();
        let monday = report.document.quarters()[0].day(Weekday::Dilluns).unwrap();
        assert_eq!(monday.entrant(), None);
        assert_eq!(monday.main(), Some("Peix"));
        assert_eq!(monday.dessert(), Some("Fruita"));
    }
}
