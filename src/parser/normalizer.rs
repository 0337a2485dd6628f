use crate::domain::model::MealSlots;
use crate::domain::ports::MealClassifier;
use unicode_normalization::UnicodeNormalization;

/// 句首大寫、其餘小寫，保留重音 (à, è, é, í, ò, ó, ú, ï, ü, ç, l·l)，輸出為 NFC
pub fn normalize_text(text: &str) -> String {
    let trimmed = text.trim_matches(|c: char| c == '-' || c.is_whitespace());
    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    let composed: String = collapsed.nfc().collect();

    let mut chars = composed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn normalized_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| normalize_text(line))
        .filter(|line| !line.is_empty())
        .collect()
}

/// 表格沒有標示菜名時依順序分配：第一道、第二道、其餘為甜點
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalClassifier;

impl MealClassifier for PositionalClassifier {
    fn classify(&self, lines: &[String]) -> MealSlots {
        let mut meals = normalized_lines(lines).into_iter();
        let entrant = meals.next();
        let main = meals.next();
        let rest: Vec<String> = meals.collect();
        MealSlots {
            entrant,
            main,
            dessert: if rest.is_empty() {
                None
            } else {
                Some(rest.join(", "))
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Entrant,
    Main,
    Dessert,
}

const SLOT_LABELS: [(&str, Slot); 5] = [
    ("primer", Slot::Entrant),
    ("entrant", Slot::Entrant),
    ("segon", Slot::Main),
    ("principal", Slot::Main),
    ("postre", Slot::Dessert),
];

/// 用於有 "Primer:" / "Segon:" / "Postre:" 標籤的表格
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelledClassifier;

impl LabelledClassifier {
    fn split_label(line: &str) -> Option<(Slot, &str)> {
        let (label, rest) = line.split_once(':')?;
        let label = label.trim().to_lowercase();
        SLOT_LABELS
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, slot)| (*slot, rest))
    }
}

impl MealClassifier for LabelledClassifier {
    fn classify(&self, lines: &[String]) -> MealSlots {
        let mut slots = MealSlots::default();
        let mut unlabelled = Vec::new();

        for line in lines {
            match Self::split_label(line) {
                Some((slot, text)) => {
                    let text = normalize_text(text);
                    if text.is_empty() {
                        continue;
                    }
                    let target = match slot {
                        Slot::Entrant => &mut slots.entrant,
                        Slot::Main => &mut slots.main,
                        Slot::Dessert => &mut slots.dessert,
                    };
                    if target.is_none() {
                        *target = Some(text);
                    } else {
                        unlabelled.push(text);
                    }
                }
                None => {
                    let text = normalize_text(line);
                    if !text.is_empty() {
                        unlabelled.push(text);
                    }
                }
            }
        }

        for text in unlabelled {
            if let Some(empty) = [&mut slots.entrant, &mut slots.main, &mut slots.dessert]
                .into_iter()
                .find(|slot| slot.is_none())
            {
                *empty = Some(text);
            } else {
                tracing::debug!("No free meal slot for '{}'", text);
            }
        }

        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_basic_text() {
        assert_eq!(normalize_text("hello world"), "Hello world");
        assert_eq!(normalize_text("HELLO WORLD"), "Hello world");
        assert_eq!(normalize_text("hELLo WoRLd"), "Hello world");
    }

    #[test]
    fn test_normalize_keeps_catalan_accents() {
        assert_eq!(
            normalize_text("GALL DINDI A LA PLANXA AMB AMANIDA"),
            "Gall dindi a la planxa amb amanida"
        );
        assert_eq!(normalize_text("CREMA DE CARBASSÓ"), "Crema de carbassó");
        assert_eq!(normalize_text("ÀNEC AMB PRUNES"), "Ànec amb prunes");
        assert_eq!(normalize_text("FIDEUÀ DE PEIX"), "Fideuà de peix");
        assert_eq!(normalize_text("CIGRONS AMB ESPINACS I PINYONS"), "Cigrons amb espinacs i pinyons");
        assert_eq!(normalize_text("PAELLA AMB MUSCLOS I PÈSOLS"), "Paella amb musclos i pèsols");
        assert_eq!(normalize_text("COL·LIFLOR GRATINADA"), "Col·liflor gratinada");
        assert_eq!(normalize_text("LLUÍS ÏNUIT ÜÇ"), "Lluís ïnuit üç");
    }

    #[test]
    fn test_normalize_strips_dashes_and_spaces() {
        assert_eq!(normalize_text("- hello world -"), "Hello world");
        assert_eq!(normalize_text("  -  test  -  "), "Test");
        assert_eq!(normalize_text("---special---"), "Special");
        assert_eq!(normalize_text("Arròs    amb\ttomàquet"), "Arròs amb tomàquet");
    }

    #[test]
    fn test_normalize_composes_decomposed_accents() {
        let decomposed = "CREMA DE CARBASSO\u{301}";
        assert_eq!(normalize_text(decomposed), "Crema de carbassó");
        assert_eq!(normalize_text(decomposed), normalize_text("CREMA DE CARBASSÓ"));
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
        assert_eq!(normalize_text("---"), "");
        assert_eq!(normalize_text("ñ"), "Ñ");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for text in [
            "Gall dindi a la planxa amb amanida",
            "Crema de carbassó",
            "- MACARRONS   A LA BOLONYESA -",
            "Iogurt natural",
        ] {
            let once = normalize_text(text);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn test_positional_three_lines() {
        let slots = PositionalClassifier.classify(&lines(&[
            "MONGETA TENDRA AMB PATATES",
            "GALL DINDI A LA PLANXA AMB AMANIDA",
            "FRUITA",
        ]));
        assert_eq!(slots.entrant.as_deref(), Some("Mongeta tendra amb patates"));
        assert_eq!(slots.main.as_deref(), Some("Gall dindi a la planxa amb amanida"));
        assert_eq!(slots.dessert.as_deref(), Some("Fruita"));
    }

    #[test]
    fn test_positional_leaves_missing_slots_empty() {
        let slots = PositionalClassifier.classify(&lines(&["", "Arròs a la cubana", "  "]));
        assert_eq!(slots.entrant.as_deref(), Some("Arròs a la cubana"));
        assert!(slots.main.is_none());
        assert!(slots.dessert.is_none());

        assert!(PositionalClassifier.classify(&lines(&["-"])).is_empty());
    }

    #[test]
    fn test_positional_joins_remaining_lines_into_dessert() {
        let slots = PositionalClassifier.classify(&lines(&[
            "Sopa de galets",
            "Pollastre rostit",
            "Fruita",
            "Pa integral",
        ]));
        assert_eq!(slots.dessert.as_deref(), Some("Fruita, Pa integral"));
    }

    #[test]
    fn test_labelled_classifier() {
        let slots = LabelledClassifier.classify(&lines(&[
            "Postre: IOGURT",
            "Primer: ESPAGUETIS",
            "LLUÇ AL FORN",
        ]));
        assert_eq!(slots.entrant.as_deref(), Some("Espaguetis"));
        assert_eq!(slots.main.as_deref(), Some("Lluç al forn"));
        assert_eq!(slots.dessert.as_deref(), Some("Iogurt"));
    }
}
