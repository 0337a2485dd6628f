use crate::core::lookup::{lookup, Lookup, UnavailableReason, WeekendPolicy};
use crate::domain::model::{catalan_day_name, MenuDocument};
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    #[default]
    Plain,
    /// Telegram parse_mode=HTML，加上 emoji
    Telegram,
}

/// 產生每日菜單訊息 (只產生文字，不負責發送)
pub fn compose(
    document: &MenuDocument,
    date: NaiveDate,
    base_url: &str,
    format: MessageFormat,
    policy: WeekendPolicy,
) -> String {
    let result = lookup(document, date, policy);
    let date = result.date();
    let day_label = format!(
        "{} {}",
        catalan_day_name(date.weekday()),
        date.format("%d/%m/%Y")
    );

    let mut lines = Vec::new();
    match result {
        Lookup::Menu { menu, .. } => {
            lines.push(headline(
                format,
                &format!("Avui el menú del dia és ({}):", day_label),
            ));
            lines.push(String::new());
            let courses = [
                ("🥗", "Primer", menu.entrant()),
                ("🍖", "Segon", menu.main()),
                ("🍰", "Postre", menu.dessert()),
            ];
            for (emoji, label, dish) in courses {
                let Some(dish) = dish else { continue };
                lines.push(match format {
                    MessageFormat::Plain => format!("{}: {}", label, dish),
                    MessageFormat::Telegram => {
                        format!("{} <b>{}:</b> {}", emoji, label, escape_html(dish))
                    }
                });
            }
        }
        Lookup::Unavailable {
            reason: UnavailableReason::NoDayEntry(_),
            ..
        } => {
            lines.push(headline(
                format,
                &format!("Avui ({}) és dia de lliure disposició.", day_label),
            ));
        }
        Lookup::NoData { .. } if document.covers(date) => {
            lines.push(headline(
                format,
                &format!("Avui ({}) és dia de lliure disposició.", day_label),
            ));
        }
        Lookup::NoData { .. }
        | Lookup::Unavailable {
            reason: UnavailableReason::Weekend,
            ..
        } => {
            lines.push(headline(
                format,
                &format!("Avui ({}) no hi ha menú disponible.", day_label),
            ));
        }
    }

    lines.push(String::new());
    lines.push(match format {
        MessageFormat::Plain => format!("Si voleu saber més, visiteu {}", base_url),
        MessageFormat::Telegram => format!("ℹ️ Si voleu saber més, visiteu {}", base_url),
    });
    lines.join("\n")
}

fn headline(format: MessageFormat, text: &str) -> String {
    match format {
        MessageFormat::Plain => text.to_string(),
        MessageFormat::Telegram => format!("🍽️ <b>{}</b>", text),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
