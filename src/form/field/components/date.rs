use std::sync::Arc;

use chrono::{Datelike, Days, Locale, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent};

use crate::domain::{DateField, DateFormat, DateMode};
use crate::form::field::FieldValue;

use super::{
    CalendarOverlay, ComponentKind, FieldComponent, KeyOutcome, OverlayView,
    palette::ComponentPalette,
};

/// Locales with date display support. Unknown tags fall back to `pt-BR`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateLocale {
    #[default]
    PtBr,
    EnUs,
    EsEs,
}

impl DateLocale {
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return Self::default();
        };
        match tag.to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => DateLocale::PtBr,
            "en-us" | "en" => DateLocale::EnUs,
            "es-es" | "es" => DateLocale::EsEs,
            other => {
                tracing::warn!(locale = other, "unsupported date locale, using pt-BR");
                Self::default()
            }
        }
    }

    fn chrono(self) -> Locale {
        match self {
            DateLocale::PtBr => Locale::pt_BR,
            DateLocale::EnUs => Locale::en_US,
            DateLocale::EsEs => Locale::es_ES,
        }
    }

    fn pattern(self, format: DateFormat) -> &'static str {
        match (self, format) {
            (DateLocale::EnUs, DateFormat::Long) => "%B %-d, %Y",
            (DateLocale::EnUs, DateFormat::Short) => "%m/%d/%Y",
            (_, DateFormat::Long) => "%-d de %B de %Y",
            (_, DateFormat::Short) => "%d/%m/%Y",
        }
    }

    pub fn format(self, date: NaiveDate, format: DateFormat) -> String {
        self.localized(date, self.pattern(format))
    }

    pub fn month_title(self, date: NaiveDate) -> String {
        self.localized(date, "%B %Y")
    }

    /// Two-letter weekday headers, Sunday first.
    pub fn weekdays(self) -> [String; 7] {
        // 2023-01-01 was a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
        std::array::from_fn(|offset| {
            let day = sunday + Days::new(offset as u64);
            self.localized(day, "%a").chars().take(2).collect()
        })
    }

    fn localized(self, date: NaiveDate, pattern: &str) -> String {
        Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
            .format_localized(pattern, self.chrono())
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateSelection {
    None,
    Single(NaiveDate),
    Range {
        from: NaiveDate,
        to: Option<NaiveDate>,
    },
}

/// Calendar date picker in single or range mode.
#[derive(Debug, Clone)]
pub struct DateComponent {
    config: DateField,
    locale: DateLocale,
    today: NaiveDate,
    selection: DateSelection,
    open: bool,
    cursor: NaiveDate,
    issue: Option<String>,
    placeholder: String,
}

impl DateComponent {
    pub fn new(
        config: DateField,
        placeholder: Option<String>,
        today: NaiveDate,
        palette: Arc<ComponentPalette>,
    ) -> Self {
        let locale = DateLocale::from_tag(config.locale.as_deref());
        Self {
            config,
            locale,
            today,
            selection: DateSelection::None,
            open: false,
            cursor: today,
            issue: None,
            placeholder: placeholder
                .unwrap_or_else(|| palette.pickers.date_placeholder.to_string()),
        }
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    fn anchor(&self) -> NaiveDate {
        match self.selection {
            DateSelection::Single(date) => date,
            DateSelection::Range { from, to } => to.unwrap_or(from),
            DateSelection::None => self.today,
        }
    }

    fn move_cursor(&mut self, days: i64) -> KeyOutcome {
        let next = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days as u64))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(next) = next {
            self.cursor = next;
        }
        KeyOutcome::Handled
    }

    fn move_month(&mut self, forward: bool) -> KeyOutcome {
        let next = if forward {
            self.cursor.checked_add_months(Months::new(1))
        } else {
            self.cursor.checked_sub_months(Months::new(1))
        };
        if let Some(next) = next {
            self.cursor = next;
        }
        KeyOutcome::Handled
    }

    fn pick(&mut self) -> KeyOutcome {
        let day = self.cursor;
        if self.config.disable_future && day > self.today {
            self.issue = Some("Future dates are not available".to_string());
            return KeyOutcome::Handled;
        }
        self.issue = None;
        self.selection = match (self.config.mode, self.selection) {
            (DateMode::Single, _) => {
                self.open = false;
                DateSelection::Single(day)
            }
            (DateMode::Range, DateSelection::Range { from, to: None }) if day >= from => {
                self.open = false;
                DateSelection::Range {
                    from,
                    to: Some(day),
                }
            }
            (DateMode::Range, _) => DateSelection::Range {
                from: day,
                to: None,
            },
        };
        KeyOutcome::Changed(self.current_value())
    }

    fn close(&mut self) -> KeyOutcome {
        self.open = false;
        KeyOutcome::Handled
    }
}

impl FieldComponent for DateComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Date
    }

    fn display_value(&self) -> String {
        let format = |date| self.locale.format(date, self.config.format);
        let text = match self.selection {
            DateSelection::None => self.placeholder.clone(),
            DateSelection::Single(date) => format(date),
            DateSelection::Range { from, to: None } => format!("{} - …", format(from)),
            DateSelection::Range { from, to: Some(to) } => {
                format!("{} - {}", format(from), format(to))
            }
        };
        format!("📅 {text}")
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if !self.open {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.open = true;
                    self.cursor = self.anchor();
                    KeyOutcome::Handled
                }
                KeyCode::Delete | KeyCode::Backspace
                    if self.selection != DateSelection::None =>
                {
                    self.selection = DateSelection::None;
                    KeyOutcome::Changed(FieldValue::Empty)
                }
                _ => KeyOutcome::Ignored,
            };
        }
        match key.code {
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-7),
            KeyCode::Down => self.move_cursor(7),
            KeyCode::PageUp => self.move_month(false),
            KeyCode::PageDown => self.move_month(true),
            KeyCode::Home => {
                self.cursor = self.today;
                KeyOutcome::Handled
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.pick(),
            KeyCode::Esc => self.close(),
            _ => KeyOutcome::Ignored,
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        self.selection = match value {
            FieldValue::Date(date) => DateSelection::Single(*date),
            FieldValue::DateTime(moment) => DateSelection::Single(moment.date()),
            FieldValue::DateRange { from, to } => DateSelection::Range {
                from: *from,
                to: *to,
            },
            _ => DateSelection::None,
        };
    }

    fn current_value(&self) -> FieldValue {
        match self.selection {
            DateSelection::None => FieldValue::Empty,
            DateSelection::Single(date) => FieldValue::Date(date),
            DateSelection::Range { from, to } => FieldValue::DateRange { from, to },
        }
    }

    fn issue(&self) -> Option<&str> {
        self.issue.as_deref()
    }

    fn dismiss(&mut self) -> KeyOutcome {
        if self.open {
            self.close()
        } else {
            KeyOutcome::Ignored
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn overlay(&self) -> Option<OverlayView> {
        if !self.open {
            return None;
        }
        let (selected_from, selected_to) = match self.selection {
            DateSelection::None => (None, None),
            DateSelection::Single(date) => (Some(date), None),
            DateSelection::Range { from, to } => (Some(from), to),
        };
        Some(OverlayView::Calendar(CalendarOverlay {
            title: self.locale.month_title(self.cursor),
            cursor: self.cursor,
            today: self.today,
            selected_from,
            selected_to,
            disable_future: self.config.disable_future,
            weekdays: self.locale.weekdays(),
        }))
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
