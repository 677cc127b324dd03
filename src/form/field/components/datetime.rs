use std::sync::{Arc, LazyLock};

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use crossterm::event::{KeyCode, KeyEvent};
use regex::Regex;

use crate::domain::DatetimeField;
use crate::form::field::FieldValue;

use super::date::DateLocale;
use super::helpers::{plain_char, step_cursor};
use super::{
    ComponentKind, FieldComponent, KeyOutcome, ListOverlay, OverlayRow, OverlayView,
    palette::ComponentPalette,
};

const MINUTES_PER_DAY: u32 = 24 * 60;

static TIME_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<date>.*?)\s*(?:(?:\bat\b|\bàs\b|\bas\b|t)\s*)?(?P<h>\d{1,2}):(?P<m>\d{2})(?::(?P<s>\d{2}))?$")
        .expect("time suffix pattern compiles")
});

static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:in|em)\s+(?P<ahead>\d+)\s+(?P<unit_a>[a-zçõ]+)|(?P<ago>\d+)\s+(?P<unit_b>[a-zçõ]+)\s+(?:ago|atrás|atras))$")
        .expect("relative pattern compiles")
});

static NEXT_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^next\s+(?P<day>[a-z]+)$").expect("weekday pattern compiles"));

/// Understand free-form date/time text relative to `now`.
///
/// Recognised: `now`, `today`/`tomorrow`/`yesterday` (and `hoje`/`amanhã`/
/// `ontem`), `in 3 days`, `2 hours ago`, `next friday`, ISO dates and
/// `dd/mm/yyyy`, each optionally followed by `HH:MM`. Day words without a
/// time keep the time of `now`.
pub fn parse_natural_datetime(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    if let Some(moment) = parse_relative(&text, now) {
        return Some(moment);
    }
    if let Ok(moment) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dt%H:%M:%S") {
        return Some(moment);
    }

    let (date_part, time) = match TIME_SUFFIX.captures(&text) {
        Some(caps) => {
            let hour = caps["h"].parse().ok()?;
            let minute = caps["m"].parse().ok()?;
            let second = caps
                .name("s")
                .map(|s| s.as_str().parse())
                .transpose()
                .ok()?
                .unwrap_or(0);
            let time = NaiveTime::from_hms_opt(hour, minute, second)?;
            (caps["date"].trim().to_string(), Some(time))
        }
        None => (text.clone(), None),
    };

    let date = if date_part.is_empty() {
        now.date()
    } else {
        parse_day(&date_part, now.date())?
    };
    Some(date.and_time(time.unwrap_or_else(|| now.time())))
}

fn parse_day(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    match text {
        "today" | "hoje" => return Some(today),
        "tomorrow" | "amanhã" | "amanha" => return today.checked_add_days(Days::new(1)),
        "yesterday" | "ontem" => return today.checked_sub_days(Days::new(1)),
        _ => {}
    }
    if let Some(caps) = NEXT_WEEKDAY.captures(text) {
        let target = parse_weekday(&caps["day"])?;
        let ahead = (7 + target.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            % 7;
        let ahead = if ahead == 0 { 7 } else { ahead };
        return today.checked_add_days(Days::new(ahead as u64));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d/%m/%Y"))
        .ok()
}

fn parse_relative(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    if text == "now" || text == "agora" {
        return Some(now);
    }
    let caps = RELATIVE.captures(text)?;
    let (amount, unit, forward) = match caps.name("ahead") {
        Some(ahead) => (ahead.as_str(), &caps["unit_a"], true),
        None => (caps.name("ago")?.as_str(), &caps["unit_b"], false),
    };
    let amount: u32 = amount.parse().ok()?;
    let unit = unit.trim_end_matches('s');
    let shift_months = |months: u32| {
        if forward {
            now.checked_add_months(Months::new(months))
        } else {
            now.checked_sub_months(Months::new(months))
        }
    };
    let delta = match unit {
        "minute" | "min" | "minuto" => Duration::minutes(i64::from(amount)),
        "hour" | "h" | "hora" => Duration::hours(i64::from(amount)),
        "day" | "dia" => Duration::days(i64::from(amount)),
        "week" | "semana" => Duration::weeks(i64::from(amount)),
        "month" | "mes" | "mese" => return shift_months(amount),
        "year" | "ano" => return shift_months(amount.checked_mul(12)?),
        _ => return None,
    };
    if forward {
        now.checked_add_signed(delta)
    } else {
        now.checked_sub_signed(delta)
    }
}

fn parse_weekday(text: &str) -> Option<Weekday> {
    match text {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Time-of-day slots offered by the picker, every `step_minutes`.
pub fn time_slots(step_minutes: u32) -> Vec<NaiveTime> {
    let step = step_minutes.clamp(1, MINUTES_PER_DAY);
    (0..MINUTES_PER_DAY)
        .step_by(step as usize)
        .filter_map(|minute| NaiveTime::from_hms_opt(minute / 60, minute % 60, 0))
        .collect()
}

/// Free-text date/time input with a time-slot picker.
#[derive(Debug, Clone)]
pub struct DateTimeComponent {
    text: String,
    value: Option<NaiveDateTime>,
    now: NaiveDateTime,
    locale: DateLocale,
    slots: Vec<NaiveTime>,
    picker_open: bool,
    slot: usize,
    issue: Option<String>,
    placeholder: String,
    palette: Arc<ComponentPalette>,
}

impl DateTimeComponent {
    pub fn new(
        config: DatetimeField,
        placeholder: Option<String>,
        now: NaiveDateTime,
        palette: Arc<ComponentPalette>,
    ) -> Self {
        Self {
            text: String::new(),
            value: None,
            now,
            locale: DateLocale::from_tag(config.locale.as_deref()),
            slots: time_slots(config.time_step_minutes),
            picker_open: false,
            slot: 0,
            issue: None,
            placeholder: placeholder
                .unwrap_or_else(|| palette.pickers.datetime_placeholder.to_string()),
            palette,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn render(&self, moment: NaiveDateTime) -> String {
        format!(
            "{} {}",
            self.locale
                .format(moment.date(), crate::domain::DateFormat::Short),
            moment.format("%H:%M")
        )
    }

    fn commit(&mut self, moment: NaiveDateTime) -> KeyOutcome {
        self.issue = None;
        self.value = Some(moment);
        self.text = self.render(moment);
        KeyOutcome::Changed(FieldValue::DateTime(moment))
    }

    fn submit_text(&mut self) -> KeyOutcome {
        match parse_natural_datetime(&self.text, self.now) {
            Some(moment) => self.commit(moment),
            None => {
                tracing::debug!(text = %self.text, "datetime text not understood");
                self.issue = Some(format!("Could not understand '{}'", self.text.trim()));
                KeyOutcome::Handled
            }
        }
    }

    fn open_picker(&mut self) -> KeyOutcome {
        let reference = self.value.map(|moment| moment.time()).unwrap_or(self.now.time());
        self.slot = self
            .slots
            .iter()
            .rposition(|slot| *slot <= reference)
            .unwrap_or(0);
        self.picker_open = true;
        KeyOutcome::Handled
    }

    fn pick_slot(&mut self) -> KeyOutcome {
        self.picker_open = false;
        let Some(time) = self.slots.get(self.slot).copied() else {
            return KeyOutcome::Handled;
        };
        let date = self.value.map(|moment| moment.date()).unwrap_or(self.now.date());
        self.commit(date.and_time(time))
    }

    fn shown_text(&self) -> String {
        self.value.map(|moment| self.render(moment)).unwrap_or_default()
    }
}

impl FieldComponent for DateTimeComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::DateTime
    }

    fn display_value(&self) -> String {
        if self.text.is_empty() {
            format!("🕒 {}", self.placeholder)
        } else {
            format!("🕒 {}", self.text)
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if self.picker_open {
            let wrap = self.palette.choices.wrap_around;
            return match key.code {
                KeyCode::Up => {
                    self.slot = step_cursor(self.slot, -1, self.slots.len(), wrap);
                    KeyOutcome::Handled
                }
                KeyCode::Down => {
                    self.slot = step_cursor(self.slot, 1, self.slots.len(), wrap);
                    KeyOutcome::Handled
                }
                KeyCode::Enter => self.pick_slot(),
                KeyCode::Esc => self.dismiss(),
                _ => KeyOutcome::Ignored,
            };
        }
        match key.code {
            // Unchanged text: Enter opens the time slots instead.
            KeyCode::Enter if self.text.trim().is_empty() || self.text == self.shown_text() => {
                self.open_picker()
            }
            KeyCode::Enter => self.submit_text(),
            KeyCode::Backspace => {
                if self.text.pop().is_none() {
                    return KeyOutcome::Ignored;
                }
                KeyOutcome::Handled
            }
            KeyCode::Delete => {
                self.text.clear();
                self.issue = None;
                if self.value.take().is_some() {
                    KeyOutcome::Changed(FieldValue::Empty)
                } else {
                    KeyOutcome::Handled
                }
            }
            _ => match plain_char(key) {
                Some(ch) => {
                    self.text.push(ch);
                    KeyOutcome::Handled
                }
                None => KeyOutcome::Ignored,
            },
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        self.issue = None;
        self.value = match value {
            FieldValue::DateTime(moment) => Some(*moment),
            FieldValue::Date(date) => Some(date.and_time(NaiveTime::default())),
            _ => None,
        };
        self.text = self.shown_text();
    }

    fn current_value(&self) -> FieldValue {
        self.value.map(FieldValue::DateTime).unwrap_or_default()
    }

    fn issue(&self) -> Option<&str> {
        self.issue.as_deref()
    }

    fn dismiss(&mut self) -> KeyOutcome {
        if self.picker_open {
            self.picker_open = false;
            KeyOutcome::Handled
        } else {
            KeyOutcome::Ignored
        }
    }

    fn is_open(&self) -> bool {
        self.picker_open
    }

    fn overlay(&self) -> Option<OverlayView> {
        if !self.picker_open {
            return None;
        }
        let current = self.value.map(|moment| moment.time());
        let rows = self
            .slots
            .iter()
            .map(|slot| {
                let marker = if Some(*slot) == current { "✓" } else { " " };
                OverlayRow::new(marker, slot.format("%H:%M").to_string())
            })
            .collect();
        Some(OverlayView::List(ListOverlay {
            title: self.placeholder.clone(),
            rows,
            cursor: Some(self.slot),
            empty_text: self.palette.selectors.empty_text.to_string(),
            ..ListOverlay::default()
        }))
    }
}
