use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::SliderField;
use crate::form::field::FieldValue;

use super::helpers::format_number;
use super::{ComponentKind, FieldComponent, KeyOutcome, palette::ComponentPalette};

const TRACK_WIDTH: usize = 20;

/// One or two thumbs over `[min, max]`. Thumbs never cross.
#[derive(Debug, Clone)]
pub struct SliderComponent {
    config: SliderField,
    values: Vec<f64>,
    active: usize,
    palette: Arc<ComponentPalette>,
}

impl SliderComponent {
    pub fn new(config: SliderField, palette: Arc<ComponentPalette>) -> Self {
        let values = default_thumbs(&config);
        Self {
            config,
            values,
            active: 0,
            palette,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn active_thumb(&self) -> usize {
        self.active
    }

    /// Bounds the active thumb may move within.
    fn limits(&self, thumb: usize) -> (f64, f64) {
        let lower = if thumb > 0 {
            self.values[thumb - 1]
        } else {
            self.config.min
        };
        let upper = self
            .values
            .get(thumb + 1)
            .copied()
            .unwrap_or(self.config.max);
        (lower, upper)
    }

    fn set_active(&mut self, target: f64) -> KeyOutcome {
        let (lower, upper) = self.limits(self.active);
        let next = snap(target.clamp(lower, upper), &self.config).clamp(lower, upper);
        if self.values[self.active] == next {
            return KeyOutcome::Handled;
        }
        self.values[self.active] = next;
        KeyOutcome::Changed(FieldValue::Range(self.values.clone()))
    }

    fn track(&self) -> String {
        let span = (self.config.max - self.config.min).max(f64::EPSILON);
        let mut cells = vec!['─'; TRACK_WIDTH + 1];
        let positions = self
            .values
            .iter()
            .map(|value| {
                (((value - self.config.min) / span) * TRACK_WIDTH as f64).round() as usize
            })
            .map(|position| position.min(TRACK_WIDTH))
            .collect::<Vec<_>>();
        if let [from, to] = positions[..] {
            for cell in cells.iter_mut().take(to).skip(from) {
                *cell = '━';
            }
        }
        for (thumb, position) in positions.into_iter().enumerate() {
            cells[position] = if thumb == self.active { '●' } else { '○' };
        }
        cells.into_iter().collect()
    }
}

fn default_thumbs(config: &SliderField) -> Vec<f64> {
    match config.thumbs() {
        1 => vec![config.min],
        _ => vec![config.min, config.max],
    }
}

/// Round onto the step grid anchored at `min`.
fn snap(value: f64, config: &SliderField) -> f64 {
    if config.step <= 0.0 {
        return value;
    }
    let steps = ((value - config.min) / config.step).round();
    config.min + steps * config.step
}

impl FieldComponent for SliderComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Slider
    }

    fn display_value(&self) -> String {
        let unit = self.config.unit.as_deref().unwrap_or("");
        let labels = self
            .values
            .iter()
            .enumerate()
            .map(|(thumb, value)| {
                let title = self
                    .config
                    .titles
                    .get(thumb)
                    .map(|title| format!("{title}: "))
                    .unwrap_or_default();
                format!("{title}{}{unit}", format_number(*value))
            })
            .collect::<Vec<_>>()
            .join(" · ");
        format!("{} {labels}", self.track())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        let fast = key.modifiers.contains(KeyModifiers::SHIFT);
        let step = self.palette.numeric.step(self.config.step, fast);
        let current = self.values[self.active];
        match key.code {
            KeyCode::Left => self.set_active(current - step),
            KeyCode::Right => self.set_active(current + step),
            KeyCode::Home => self.set_active(self.config.min),
            KeyCode::End => self.set_active(self.config.max),
            KeyCode::Char(' ') if self.values.len() > 1 => {
                self.active = (self.active + 1) % self.values.len();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        let mut seeded = default_thumbs(&self.config);
        let incoming = match value {
            FieldValue::Range(values) => values.clone(),
            FieldValue::Number(number) => vec![*number],
            _ => Vec::new(),
        };
        for (slot, value) in seeded.iter_mut().zip(incoming) {
            *slot = value.clamp(self.config.min, self.config.max);
        }
        seeded.sort_by(f64::total_cmp);
        self.values = seeded;
        self.active = self.active.min(self.values.len() - 1);
    }

    fn current_value(&self) -> FieldValue {
        FieldValue::Range(self.values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn range_slider() -> SliderComponent {
        let config = SliderField {
            min: 0.0,
            max: 100.0,
            step: 5.0,
            unit: Some("%".into()),
            titles: vec!["From".into(), "To".into()],
        };
        SliderComponent::new(config, Arc::new(ComponentPalette::default()))
    }

    #[test]
    fn thumbs_never_cross() {
        let mut slider = range_slider();
        slider.seed_value(&FieldValue::Range(vec![40.0, 45.0]));
        slider.handle_key(&key(KeyCode::Right));
        assert_eq!(
            slider.handle_key(&key(KeyCode::Right)),
            KeyOutcome::Handled
        );
        assert_eq!(slider.values(), &[45.0, 45.0]);
        slider.handle_key(&key(KeyCode::Char(' ')));
        assert_eq!(
            slider.handle_key(&key(KeyCode::Left)),
            KeyOutcome::Handled
        );
    }

    #[test]
    fn seeding_clamps_to_bounds() {
        let mut slider = range_slider();
        slider.seed_value(&FieldValue::Range(vec![-10.0, 250.0]));
        assert_eq!(slider.values(), &[0.0, 100.0]);
        assert!(slider.display_value().ends_with("From: 0% · To: 100%"));
    }
}
