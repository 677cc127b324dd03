use std::fmt;

/// Colour class of the footer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTone {
    #[default]
    Neutral,
    Success,
    Warning,
    Error,
}

/// The last thing the form told the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Ready,
    Editing(String),
    Disabled(String),
    /// A field's value changed. Carries the field's error after live
    /// validation, if it has one.
    Edited {
        label: String,
        error: Option<String>,
    },
    Submitted {
        filled: usize,
    },
    /// Submit was refused. `global` counts messages no field owns.
    Rejected {
        issues: usize,
        global: usize,
    },
    ConfirmExit {
        unsaved: usize,
    },
}

impl FormStatus {
    pub fn tone(&self) -> StatusTone {
        match self {
            FormStatus::Ready | FormStatus::Editing(_) => StatusTone::Neutral,
            FormStatus::Edited { error: None, .. } => StatusTone::Neutral,
            FormStatus::Edited { error: Some(_), .. } | FormStatus::Rejected { .. } => {
                StatusTone::Error
            }
            FormStatus::Submitted { .. } => StatusTone::Success,
            FormStatus::Disabled(_) | FormStatus::ConfirmExit { .. } => StatusTone::Warning,
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormStatus::Ready => f.write_str("Ready. Press Ctrl+S to submit."),
            FormStatus::Editing(label) => write!(f, "Editing {label}"),
            FormStatus::Disabled(label) => write!(f, "{label} is disabled"),
            FormStatus::Edited { label, error: None } => write!(f, "{label} updated"),
            FormStatus::Edited {
                label,
                error: Some(error),
            } => write!(f, "{label}: {error}"),
            FormStatus::Submitted { filled } => write!(f, "Submitted {filled} field(s)"),
            FormStatus::Rejected { issues, global: 0 } => {
                write!(f, "{issues} issue(s) remaining")
            }
            FormStatus::Rejected { issues, global } => {
                write!(f, "{issues} issue(s) remaining, {global} not tied to a field")
            }
            FormStatus::ConfirmExit { unsaved } => write!(
                f,
                "{unsaved} unsaved field(s). Press Ctrl+Q again to quit without submitting."
            ),
        }
    }
}

/// Footer status. The rendered text is cached so a frame can borrow it.
#[derive(Debug, Clone)]
pub struct StatusLine {
    status: FormStatus,
    message: String,
}

impl Default for StatusLine {
    fn default() -> Self {
        let status = FormStatus::default();
        Self {
            message: status.to_string(),
            status,
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, status: FormStatus) {
        self.message = status.to_string();
        tracing::trace!(status = %self.message, "status changed");
        self.status = status;
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn tone(&self) -> StatusTone {
        self.status.tone()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_show_the_fields_error() {
        let mut line = StatusLine::new();
        line.set(FormStatus::Edited {
            label: "Email".into(),
            error: Some("not an email".into()),
        });
        assert_eq!(line.message(), "Email: not an email");
        assert_eq!(line.tone(), StatusTone::Error);

        line.set(FormStatus::Edited {
            label: "Email".into(),
            error: None,
        });
        assert_eq!(line.message(), "Email updated");
        assert_eq!(line.tone(), StatusTone::Neutral);
    }

    #[test]
    fn rejected_submits_count_global_messages() {
        let plain = FormStatus::Rejected { issues: 2, global: 0 };
        assert_eq!(plain.to_string(), "2 issue(s) remaining");
        let mixed = FormStatus::Rejected { issues: 3, global: 1 };
        assert_eq!(mixed.to_string(), "3 issue(s) remaining, 1 not tied to a field");
    }

    #[test]
    fn submit_and_exit_have_their_own_tones() {
        assert_eq!(FormStatus::Submitted { filled: 2 }.tone(), StatusTone::Success);
        assert_eq!(FormStatus::ConfirmExit { unsaved: 1 }.tone(), StatusTone::Warning);
        assert_eq!(StatusLine::new().message(), "Ready. Press Ctrl+S to submit.");
    }
}
