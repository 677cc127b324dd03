use std::sync::LazyLock;

use regex::Regex;

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[^\s$.?#][^\s]*\.[a-z]{2,}[^\s]*$").expect("link pattern compiles")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z]{2,})+$",
    )
    .expect("email pattern compiles")
});

/// Where a link field points once its text is recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Url(String),
    Mail(String),
}

impl LinkTarget {
    pub fn href(&self) -> String {
        match self {
            LinkTarget::Url(url) => url.clone(),
            LinkTarget::Mail(address) => format!("mailto:{address}"),
        }
    }
}

pub fn is_valid_link(raw: &str) -> bool {
    LINK_REGEX.is_match(raw)
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_REGEX.is_match(raw)
}

/// An http(s) URL opens as-is; an e-mail address becomes a `mailto:` target.
pub fn link_target(raw: &str) -> Option<LinkTarget> {
    let trimmed = raw.trim();
    if is_valid_link(trimmed) {
        Some(LinkTarget::Url(trimmed.to_string()))
    } else if is_valid_email(trimmed) {
        Some(LinkTarget::Mail(trimmed.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_emails_resolve_to_targets() {
        assert_eq!(
            link_target("https://example.com/a?b=1").map(|target| target.href()),
            Some("https://example.com/a?b=1".to_string())
        );
        assert_eq!(
            link_target("ana@example.com.br").map(|target| target.href()),
            Some("mailto:ana@example.com.br".to_string())
        );
    }

    #[test]
    fn plain_text_has_no_target() {
        assert_eq!(link_target("example"), None);
        assert_eq!(link_target("ftp://example.com"), None);
        assert_eq!(link_target("http://localhost"), None);
    }
}
