#[must_use]
pub(super) fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[must_use]
pub(super) fn non_empty_trimmed(raw: Option<String>) -> Option<String> {
    raw.map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Keeps surrounding whitespace, which is significant inside message templates.
#[must_use]
pub(super) fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}
