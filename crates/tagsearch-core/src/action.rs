//! Outbound actions derived from a stored query.
//!
//! Both derivations are pure. Templates are validated once when the builder
//! is constructed, so malformed configuration surfaces at startup.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::Serialize;

use crate::config::ActionConfig;
use crate::error::{Result, TagSearchError};

/// Placeholder replaced by the search URL in share message templates.
pub const URL_PLACEHOLDER: &str = "{url}";

/// Bytes left verbatim: ASCII alphanumerics and `_-!.~'()*`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'-')
    .remove(b'!')
    .remove(b'.')
    .remove(b'~')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareMessage {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBuilder {
    url_template: String,
    share_subject: String,
    share_prefix: String,
    share_suffix: String,
}

impl ActionBuilder {
    pub fn new(
        url_template: impl Into<String>,
        share_subject: impl Into<String>,
        share_message: &str,
    ) -> Result<Self> {
        let url_template = url_template.into();
        validate_url_template(&url_template)?;

        let share_subject = share_subject.into();
        if share_subject.trim().is_empty() {
            return Err(TagSearchError::Config(
                "share subject must be non-empty".to_string(),
            ));
        }

        let (share_prefix, share_suffix) = split_share_template(share_message)?;
        Ok(Self {
            url_template,
            share_subject,
            share_prefix: share_prefix.to_string(),
            share_suffix: share_suffix.to_string(),
        })
    }

    pub fn from_config(config: &ActionConfig) -> Result<Self> {
        Self::new(
            config.search_url.clone(),
            config.share_subject.clone(),
            &config.share_message,
        )
    }

    #[must_use]
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    #[must_use]
    pub fn build_search_url(&self, query: &str) -> String {
        let mut url = String::with_capacity(self.url_template.len() + query.len() * 3);
        url.push_str(&self.url_template);
        url.extend(utf8_percent_encode(query, QUERY_ENCODE_SET));
        url
    }

    #[must_use]
    pub fn build_share_message(&self, query: &str) -> ShareMessage {
        let url = self.build_search_url(query);
        ShareMessage {
            subject: self.share_subject.clone(),
            body: format!("{}{url}{}", self.share_prefix, self.share_suffix),
        }
    }

    /// Inverse of [`Self::build_search_url`] for URLs produced by this builder.
    #[must_use]
    pub fn query_from_url(&self, url: &str) -> Option<String> {
        let encoded = url.strip_prefix(self.url_template.as_str())?;
        percent_decode_str(encoded)
            .decode_utf8()
            .ok()
            .map(|decoded| decoded.into_owned())
    }
}

fn validate_url_template(template: &str) -> Result<()> {
    let rest = template
        .strip_prefix("https://")
        .or_else(|| template.strip_prefix("http://"))
        .ok_or_else(|| {
            TagSearchError::Config(format!(
                "search URL template must start with http:// or https://: {template:?}"
            ))
        })?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(TagSearchError::Config(format!(
            "search URL template has no host: {template:?}"
        )));
    }
    if template.chars().any(char::is_whitespace) {
        return Err(TagSearchError::Config(format!(
            "search URL template must not contain whitespace: {template:?}"
        )));
    }
    Ok(())
}

fn split_share_template(template: &str) -> Result<(&str, &str)> {
    match template.matches(URL_PLACEHOLDER).count() {
        1 => Ok(template
            .split_once(URL_PLACEHOLDER)
            .unwrap_or((template, ""))),
        0 => Err(TagSearchError::Config(format!(
            "share message template must contain {URL_PLACEHOLDER}: {template:?}"
        ))),
        _ => Err(TagSearchError::Config(format!(
            "share message template must contain {URL_PLACEHOLDER} exactly once: {template:?}"
        ))),
    }
}
