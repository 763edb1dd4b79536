//! URL-bearing fields.
//!
//! A value is accepted when it is an absolute `http`, `https`, `data` or
//! `gs` URL, or a relative path the site can serve: `./x`, `../x`, `/x`, or
//! a bare file name with a known asset extension.

use mythos_core::{Issue, IssueKind};
use serde_json::Value;
use url::Url;

use super::FieldValidator;
use crate::document::EntityDocument;
use crate::resolver::ReferenceResolver;

/// Single-valued URL fields checked on every document.
pub const URL_FIELDS: &[&str] = &["url", "imageUrl", "iconUrl", "link", "externalUrl", "thumbnailUrl"];

const ASSET_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".json", ".html", ".htm", ".pdf", ".md",
];

/// Whether `value` is an acceptable URL or relative asset path.
pub fn is_valid_url(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    if value.starts_with("./") || value.starts_with("../") || value.starts_with('/') {
        return true;
    }
    if let Ok(url) = Url::parse(value) {
        return match url.scheme() {
            "http" | "https" | "gs" => url.host_str().is_some_and(|h| !h.is_empty()),
            "data" => true,
            _ => false,
        };
    }
    is_bare_asset_name(value)
}

fn is_bare_asset_name(value: &str) -> bool {
    if value.contains(':') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let lower = value.to_ascii_lowercase();
    ASSET_EXTENSIONS
        .iter()
        .any(|ext| lower.len() > ext.len() && lower.ends_with(ext))
}

/// Checks [`URL_FIELDS`] and every `images[].url`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlValidator;

impl FieldValidator for UrlValidator {
    fn name(&self) -> &'static str {
        "urls"
    }

    fn validate(&self, doc: &EntityDocument, _resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let subject = doc.subject();
        let mut issues = Vec::new();

        for field in URL_FIELDS {
            let Some(value) = doc.field(field) else {
                continue;
            };
            if !value.as_str().is_some_and(is_valid_url) {
                issues.push(invalid_url(&subject, field, value));
            }
        }

        // A non-array `images` is a schema violation, reported by the envelope.
        if let Some(Value::Array(images)) = doc.field("images") {
            for (i, image) in images.iter().enumerate() {
                let field = format!("images[{i}]");
                match image.get("url") {
                    Some(url @ Value::String(s)) => {
                        if !is_valid_url(s) {
                            issues.push(invalid_url(&subject, &format!("{field}.url"), url));
                        }
                    }
                    _ => issues.push(
                        Issue::new(
                            IssueKind::InvalidImageEntry,
                            &subject,
                            &field,
                            "image entry must be an object with a string url",
                        )
                        .with_value(image.to_string()),
                    ),
                }
            }
        }
        issues
    }
}

fn invalid_url(subject: &mythos_core::IssueSubject, field: &str, value: &Value) -> Issue {
    let shown = value.as_str().map_or_else(|| value.to_string(), str::to_string);
    Issue::new(
        IssueKind::InvalidUrl,
        subject,
        field,
        format!("\"{shown}\" is neither an absolute URL nor a recognized relative path"),
    )
    .with_value(shown)
}
