//! Media locator resolution.
//!
//! Catalog records carry a locator relative to wherever the media is served
//! from; the engine needs the full resource.

use crate::catalog::Track;

#[derive(Debug, Clone)]
pub struct MediaResolver {
    base: String,
}

impl MediaResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Join `locator` to the base with exactly one `/`.
    ///
    /// Locators that already carry a scheme (`http://`, `file://`, ...) are
    /// returned unchanged.
    pub fn resolve(&self, locator: &str) -> String {
        if has_scheme(locator) {
            return locator.to_string();
        }

        let locator = locator.trim_start_matches('/');
        let base = self.base.trim_end_matches('/');
        if base.is_empty() {
            if self.base.starts_with('/') {
                format!("/{locator}")
            } else {
                locator.to_string()
            }
        } else {
            format!("{base}/{locator}")
        }
    }

    pub fn resolve_track(&self, track: &Track) -> String {
        self.resolve(&track.media)
    }
}

fn has_scheme(s: &str) -> bool {
    match s.find("://") {
        Some(i) if i > 0 => s[..i]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}
