//! Include/exclude filtering of window descriptors.
//!
//! Each token is tried against three keys in order: as a decimal pid, as a
//! hexadecimal window handle, then as a case-insensitive substring of the
//! app name or title. The first key that matches decides.

use crate::sessions::types::WindowDescriptor;
use crate::windows::WindowId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionFilter {
    /// Keep only descriptors matching at least one token.
    Include(Vec<String>),
    /// Drop descriptors matching any token.
    Exclude(Vec<String>),
}

impl SessionFilter {
    pub fn include<S: AsRef<str>>(tokens: &[S]) -> Self {
        SessionFilter::Include(tokens.iter().map(|t| t.as_ref().to_string()).collect())
    }

    pub fn exclude<S: AsRef<str>>(tokens: &[S]) -> Self {
        SessionFilter::Exclude(tokens.iter().map(|t| t.as_ref().to_string()).collect())
    }

    pub fn tokens(&self) -> &[String] {
        match self {
            SessionFilter::Include(tokens) | SessionFilter::Exclude(tokens) => tokens,
        }
    }

    /// An empty token list leaves the input untouched.
    pub fn apply(&self, windows: Vec<WindowDescriptor>) -> Vec<WindowDescriptor> {
        match self {
            SessionFilter::Include(tokens) if !tokens.is_empty() => windows
                .into_iter()
                .filter(|w| matches_any(w, tokens))
                .collect(),
            SessionFilter::Exclude(tokens) if !tokens.is_empty() => windows
                .into_iter()
                .filter(|w| !matches_any(w, tokens))
                .collect(),
            _ => windows,
        }
    }
}

/// Narrow `windows` through each present filter in turn.
pub fn apply_filters(
    filters: &[Option<SessionFilter>],
    windows: Vec<WindowDescriptor>,
) -> Vec<WindowDescriptor> {
    filters
        .iter()
        .flatten()
        .fold(windows, |remaining, filter| filter.apply(remaining))
}

pub fn matches_any(window: &WindowDescriptor, tokens: &[String]) -> bool {
    tokens.iter().any(|token| matches_token(window, token))
}

pub fn matches_token(window: &WindowDescriptor, token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }

    if let Ok(pid) = token.parse::<u32>()
        && window.pid == Some(pid)
    {
        return true;
    }

    if let Some(id) = WindowId::from_hex(token)
        && id == window.window_id
    {
        return true;
    }

    let needle = token.to_lowercase();
    window.app_name.to_lowercase().contains(&needle) || window.title.to_lowercase().contains(&needle)
}
