//! Predicates deciding whether a live process or window is the one a saved
//! descriptor refers to.

use crate::config::MatchingConfig;
use crate::launcher::snap_app_name;
use crate::sessions::WindowDescriptor;

/// Flag some apps add when started as a D-Bus service.
const SERVICE_FLAG: &str = "--gapplication-service";
/// Prefix of the flag some apps add when restored from another process.
const PID_FLAG_PREFIX: &str = "--pid=";

pub fn is_noise_flag(arg: &str) -> bool {
    arg == SERVICE_FLAG || arg.starts_with(PID_FLAG_PREFIX)
}

/// The command without noise flags. This is what gets relaunched.
pub fn strip_noise_flags(command: &[String]) -> Vec<String> {
    command
        .iter()
        .filter(|arg| !is_noise_flag(arg))
        .cloned()
        .collect()
}

/// Noise flags removed and consecutive repeated tokens collapsed.
pub fn normalize_command(command: &[String]) -> Vec<&str> {
    let mut normalized: Vec<&str> = command
        .iter()
        .map(String::as_str)
        .filter(|arg| !is_noise_flag(arg))
        .collect();
    normalized.dedup();
    normalized
}

/// Command-line equality after normalization. Two snap commands are equal
/// when they name the same snap, whatever the revision or path. An empty
/// command never matches.
pub fn is_same_command(first: &[String], second: &[String]) -> bool {
    let first = normalize_command(first);
    let second = normalize_command(second);
    let (Some(first_program), Some(second_program)) = (first.first(), second.first()) else {
        return false;
    };

    if let (Some(a), Some(b)) = (snap_app_name(first_program), snap_app_name(second_program)) {
        return a == b;
    }
    first == second
}

/// Decides whether a live window of a multi-window process is the saved
/// one.
pub trait TitleRule: Send + Sync {
    /// Whether this rule is responsible for windows of `app_name`.
    fn applies_to(&self, live_app_name: &str, saved_app_name: &str) -> bool;

    fn same_window(&self, live_title: &str, saved_title: &str) -> bool;
}

/// Full title equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTitle;

impl TitleRule for ExactTitle {
    fn applies_to(&self, _live_app_name: &str, _saved_app_name: &str) -> bool {
        true
    }

    fn same_window(&self, live_title: &str, saved_title: &str) -> bool {
        live_title == saved_title
    }
}

/// For app families whose window titles start with a stable project name
/// followed by a changing file or path: compare the first space-delimited
/// token only.
#[derive(Debug, Clone)]
pub struct LeadingToken {
    pub class_prefix: String,
}

impl TitleRule for LeadingToken {
    fn applies_to(&self, live_app_name: &str, saved_app_name: &str) -> bool {
        live_app_name == saved_app_name && live_app_name.starts_with(&self.class_prefix)
    }

    fn same_window(&self, live_title: &str, saved_title: &str) -> bool {
        leading_token(live_title) == leading_token(saved_title)
    }
}

fn leading_token(title: &str) -> &str {
    title.split(' ').next().unwrap_or_default()
}

/// Ordered title rules; the first applicable one decides, exact title
/// equality otherwise.
pub struct TitleMatcher {
    rules: Vec<Box<dyn TitleRule>>,
}

impl TitleMatcher {
    pub fn new(rules: Vec<Box<dyn TitleRule>>) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        let rules = config
            .leading_token_classes
            .iter()
            .map(|prefix| {
                Box::new(LeadingToken {
                    class_prefix: prefix.clone(),
                }) as Box<dyn TitleRule>
            })
            .collect();
        Self::new(rules)
    }

    pub fn is_same_window(
        &self,
        live_app_name: &str,
        live_title: &str,
        saved: &WindowDescriptor,
    ) -> bool {
        match self
            .rules
            .iter()
            .find(|rule| rule.applies_to(live_app_name, &saved.app_name))
        {
            Some(rule) => rule.same_window(live_title, &saved.title),
            None => ExactTitle.same_window(live_title, &saved.title),
        }
    }
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}
