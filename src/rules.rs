use crate::client::TagMask;
use crate::monitor::Monitor;
use serde::Deserialize;

pub const BROKEN: &str = "broken";

/// Static window classification entry. Every field that is set must be a
/// substring of the corresponding window property for the rule to apply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub class: Option<String>,
    pub instance: Option<String>,
    pub title: Option<String>,
    pub role: Option<String>,
    pub tags: TagMask,
    pub is_centered: bool,
    pub is_floating: bool,
    pub monitor: Option<usize>,
}

/// Identity of a window as seen by the rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowIdentity {
    pub title: String,
    pub class: String,
    pub instance: String,
    pub role: String,
}

impl WindowIdentity {
    pub fn new(
        title: &str,
        class: Option<String>,
        instance: Option<String>,
        role: Option<String>,
    ) -> Self {
        Self {
            title: title.to_string(),
            class: class.unwrap_or_else(|| BROKEN.to_string()),
            instance: instance.unwrap_or_else(|| BROKEN.to_string()),
            role: role.unwrap_or_else(|| BROKEN.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    pub tags: TagMask,
    pub monitor_index: usize,
    pub is_floating: bool,
    pub is_centered: bool,
}

impl Rule {
    pub fn matches(&self, window: &WindowIdentity) -> bool {
        let field_matches = |pattern: &Option<String>, value: &str| {
            pattern
                .as_deref()
                .is_none_or(|pattern| value.contains(pattern))
        };

        field_matches(&self.title, &window.title)
            && field_matches(&self.class, &window.class)
            && field_matches(&self.instance, &window.instance)
            && field_matches(&self.role, &window.role)
    }
}

/// Runs the whole rule table over a new window. The last matching rule decides
/// the floating and centered flags, tags accumulate over all matches. A window
/// no rule gives valid tags lands on its monitor's current view.
pub fn apply_rules(
    rules: &[Rule],
    window: &WindowIdentity,
    monitors: &[Monitor],
    monitor_index: usize,
) -> RuleOutcome {
    let mut outcome = RuleOutcome {
        tags: 0,
        monitor_index,
        is_floating: false,
        is_centered: false,
    };

    for rule in rules.iter().filter(|rule| rule.matches(window)) {
        outcome.is_centered = rule.is_centered;
        outcome.is_floating = rule.is_floating;
        outcome.tags |= rule.tags;
        if let Some(target) = rule.monitor.filter(|&target| target < monitors.len()) {
            outcome.monitor_index = target;
        }
    }

    let monitor = &monitors[outcome.monitor_index];
    outcome.tags &= monitor.tag_mask();
    if outcome.tags == 0 {
        outcome.tags = monitor.active_tags();
    }
    outcome
}
