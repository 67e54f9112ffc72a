//! Status-line rendering for context usage.

use console::style;

use crate::compression::ContextUsage;

/// Severity band for a usage snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageSeverity {
    /// Below 50% of the budget.
    Ok,
    /// 50-79%.
    Elevated,
    /// 80-89%.
    High,
    /// 90% and above, or overflow.
    Critical,
}

impl UsageSeverity {
    pub fn of(usage: &ContextUsage) -> Self {
        if usage.is_overflow || usage.usage_percentage >= 90 {
            UsageSeverity::Critical
        } else if usage.usage_percentage >= 80 {
            UsageSeverity::High
        } else if usage.usage_percentage >= 50 {
            UsageSeverity::Elevated
        } else {
            UsageSeverity::Ok
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UsageSeverity::Ok => "ok",
            UsageSeverity::Elevated => "elevated",
            UsageSeverity::High => "high",
            UsageSeverity::Critical => "critical",
        }
    }

    /// Color the label for terminal display.
    pub fn painted(&self) -> String {
        match self {
            UsageSeverity::Ok => style(self.label()).green().to_string(),
            UsageSeverity::Elevated => style(self.label()).yellow().to_string(),
            UsageSeverity::High => style(self.label()).red().to_string(),
            UsageSeverity::Critical => style(self.label()).red().bold().to_string(),
        }
    }
}

/// Render a usage snapshot as one short line.
pub fn status_line(usage: &ContextUsage) -> String {
    format!(
        "Context: {}% used ({} / {} tokens), {} remaining [{}]",
        usage.usage_percentage,
        usage.total_tokens,
        usage.context_limit,
        usage.remaining_tokens,
        UsageSeverity::of(usage).label()
    )
}
