use crate::config::FeatureFlags;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Overview,
    Logs,
    Commands,
    Security,
    Gambling,
    AutoEnhance,
    Analytics,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Overview,
        Section::Logs,
        Section::Commands,
        Section::Security,
        Section::Gambling,
        Section::AutoEnhance,
        Section::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Logs => "logs",
            Section::Commands => "commands",
            Section::Security => "security",
            Section::Gambling => "gambling",
            Section::AutoEnhance => "autoenhance",
            Section::Analytics => "analytics",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(name))
    }

    pub fn is_enabled(&self, features: &FeatureFlags) -> bool {
        match self {
            Section::Gambling => features.gambling,
            Section::AutoEnhance => features.autoenhance,
            Section::Analytics => features.analytics,
            _ => true,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Overview => write!(f, "Overview"),
            Section::Logs => write!(f, "Logs"),
            Section::Commands => write!(f, "Commands"),
            Section::Security => write!(f, "Security"),
            Section::Gambling => write!(f, "Gambling"),
            Section::AutoEnhance => write!(f, "AutoEnhance"),
            Section::Analytics => write!(f, "Analytics"),
        }
    }
}

/// Marker transition produced by a section switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionChange {
    pub previous: Section,
    pub current: Section,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifiers_case_insensitively() {
        assert_eq!(Section::parse("AutoEnhance"), Some(Section::AutoEnhance));
        assert_eq!(Section::parse("logs"), Some(Section::Logs));
        assert_eq!(Section::parse("quests"), None);
    }

    #[test]
    fn feature_flags_hide_optional_sections() {
        let features = FeatureFlags {
            gambling: false,
            autoenhance: true,
            analytics: false,
            legacy_control: false,
        };
        assert!(!Section::Gambling.is_enabled(&features));
        assert!(!Section::Analytics.is_enabled(&features));
        assert!(Section::AutoEnhance.is_enabled(&features));
        assert!(Section::Logs.is_enabled(&features));
    }
}
