use super::section::Section;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsForm {
    Security,
    Gambling,
    AutoEnhance,
}

impl SettingsForm {
    pub fn for_section(section: Section) -> Option<Self> {
        match section {
            Section::Security => Some(SettingsForm::Security),
            Section::Gambling => Some(SettingsForm::Gambling),
            Section::AutoEnhance => Some(SettingsForm::AutoEnhance),
            _ => None,
        }
    }

    pub fn section(&self) -> Section {
        match self {
            SettingsForm::Security => Section::Security,
            SettingsForm::Gambling => Section::Gambling,
            SettingsForm::AutoEnhance => Section::AutoEnhance,
        }
    }
}

impl fmt::Display for SettingsForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsForm::Security => write!(f, "security"),
            SettingsForm::Gambling => write!(f, "gambling"),
            SettingsForm::AutoEnhance => write!(f, "auto-enhance"),
        }
    }
}

/// Editable copy of a settings document plus its request state.
#[derive(Debug, Clone, Default)]
pub struct FormState<T> {
    pub draft: T,
    pub loaded: bool,
    pub saving: bool,
}

impl<T> FormState<T> {
    pub fn populate(&mut self, value: T) {
        self.draft = value;
        self.loaded = true;
    }
}
