use crate::services::api::{QuickSettings, QuickToggle};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub enabled: bool,
    pub busy: bool,
    /// Value to restore if the pending request fails.
    pub previous: Option<bool>,
}

/// Current value and in-flight state for every quick toggle.
#[derive(Debug, Default)]
pub struct ToggleBoard {
    states: HashMap<QuickToggle, ToggleState>,
}

impl ToggleBoard {
    pub fn state(&self, toggle: QuickToggle) -> ToggleState {
        self.states.get(&toggle).copied().unwrap_or_default()
    }

    pub fn is_busy(&self, toggle: QuickToggle) -> bool {
        self.state(toggle).busy
    }

    /// Server values; busy toggles keep their optimistic value.
    pub fn apply(&mut self, settings: &QuickSettings) {
        for toggle in QuickToggle::ALL {
            let state = self.states.entry(toggle).or_default();
            if !state.busy {
                state.enabled = settings.get(toggle);
            }
        }
    }

    /// Flips to `enabled` and marks the toggle busy. Returns false if a request
    /// for it is already in flight.
    pub fn begin(&mut self, toggle: QuickToggle, enabled: bool) -> bool {
        let state = self.states.entry(toggle).or_default();
        if state.busy {
            return false;
        }
        state.previous = Some(state.enabled);
        state.enabled = enabled;
        state.busy = true;
        true
    }

    pub fn finish(&mut self, toggle: QuickToggle, succeeded: bool) {
        let state = self.states.entry(toggle).or_default();
        if !succeeded {
            if let Some(previous) = state.previous {
                state.enabled = previous;
            }
        }
        state.previous = None;
        state.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reverts_to_previous_value() {
        let mut board = ToggleBoard::default();
        board.apply(&QuickSettings {
            hunt: true,
            ..QuickSettings::default()
        });

        assert!(board.begin(QuickToggle::Hunt, false));
        assert!(!board.state(QuickToggle::Hunt).enabled);
        board.finish(QuickToggle::Hunt, false);

        let state = board.state(QuickToggle::Hunt);
        assert!(state.enabled);
        assert!(!state.busy);
    }

    #[test]
    fn busy_toggle_ignores_changes_and_server_refreshes() {
        let mut board = ToggleBoard::default();
        assert!(board.begin(QuickToggle::Daily, true));
        assert!(!board.begin(QuickToggle::Daily, false));

        board.apply(&QuickSettings::default());
        assert!(board.state(QuickToggle::Daily).enabled);

        board.finish(QuickToggle::Daily, true);
        assert!(board.state(QuickToggle::Daily).enabled);
        assert!(!board.is_busy(QuickToggle::Daily));
    }
}
