//! Wizard lifecycle phases.

use serde::{Deserialize, Serialize};

/// Where the wizard is in its lifecycle.
///
/// `Editing` covers every step; the cursor says which one. After the last
/// step validates the wizard is `Complete`. While the form is with the
/// profile service it is `Submitting`, which settles as `Submitted` on
/// success or back to `Editing` on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    #[default]
    Editing,
    Complete,
    Submitting,
    Submitted,
}

impl WizardPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WizardPhase) -> bool {
        use WizardPhase::*;
        matches!(
            (self, target),
            (Editing, Complete)
                | (Complete, Editing)
                | (Complete, Submitting)
                | (Submitting, Submitted)
                | (Submitting, Editing)
        )
    }

    /// Nothing changes once submitted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Neither edits nor navigation are allowed.
    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Submitting | Self::Submitted)
    }

    /// Whether form values may still be edited.
    pub fn accepts_edits(&self) -> bool {
        matches!(self, Self::Editing)
    }
}

impl std::fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Editing => "editing",
            Self::Complete => "complete",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
        };
        write!(f, "{s}")
    }
}
