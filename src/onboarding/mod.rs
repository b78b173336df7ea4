//! Onboarding: the multi-step profile wizard.
//!
//! A [`WizardSchema`] lays out ordered steps of fields. The synchronous
//! [`OnboardingWizard`] gates forward movement on each step validating and
//! tracks completion. [`OnboardingManager`] shares it behind a lock, runs
//! the one-shot profile submission, and remembers whether the user has
//! dismissed the completion prompt.

pub mod manager;
pub mod model;
pub mod routes;
pub mod schema;
pub mod state;
pub mod wizard;

pub use manager::{OnboardingManager, OnboardingStatus};
pub use model::{FieldRule, FieldSpec, FieldValue, StepDefinition, WizardFormState, WizardSchema};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use schema::{ProfileRole, WizardKind, WizardLayout};
pub use state::WizardPhase;
pub use wizard::{OnboardingWizard, StepOutcome, StepStatus};
