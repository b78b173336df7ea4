//! Built-in wizard layouts for the marketplace's profile flows.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::{FieldRule, FieldSpec, FieldValue, StepDefinition, WizardFormState, WizardSchema};
use crate::error::WizardError;

/// Which side of the marketplace a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    #[default]
    Healer,
    Seeker,
}

impl ProfileRole {
    /// Profile-completion layout for this role.
    pub fn profile_steps(&self) -> Result<WizardSchema, WizardError> {
        match self {
            Self::Healer => healer_profile_steps(),
            Self::Seeker => seeker_profile_steps(),
        }
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healer => write!(f, "healer"),
            Self::Seeker => write!(f, "seeker"),
        }
    }
}

impl FromStr for ProfileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "healer" | "provider" => Ok(Self::Healer),
            "seeker" | "customer" => Ok(Self::Seeker),
            other => Err(format!("unknown profile role '{other}'")),
        }
    }
}

/// Which wizard layout the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardKind {
    /// Completing an existing account's profile.
    #[default]
    Profile,
    /// First-time healer onboarding.
    Onboarding,
}

impl std::fmt::Display for WizardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Profile => write!(f, "profile"),
            Self::Onboarding => write!(f, "onboarding"),
        }
    }
}

impl FromStr for WizardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "profile" | "completion" => Ok(Self::Profile),
            "onboarding" => Ok(Self::Onboarding),
            other => Err(format!("unknown wizard kind '{other}'")),
        }
    }
}

/// Layout plus starting values for one wizard.
#[derive(Debug, Clone)]
pub struct WizardLayout {
    pub schema: WizardSchema,
    pub defaults: WizardFormState,
}

impl ProfileRole {
    /// Pick the layout for `kind`. Onboarding exists for healers only.
    pub fn wizard_layout(&self, kind: WizardKind) -> Result<WizardLayout, WizardError> {
        match (self, kind) {
            (_, WizardKind::Profile) => Ok(WizardLayout {
                schema: self.profile_steps()?,
                defaults: WizardFormState::new(),
            }),
            (Self::Healer, WizardKind::Onboarding) => Ok(WizardLayout {
                schema: healer_onboarding_steps()?,
                defaults: healer_onboarding_defaults(),
            }),
            (Self::Seeker, WizardKind::Onboarding) => Err(WizardError::InvalidSchema(
                "onboarding is only defined for healers".into(),
            )),
        }
    }
}

fn basic_and_contact() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            "basic",
            "Basic Information",
            "Tell us about yourself",
            vec![
                FieldSpec::required("firstName", "First name"),
                FieldSpec::required("lastName", "Last name"),
                FieldSpec::required("bio", "Bio"),
            ],
        ),
        StepDefinition::new(
            "contact",
            "Contact Details",
            "How can people reach you?",
            vec![
                FieldSpec::required("phone", "Phone"),
                FieldSpec::required("location", "Location"),
                FieldSpec::required("website", "Website"),
                FieldSpec::required("timezone", "Timezone"),
            ],
        ),
    ]
}

/// Profile completion for healers: basic, contact, expertise, professional.
pub fn healer_profile_steps() -> Result<WizardSchema, WizardError> {
    let mut steps = basic_and_contact();
    steps.push(StepDefinition::new(
        "expertise",
        "Your Expertise",
        "What healing modalities do you practice?",
        vec![
            FieldSpec::list("specialties", "Specialty"),
            FieldSpec::new("yearsExperience", "Years of experience", FieldRule::GreaterThan(0.0))
                .with_message("Years of experience is required"),
        ],
    ));
    steps.push(StepDefinition::new(
        "professional",
        "Professional Info",
        "Your rates and qualifications",
        vec![
            FieldSpec::new("hourlyRate", "Hourly rate", FieldRule::GreaterThan(0.0)),
            FieldSpec::required("education", "Education"),
            FieldSpec::required("certifications", "Certifications"),
        ],
    ));
    WizardSchema::new(steps)
}

/// Profile completion for seekers: basic, contact, interests, session preferences.
pub fn seeker_profile_steps() -> Result<WizardSchema, WizardError> {
    let mut steps = basic_and_contact();
    steps.push(StepDefinition::new(
        "preferences",
        "Your Interests",
        "What kind of healing are you seeking?",
        vec![
            FieldSpec::list("interests", "Interest"),
            FieldSpec::required("goals", "Goals"),
        ],
    ));
    steps.push(StepDefinition::new(
        "budget",
        "Session Preferences",
        "Your budget and frequency preferences",
        vec![
            FieldSpec::required("budgetRange", "Budget range"),
            FieldSpec::required("sessionFrequency", "Session frequency"),
        ],
    ));
    WizardSchema::new(steps)
}

/// The six-step onboarding a new healer walks through before review.
pub fn healer_onboarding_steps() -> Result<WizardSchema, WizardError> {
    WizardSchema::new(vec![
        StepDefinition::new(
            "basic_info",
            "Basic Info",
            "Tell us about yourself",
            vec![
                FieldSpec::required("firstName", "First name"),
                FieldSpec::required("lastName", "Last name"),
                FieldSpec::required("bio", "Bio"),
                FieldSpec::required("location", "Location"),
                FieldSpec::optional("phone", "Phone"),
                FieldSpec::optional("website", "Website"),
            ],
        ),
        StepDefinition::new(
            "specialties",
            "Specialties",
            "Your healing practices",
            vec![
                FieldSpec::list("specialties", "Specialty"),
                FieldSpec::list("sessionTypes", "Session type"),
                FieldSpec::optional("languages", "Languages"),
            ],
        ),
        StepDefinition::new(
            "experience",
            "Experience",
            "Background & credentials",
            vec![
                FieldSpec::new("yearsExperience", "Years of experience", FieldRule::MinNumber(0.0))
                    .with_message("Years of experience is required"),
                FieldSpec::optional("certifications", "Certifications"),
                FieldSpec::optional("education", "Education"),
            ],
        ),
        StepDefinition::new(
            "services",
            "Services",
            "What you offer",
            vec![
                FieldSpec::new("hourlyRate", "Hourly rate", FieldRule::GreaterThan(0.0)),
                FieldSpec::optional("consultationFee", "Consultation fee"),
                FieldSpec::optional("sessionDurations", "Session durations"),
            ],
        ),
        StepDefinition::new(
            "availability",
            "Availability",
            "When you're available",
            vec![FieldSpec::optional("availability", "Availability")],
        ),
        StepDefinition::new(
            "profile",
            "Profile",
            "Complete your profile",
            vec![
                FieldSpec::optional("avatarUrl", "Avatar"),
                FieldSpec::optional("profileBanner", "Profile banner"),
                FieldSpec::optional("socialLinks", "Social links"),
            ],
        ),
    ])
}

/// Starting values for a fresh healer onboarding form.
pub fn healer_onboarding_defaults() -> WizardFormState {
    let mut form = WizardFormState::new();
    form.set("languages", FieldValue::from(vec!["English"]));
    form.set("yearsExperience", FieldValue::Number(0.0));
    form
}
