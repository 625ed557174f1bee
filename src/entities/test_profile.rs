//! Test-time profiles: ordered test steps with per-device durations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};

/// One step of a test flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    pub id: EntityId,

    pub name: String,

    /// Seconds per device
    pub duration: f64,
}

impl TestStep {
    pub fn new(name: impl Into<String>, duration: f64) -> Result<Self, ValidationError> {
        let step = Self {
            id: EntityId::new(EntityPrefix::Step),
            name: name.into().trim().to_string(),
            duration,
        };
        step.validate()?;
        Ok(step)
    }

    /// Name must not be blank; duration must be finite and >= 0
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "step name" });
        }
        if !self.duration.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "step duration",
            });
        }
        if self.duration < 0.0 {
            return Err(ValidationError::Negative {
                field: "step duration",
            });
        }
        Ok(())
    }
}

/// A named, ordered test flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestProfile {
    /// Unique identifier
    pub id: EntityId,

    pub name: String,

    #[serde(default)]
    pub test_steps: Vec<TestStep>,

    pub created_at: DateTime<Utc>,
}

impl TestProfile {
    /// Create a profile with at least one step
    pub fn new(name: impl Into<String>, test_steps: Vec<TestStep>) -> Result<Self, ValidationError> {
        let profile = Self {
            id: EntityId::new(EntityPrefix::Prof),
            name: name.into().trim().to_string(),
            test_steps,
            created_at: Utc::now(),
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "profile name",
            });
        }
        if self.test_steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }
        self.test_steps.iter().try_for_each(TestStep::validate)
    }
}

impl Entity for TestProfile {
    const PREFIX: EntityPrefix = EntityPrefix::Prof;
    const COLLECTION_KEY: &'static str = "testTimeProfiles";
    const KIND: &'static str = "test profile";

    fn id(&self) -> &EntityId {
        &self.id
    }
}
