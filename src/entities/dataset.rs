//! Named numeric data sets for statistical analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    /// Unique identifier
    pub id: EntityId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Values in entry order
    #[serde(default)]
    pub values: Vec<f64>,

    pub created_at: DateTime<Utc>,
}

impl DataSet {
    /// Create a data set with at least one finite value
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Result<Self, ValidationError> {
        let data_set = Self {
            id: EntityId::new(EntityPrefix::Ds),
            name: name.into().trim().to_string(),
            description: String::new(),
            values,
            created_at: Utc::now(),
        };
        data_set.validate()?;
        Ok(data_set)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "data set name",
            });
        }
        validate_values(&self.values)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

fn validate_values(values: &[f64]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::NoValues);
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFinite { field: "value" });
    }
    Ok(())
}

impl Entity for DataSet {
    const PREFIX: EntityPrefix = EntityPrefix::Ds;
    const COLLECTION_KEY: &'static str = "statisticalDataSets";
    const KIND: &'static str = "data set";

    fn id(&self) -> &EntityId {
        &self.id
    }
}
