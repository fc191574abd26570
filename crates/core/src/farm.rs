//! Farm records and submission payload.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AreaUnit, DbId};
use crate::validation::{validate_coordinates, validate_name, validate_non_negative, validate_text};
use crate::wire::optional_decimal;

/// Resource path segment for farms.
pub const FARMS_RESOURCE: &str = "farms";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarmStatus {
    #[default]
    Active,
    Inactive,
}

/// A farm as returned by `GET /farms/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    #[serde(default)]
    pub id: DbId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub area: Option<f64>,
    #[serde(default)]
    pub area_unit: Option<AreaUnit>,
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<FarmStatus>,
}

/// Body of `POST /farms` and `PUT /farms/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub area: f64,
    pub area_unit: AreaUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: FarmStatus,
}

impl FarmPayload {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name("Farm name", &self.name)?;
        validate_coordinates(self.latitude, self.longitude)?;
        validate_non_negative("Farm area", Some(self.area))?;
        if let Some(notes) = &self.notes {
            validate_text("Farm notes", notes)?;
        }
        Ok(())
    }
}
