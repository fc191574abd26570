//! Tree-species catalogue records.
//!
//! The same record type serves the tree-species edit form and the
//! reference list that populates species selects on the project form.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::{
    validate_name, validate_non_negative, validate_non_negative_count, validate_text,
};
use crate::wire::{optional_count, optional_decimal};

/// Resource path segment for tree species.
pub const TREE_SPECIES_RESOURCE: &str = "tree-species";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthRate {
    Slow,
    #[default]
    Medium,
    Fast,
}

/// A tree species as returned by `GET /tree-species` and
/// `GET /tree-species/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSpecies {
    #[serde(default)]
    pub id: DbId,
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Kilograms of CO2 absorbed per tree per year.
    #[serde(default, deserialize_with = "optional_decimal")]
    pub co2_absorption_kg_per_year: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub average_height_m: Option<f64>,
    #[serde(default)]
    pub growth_rate: Option<GrowthRate>,
    #[serde(default, deserialize_with = "optional_count")]
    pub lifespan_years: Option<i64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub price_per_tree: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TreeSpecies {
    /// Label for selection controls: `Common (Scientific)`.
    pub fn display_name(&self) -> String {
        match self.scientific_name.as_deref().map(str::trim) {
            Some(scientific) if !scientific.is_empty() => {
                format!("{} ({scientific})", self.common_name)
            }
            _ => self.common_name.clone(),
        }
    }
}

/// Body of `POST /tree-species` and `PUT /tree-species/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSpeciesPayload {
    pub common_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub co2_absorption_kg_per_year: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_height_m: Option<f64>,
    pub growth_rate: GrowthRate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifespan_years: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_tree: Option<f64>,
    pub is_active: bool,
}

impl TreeSpeciesPayload {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name("Common name", &self.common_name)?;
        if let Some(description) = &self.description {
            validate_text("Species description", description)?;
        }
        validate_non_negative("CO2 absorption", Some(self.co2_absorption_kg_per_year))?;
        validate_non_negative("Average height", self.average_height_m)?;
        validate_non_negative_count("Lifespan", self.lifespan_years)?;
        validate_non_negative("Price per tree", self.price_per_tree)?;
        Ok(())
    }
}
