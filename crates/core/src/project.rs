//! Project records as the backend returns them, and the payload the admin
//! client submits when creating or updating a project.
//!
//! A project owns an ordered list of phases; each phase owns an ordered list
//! of tree-species allocations. The backend returns the whole tree inline on
//! `GET /projects/{id}` and accepts the whole tree on `POST`/`PUT`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AreaUnit, DbId, Timestamp};
use crate::validation::{
    validate_coordinates, validate_date_range, validate_name, validate_non_negative,
    validate_non_negative_count, validate_text,
};
use crate::wire::{optional_count, optional_date, optional_decimal};

/// Resource path segment for projects.
pub const PROJECTS_RESOURCE: &str = "projects";

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    Suspended,
    Cancelled,
}

/// Lifecycle status of a single project phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

// ---------------------------------------------------------------------------
// Remote records
// ---------------------------------------------------------------------------

/// A project as returned by `GET /projects/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: DbId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
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
    #[serde(default, deserialize_with = "optional_decimal")]
    pub usable_area: Option<f64>,
    #[serde(default, deserialize_with = "optional_date")]
    pub planting_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_count")]
    pub planned_tree_total: Option<i64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub planting_density: Option<f64>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub partner_organizations: Option<Vec<String>>,
    #[serde(default)]
    pub phases: Vec<ProjectPhase>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// A phase nested inside a [`Project`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPhase {
    #[serde(default)]
    pub id: Option<DbId>,
    /// Stored sequence number. Not trusted; see [`PhasePayload::phase_number`].
    #[serde(default, deserialize_with = "optional_count")]
    pub phase_number: Option<i64>,
    #[serde(default)]
    pub phase_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<PhaseStatus>,
    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    /// Expected duration in days.
    #[serde(default, deserialize_with = "optional_count")]
    pub expected_duration: Option<i64>,
    /// Actual duration in days.
    #[serde(default, deserialize_with = "optional_count")]
    pub actual_duration: Option<i64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub actual_cost: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tree_species: Vec<PhaseTreeSpecies>,
}

/// A tree-species allocation nested inside a [`ProjectPhase`].
///
/// The backend sometimes returns only `treeSpeciesId`, sometimes the full
/// joined species record under `treeSpecies`, sometimes both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTreeSpecies {
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub tree_species_id: Option<DbId>,
    #[serde(default)]
    pub tree_species: Option<TreeSpeciesRef>,
    #[serde(default, deserialize_with = "optional_count")]
    pub quantity_planned: Option<i64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub cost_per_tree: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub planting_cost: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub maintenance_cost_yearly: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PhaseTreeSpecies {
    /// The referenced species id, preferring the flat column over the
    /// joined record.
    pub fn species_id(&self) -> Option<DbId> {
        self.tree_species_id
            .or_else(|| self.tree_species.as_ref().map(|s| s.id))
    }
}

/// Joined species record embedded in an allocation. Only `id` is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSpeciesRef {
    pub id: DbId,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Submission payload
// ---------------------------------------------------------------------------

/// Body of `POST /projects` and `PUT /projects/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub area: f64,
    pub area_unit: AreaUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usable_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<NaiveDate>,
    pub planned_tree_total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_density: Option<f64>,
    pub status: ProjectStatus,
    pub is_public: bool,
    pub partner_organizations: Vec<String>,
    pub phases: Vec<PhasePayload>,
}

/// One phase of a [`ProjectPayload`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    /// Always the 1-based position in [`ProjectPayload::phases`].
    pub phase_number: u32,
    pub phase_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: PhaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub tree_species: Vec<AllocationPayload>,
}

/// One tree-species allocation of a [`PhasePayload`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPayload {
    pub tree_species_id: DbId,
    pub quantity_planned: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_tree: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_cost_yearly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProjectPayload {
    /// Validate the payload before submission.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name("Project name", &self.name)?;
        if let Some(description) = &self.description {
            validate_text("Project description", description)?;
        }
        validate_coordinates(self.latitude, self.longitude)?;
        validate_non_negative("Area", Some(self.area))?;
        validate_non_negative("Usable area", self.usable_area)?;
        if let Some(usable) = self.usable_area {
            if self.area > 0.0 && usable > self.area {
                return Err(CoreError::Validation(format!(
                    "Usable area {usable} exceeds total area {}",
                    self.area
                )));
            }
        }
        validate_non_negative_count("Planned tree total", Some(self.planned_tree_total))?;
        validate_non_negative("Planting density", self.planting_density)?;

        for phase in &self.phases {
            phase.validate()?;
        }
        Ok(())
    }
}

impl PhasePayload {
    fn validate(&self) -> Result<(), CoreError> {
        let label = format!("Phase {}", self.phase_number);
        validate_name(&format!("{label} name"), &self.phase_name)?;
        validate_date_range(&label, self.start_date, self.end_date)?;
        validate_non_negative_count(&format!("{label} expected duration"), self.expected_duration)?;
        validate_non_negative_count(&format!("{label} actual duration"), self.actual_duration)?;
        validate_non_negative(&format!("{label} budget"), self.budget)?;
        validate_non_negative(&format!("{label} actual cost"), self.actual_cost)?;
        for allocation in &self.tree_species {
            validate_non_negative_count(
                &format!("{label} planned quantity"),
                Some(allocation.quantity_planned),
            )?;
            validate_non_negative(&format!("{label} cost per tree"), allocation.cost_per_tree)?;
            validate_non_negative(&format!("{label} planting cost"), allocation.planting_cost)?;
            validate_non_negative(
                &format!("{label} yearly maintenance cost"),
                allocation.maintenance_cost_yearly,
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
