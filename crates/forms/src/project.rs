//! Project form: a project draft owning ordered phases, each owning ordered
//! tree-species allocations.
//!
//! Every mutation here is a pure, infallible state transition. Indices come
//! from a rendered list, so an out-of-range index is a silent no-op reported
//! through the `bool` return value.

use chrono::NaiveDate;
use verdant_client::Collaborator;
use verdant_core::error::CoreError;
use verdant_core::numeric::{join_delimited, non_blank, split_delimited};
use verdant_core::project::{
    AllocationPayload, PhasePayload, PhaseStatus, PhaseTreeSpecies, Project, ProjectPayload,
    ProjectPhase, ProjectStatus, PROJECTS_RESOURCE,
};
use verdant_core::tree_species::{TreeSpecies, TREE_SPECIES_RESOURCE};
use verdant_core::types::{AreaUnit, DbId};

use crate::controller::FormController;
use crate::form::EntityForm;

// ---------------------------------------------------------------------------
// Draft types
// ---------------------------------------------------------------------------

/// Working state of the project form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<f64>,
    pub area_unit: AreaUnit,
    pub usable_area: Option<f64>,
    pub planting_date: Option<NaiveDate>,
    pub planned_tree_total: Option<i64>,
    pub planting_density: Option<f64>,
    pub status: ProjectStatus,
    pub is_public: bool,
    pub partner_organizations: Vec<String>,
    pub phases: Vec<PhaseDraft>,
}

/// Working state of one phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseDraft {
    /// Backend id of a persisted phase, sent back on update.
    pub id: Option<DbId>,
    /// Display hint only; the payload renumbers by position.
    pub phase_number: u32,
    pub phase_name: String,
    pub description: String,
    pub status: PhaseStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Days.
    pub expected_duration: Option<i64>,
    /// Days.
    pub actual_duration: Option<i64>,
    pub budget: Option<f64>,
    pub actual_cost: Option<f64>,
    pub notes: String,
    /// UI-only: whether the phase card is folded. Never serialized.
    pub collapsed: bool,
    pub tree_species: Vec<AllocationDraft>,
}

impl PhaseDraft {
    pub fn new(phase_number: u32) -> Self {
        Self {
            phase_number,
            ..Default::default()
        }
    }
}

/// One tree-species row of a phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationDraft {
    pub tree_species_id: Option<DbId>,
    pub quantity_planned: Option<i64>,
    pub cost_per_tree: Option<f64>,
    pub planting_cost: Option<f64>,
    pub maintenance_cost_yearly: Option<f64>,
    pub notes: String,
}

impl AllocationDraft {
    /// True when the row carries no user input at all.
    pub fn is_empty(&self) -> bool {
        self.tree_species_id.is_none()
            && self.quantity_planned.is_none()
            && self.cost_per_tree.is_none()
            && self.planting_cost.is_none()
            && self.maintenance_cost_yearly.is_none()
            && self.notes.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Field updates
// ---------------------------------------------------------------------------

/// A scalar attribute of [`ProjectDraft`] together with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    Name(String),
    Description(String),
    Location(String),
    Latitude(Option<f64>),
    Longitude(Option<f64>),
    Area(Option<f64>),
    AreaUnit(AreaUnit),
    UsableArea(Option<f64>),
    PlantingDate(Option<NaiveDate>),
    PlannedTreeTotal(Option<i64>),
    PlantingDensity(Option<f64>),
    Status(ProjectStatus),
    IsPublic(bool),
    PartnerOrganizations(Vec<String>),
}

/// A scalar attribute of [`PhaseDraft`] together with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseField {
    Name(String),
    Description(String),
    Status(PhaseStatus),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
    ExpectedDuration(Option<i64>),
    ActualDuration(Option<i64>),
    Budget(Option<f64>),
    ActualCost(Option<f64>),
    Notes(String),
}

/// A field of [`AllocationDraft`] together with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationField {
    TreeSpeciesId(Option<DbId>),
    QuantityPlanned(Option<i64>),
    CostPerTree(Option<f64>),
    PlantingCost(Option<f64>),
    MaintenanceCostYearly(Option<f64>),
    Notes(String),
}

impl PhaseDraft {
    fn apply(&mut self, field: PhaseField) {
        match field {
            PhaseField::Name(v) => self.phase_name = v,
            PhaseField::Description(v) => self.description = v,
            PhaseField::Status(v) => self.status = v,
            PhaseField::StartDate(v) => self.start_date = v,
            PhaseField::EndDate(v) => self.end_date = v,
            PhaseField::ExpectedDuration(v) => self.expected_duration = v,
            PhaseField::ActualDuration(v) => self.actual_duration = v,
            PhaseField::Budget(v) => self.budget = v,
            PhaseField::ActualCost(v) => self.actual_cost = v,
            PhaseField::Notes(v) => self.notes = v,
        }
    }
}

impl AllocationDraft {
    fn apply(&mut self, field: AllocationField) {
        match field {
            AllocationField::TreeSpeciesId(v) => self.tree_species_id = v,
            AllocationField::QuantityPlanned(v) => self.quantity_planned = v,
            AllocationField::CostPerTree(v) => self.cost_per_tree = v,
            AllocationField::PlantingCost(v) => self.planting_cost = v,
            AllocationField::MaintenanceCostYearly(v) => self.maintenance_cost_yearly = v,
            AllocationField::Notes(v) => self.notes = v,
        }
    }
}

// ---------------------------------------------------------------------------
// Draft operations
// ---------------------------------------------------------------------------

impl ProjectDraft {
    /// Replace one scalar attribute. No validation happens here.
    pub fn update_root_field(&mut self, field: ProjectField) {
        match field {
            ProjectField::Name(v) => self.name = v,
            ProjectField::Description(v) => self.description = v,
            ProjectField::Location(v) => self.location = v,
            ProjectField::Latitude(v) => self.latitude = v,
            ProjectField::Longitude(v) => self.longitude = v,
            ProjectField::Area(v) => self.area = v,
            ProjectField::AreaUnit(v) => self.area_unit = v,
            ProjectField::UsableArea(v) => self.usable_area = v,
            ProjectField::PlantingDate(v) => self.planting_date = v,
            ProjectField::PlannedTreeTotal(v) => self.planned_tree_total = v,
            ProjectField::PlantingDensity(v) => self.planting_density = v,
            ProjectField::Status(v) => self.status = v,
            ProjectField::IsPublic(v) => self.is_public = v,
            ProjectField::PartnerOrganizations(v) => self.partner_organizations = v,
        }
    }

    /// Set partner organizations from the comma-delimited text input.
    pub fn set_partner_organizations_text(&mut self, text: &str) {
        self.partner_organizations = split_delimited(text);
    }

    /// Partner organizations rendered for the text input.
    pub fn partner_organizations_text(&self) -> String {
        join_delimited(&self.partner_organizations)
    }

    /// Append a blank phase and return its index.
    pub fn add_phase(&mut self) -> usize {
        let index = self.phases.len();
        self.phases.push(PhaseDraft::new(index as u32 + 1));
        index
    }

    pub fn remove_phase(&mut self, index: usize) -> bool {
        if index >= self.phases.len() {
            return false;
        }
        self.phases.remove(index);
        true
    }

    pub fn update_phase_field(&mut self, index: usize, field: PhaseField) -> bool {
        match self.phases.get_mut(index) {
            Some(phase) => {
                phase.apply(field);
                true
            }
            None => false,
        }
    }

    pub fn toggle_phase_collapsed(&mut self, index: usize) -> bool {
        match self.phases.get_mut(index) {
            Some(phase) => {
                phase.collapsed = !phase.collapsed;
                true
            }
            None => false,
        }
    }

    /// Append a blank allocation row to a phase.
    ///
    /// Suppressed (returns `false`) when the phase's last row is already
    /// empty. Only the last row is inspected; an empty row in the middle of
    /// the list is left alone.
    pub fn add_allocation(&mut self, phase_index: usize) -> bool {
        let Some(phase) = self.phases.get_mut(phase_index) else {
            return false;
        };
        if phase.tree_species.last().is_some_and(AllocationDraft::is_empty) {
            return false;
        }
        phase.tree_species.push(AllocationDraft::default());
        true
    }

    pub fn update_allocation_field(
        &mut self,
        phase_index: usize,
        allocation_index: usize,
        field: AllocationField,
    ) -> bool {
        match self.allocation_mut(phase_index, allocation_index) {
            Some(allocation) => {
                allocation.apply(field);
                true
            }
            None => false,
        }
    }

    pub fn remove_allocation(&mut self, phase_index: usize, allocation_index: usize) -> bool {
        let Some(phase) = self.phases.get_mut(phase_index) else {
            return false;
        };
        if allocation_index >= phase.tree_species.len() {
            return false;
        }
        phase.tree_species.remove(allocation_index);
        true
    }

    /// Point a row at `species`, pre-filling its cost per tree from the
    /// catalogue price when the user has not entered one.
    pub fn select_tree_species(
        &mut self,
        phase_index: usize,
        allocation_index: usize,
        species: &TreeSpecies,
    ) -> bool {
        match self.allocation_mut(phase_index, allocation_index) {
            Some(allocation) => {
                allocation.tree_species_id = Some(species.id);
                if allocation.cost_per_tree.is_none() {
                    allocation.cost_per_tree = species.price_per_tree;
                }
                true
            }
            None => false,
        }
    }

    /// Total planned trees across every phase, for the form summary.
    pub fn allocated_tree_total(&self) -> i64 {
        self.phases
            .iter()
            .flat_map(|p| p.tree_species.iter())
            .filter_map(|a| a.quantity_planned)
            .sum()
    }

    fn allocation_mut(
        &mut self,
        phase_index: usize,
        allocation_index: usize,
    ) -> Option<&mut AllocationDraft> {
        self.phases
            .get_mut(phase_index)?
            .tree_species
            .get_mut(allocation_index)
    }
}

// ---------------------------------------------------------------------------
// Hydration
// ---------------------------------------------------------------------------

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            location: project.location.clone().unwrap_or_default(),
            latitude: project.latitude,
            longitude: project.longitude,
            area: project.area,
            area_unit: project.area_unit.unwrap_or_default(),
            usable_area: project.usable_area,
            planting_date: project.planting_date,
            planned_tree_total: project.planned_tree_total,
            planting_density: project.planting_density,
            status: project.status.unwrap_or_default(),
            is_public: project.is_public.unwrap_or(false),
            partner_organizations: project.partner_organizations.clone().unwrap_or_default(),
            phases: project
                .phases
                .iter()
                .enumerate()
                .map(|(i, phase)| hydrate_phase(i, phase))
                .collect(),
        }
    }
}

fn hydrate_phase(index: usize, phase: &ProjectPhase) -> PhaseDraft {
    PhaseDraft {
        id: phase.id,
        phase_number: index as u32 + 1,
        phase_name: phase.phase_name.clone().unwrap_or_default(),
        description: phase.description.clone().unwrap_or_default(),
        status: phase.status.unwrap_or_default(),
        start_date: phase.start_date,
        end_date: phase.end_date,
        expected_duration: phase.expected_duration,
        actual_duration: phase.actual_duration,
        budget: phase.budget,
        actual_cost: phase.actual_cost,
        notes: phase.notes.clone().unwrap_or_default(),
        collapsed: false,
        tree_species: phase.tree_species.iter().map(hydrate_allocation).collect(),
    }
}

fn hydrate_allocation(allocation: &PhaseTreeSpecies) -> AllocationDraft {
    AllocationDraft {
        tree_species_id: allocation.species_id(),
        quantity_planned: allocation.quantity_planned,
        cost_per_tree: allocation.cost_per_tree,
        planting_cost: allocation.planting_cost,
        maintenance_cost_yearly: allocation.maintenance_cost_yearly,
        notes: allocation.notes.clone().unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

impl TryFrom<&ProjectDraft> for ProjectPayload {
    type Error = CoreError;

    /// Phases are renumbered by position, numeric fields coerced (counts
    /// default to 0, optional costs omitted), empty allocation rows dropped
    /// and UI-only fields left behind.
    fn try_from(draft: &ProjectDraft) -> Result<Self, Self::Error> {
        let phases = draft
            .phases
            .iter()
            .enumerate()
            .map(|(i, phase)| phase_payload(i as u32 + 1, phase))
            .collect::<Result<Vec<_>, _>>()?;

        let payload = ProjectPayload {
            name: draft.name.trim().to_string(),
            description: non_blank(&draft.description),
            location: non_blank(&draft.location),
            latitude: draft.latitude,
            longitude: draft.longitude,
            area: draft.area.unwrap_or(0.0),
            area_unit: draft.area_unit,
            usable_area: draft.usable_area,
            planting_date: draft.planting_date,
            planned_tree_total: draft.planned_tree_total.unwrap_or(0),
            planting_density: draft.planting_density,
            status: draft.status,
            is_public: draft.is_public,
            partner_organizations: draft.partner_organizations.clone(),
            phases,
        };
        payload.validate()?;
        Ok(payload)
    }
}

fn phase_payload(phase_number: u32, phase: &PhaseDraft) -> Result<PhasePayload, CoreError> {
    let tree_species = phase
        .tree_species
        .iter()
        .enumerate()
        .filter(|(_, allocation)| !allocation.is_empty())
        .map(|(row, allocation)| allocation_payload(phase_number, row + 1, allocation))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PhasePayload {
        id: phase.id,
        phase_number,
        phase_name: non_blank(&phase.phase_name)
            .unwrap_or_else(|| format!("Phase {phase_number}")),
        description: non_blank(&phase.description),
        status: phase.status,
        start_date: phase.start_date,
        end_date: phase.end_date,
        expected_duration: phase.expected_duration,
        actual_duration: phase.actual_duration,
        budget: phase.budget,
        actual_cost: phase.actual_cost,
        notes: non_blank(&phase.notes),
        tree_species,
    })
}

fn allocation_payload(
    phase_number: u32,
    row: usize,
    allocation: &AllocationDraft,
) -> Result<AllocationPayload, CoreError> {
    let tree_species_id = allocation.tree_species_id.ok_or_else(|| {
        CoreError::Validation(format!(
            "Phase {phase_number}, row {row}: select a tree species"
        ))
    })?;
    Ok(AllocationPayload {
        tree_species_id,
        quantity_planned: allocation.quantity_planned.unwrap_or(0),
        cost_per_tree: allocation.cost_per_tree,
        planting_cost: allocation.planting_cost,
        maintenance_cost_yearly: allocation.maintenance_cost_yearly,
        notes: non_blank(&allocation.notes),
    })
}

// ---------------------------------------------------------------------------
// EntityForm
// ---------------------------------------------------------------------------

/// The project create/edit form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectForm;

impl EntityForm for ProjectForm {
    type Draft = ProjectDraft;
    type Remote = Project;
    type Payload = ProjectPayload;
    type Reference = TreeSpecies;

    const RESOURCE: &'static str = PROJECTS_RESOURCE;
    const REFERENCE_RESOURCE: Option<&'static str> = Some(TREE_SPECIES_RESOURCE);

    fn hydrate(remote: &Project) -> ProjectDraft {
        ProjectDraft::from(remote)
    }

    fn to_payload(draft: &ProjectDraft) -> Result<ProjectPayload, CoreError> {
        ProjectPayload::try_from(draft)
    }
}

// ---------------------------------------------------------------------------
// Controller operations
// ---------------------------------------------------------------------------

impl<C: Collaborator + ?Sized> FormController<ProjectForm, C> {
    pub async fn update_root_field(&self, field: ProjectField) {
        self.update(|draft| draft.update_root_field(field)).await
    }

    pub async fn set_partner_organizations_text(&self, text: &str) {
        self.update(|draft| draft.set_partner_organizations_text(text))
            .await
    }

    pub async fn add_phase(&self) -> usize {
        self.update(ProjectDraft::add_phase).await
    }

    pub async fn remove_phase(&self, index: usize) -> bool {
        self.update(|draft| draft.remove_phase(index)).await
    }

    pub async fn update_phase_field(&self, index: usize, field: PhaseField) -> bool {
        self.update(|draft| draft.update_phase_field(index, field))
            .await
    }

    pub async fn toggle_phase_collapsed(&self, index: usize) -> bool {
        self.update(|draft| draft.toggle_phase_collapsed(index)).await
    }

    pub async fn add_allocation(&self, phase_index: usize) -> bool {
        self.update(|draft| draft.add_allocation(phase_index)).await
    }

    pub async fn update_allocation_field(
        &self,
        phase_index: usize,
        allocation_index: usize,
        field: AllocationField,
    ) -> bool {
        self.update(|draft| draft.update_allocation_field(phase_index, allocation_index, field))
            .await
    }

    pub async fn remove_allocation(&self, phase_index: usize, allocation_index: usize) -> bool {
        self.update(|draft| draft.remove_allocation(phase_index, allocation_index))
            .await
    }

    /// Choose a species for a row. When the species is in the loaded
    /// reference list its catalogue price pre-fills an unset cost per tree;
    /// otherwise only the id is set.
    pub async fn select_tree_species(
        &self,
        phase_index: usize,
        allocation_index: usize,
        species_id: DbId,
    ) -> bool {
        self.update_with_references(|draft, species| {
            match species.iter().find(|s| s.id == species_id) {
                Some(found) => draft.select_tree_species(phase_index, allocation_index, found),
                None => draft.update_allocation_field(
                    phase_index,
                    allocation_index,
                    AllocationField::TreeSpeciesId(Some(species_id)),
                ),
            }
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
