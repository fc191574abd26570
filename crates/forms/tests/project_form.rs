//! Integration tests for the project form controller.
//!
//! Drives [`FormController<ProjectForm, _>`] against the in-memory
//! collaborator and inspects both the draft and the bodies that reach the
//! API.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use verdant_forms::project::{
    AllocationDraft, AllocationField, PhaseField, ProjectDraft, ProjectField, ProjectForm,
};
use verdant_forms::{FormController, FormError, FormErrorKind};

use common::{species_catalogue, MockCollaborator, CREATED_ID};

type ProjectController = FormController<ProjectForm, MockCollaborator>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn mounted(
    mock: MockCollaborator,
    id: Option<i64>,
) -> (ProjectController, Arc<MockCollaborator>) {
    let mock = Arc::new(mock);
    let form = FormController::new(Arc::clone(&mock), id);
    form.mount().await;
    (form, mock)
}

fn phase_numbers(body: &serde_json::Value) -> Vec<i64> {
    body["phases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["phaseNumber"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Test: create-mode scenario with duplicate-row suppression
// ---------------------------------------------------------------------------

/// One phase, two consecutive adds with no edit in between: exactly one row.
#[tokio::test]
async fn second_add_allocation_is_suppressed() {
    let (form, _) = mounted(MockCollaborator::new(), None).await;

    form.add_phase().await;
    assert!(form.add_allocation(0).await);
    assert!(!form.add_allocation(0).await);

    let draft = form.draft().await;
    assert_eq!(draft.phases.len(), 1);
    assert_eq!(draft.phases[0].tree_species.len(), 1);
}

/// Filling the row re-enables adding.
#[tokio::test]
async fn add_allocation_after_edit_appends() {
    let (form, _) = mounted(MockCollaborator::new(), None).await;

    form.add_phase().await;
    form.add_allocation(0).await;
    form.update_allocation_field(0, 0, AllocationField::QuantityPlanned(Some(50)))
        .await;
    assert!(form.add_allocation(0).await);
    assert_eq!(form.draft().await.phases[0].tree_species.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: non-interference and removal
// ---------------------------------------------------------------------------

/// Updating one phase leaves other phases and its own rows unchanged.
#[tokio::test]
async fn update_phase_field_only_touches_target() {
    let (form, _) = mounted(MockCollaborator::new(), None).await;
    for _ in 0..3 {
        form.add_phase().await;
    }
    form.add_allocation(1).await;
    form.update_allocation_field(1, 0, AllocationField::TreeSpeciesId(Some(7)))
        .await;
    let before = form.draft().await;

    assert!(form.update_phase_field(1, PhaseField::Budget(Some(2500.0))).await);

    let after = form.draft().await;
    assert_eq!(after.phases[0], before.phases[0]);
    assert_eq!(after.phases[2], before.phases[2]);
    assert_eq!(after.phases[1].tree_species, before.phases[1].tree_species);
    assert_eq!(after.phases[1].budget, Some(2500.0));
}

/// Removing the middle of three phases keeps the outer two in order.
#[tokio::test]
async fn remove_phase_keeps_relative_order() {
    let (form, _) = mounted(MockCollaborator::new(), None).await;
    for name in ["A", "B", "C"] {
        let index = form.add_phase().await;
        form.update_phase_field(index, PhaseField::Name(name.to_string()))
            .await;
    }

    assert!(form.remove_phase(1).await);
    assert!(!form.remove_phase(7).await);

    let names: Vec<String> = form
        .draft()
        .await
        .phases
        .into_iter()
        .map(|p| p.phase_name)
        .collect();
    assert_eq!(names, vec!["A".to_string(), "C".to_string()]);
}

// ---------------------------------------------------------------------------
// Test: hydration
// ---------------------------------------------------------------------------

/// Allocations take only the species id plus numerics; notes default to "".
#[tokio::test]
async fn hydrate_maps_nested_allocations() {
    let mock = MockCollaborator::new().with_entity(
        "projects/3",
        json!({
            "id": 3,
            "name": "Mau Forest",
            "phases": [{
                "phaseName": "A",
                "treeSpecies": [{ "treeSpeciesId": 7, "quantityPlanned": 100 }]
            }]
        }),
    );
    let (form, _) = mounted(mock, Some(3)).await;

    let state = form.snapshot().await;
    assert!(state.is_edit_mode);
    assert!(!state.is_loading);
    assert_eq!(state.last_error, None);

    let allocation = &state.draft.phases[0].tree_species[0];
    assert_eq!(allocation.tree_species_id, Some(7));
    assert_eq!(allocation.quantity_planned, Some(100));
    assert_eq!(allocation.cost_per_tree, None);
    assert_eq!(allocation.planting_cost, None);
    assert_eq!(allocation.maintenance_cost_yearly, None);
    assert_eq!(allocation.notes, "");
}

/// Joined species records collapse to their id.
#[tokio::test]
async fn hydrate_extracts_id_from_joined_species() {
    let mock = MockCollaborator::new().with_entity(
        "projects/4",
        json!({
            "id": 4,
            "name": "Kakamega",
            "phases": [{
                "treeSpecies": [{
                    "treeSpecies": { "id": 9, "commonName": "Grevillea" },
                    "costPerTree": "2.50",
                    "notes": "edge rows"
                }]
            }]
        }),
    );
    let (form, _) = mounted(mock, Some(4)).await;

    let allocation = form.draft().await.phases[0].tree_species[0].clone();
    assert_eq!(
        allocation,
        AllocationDraft {
            tree_species_id: Some(9),
            cost_per_tree: Some(2.5),
            notes: "edge rows".to_string(),
            ..Default::default()
        }
    );
}

/// A failed fetch leaves the default draft, records the error and keeps
/// the form usable.
#[tokio::test]
async fn hydration_failure_degrades_to_empty_draft() {
    let mock = MockCollaborator::new()
        .failing_get("projects/9")
        .with_entity("tree-species", species_catalogue());
    let (form, _) = mounted(mock, Some(9)).await;

    let state = form.snapshot().await;
    assert!(!state.is_loading);
    assert_eq!(state.draft, ProjectDraft::default());
    assert_eq!(
        state.last_error.as_ref().map(|e| e.kind),
        Some(FormErrorKind::HydrationFailure)
    );
    assert_eq!(state.references.len(), 2);

    form.add_phase().await;
    assert_eq!(form.draft().await.phases.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: save payload
// ---------------------------------------------------------------------------

/// Stored phase numbers are ignored; the payload numbers by position.
#[tokio::test]
async fn duplicate_phase_numbers_are_renumbered_on_save() {
    let mock = MockCollaborator::new().with_entity(
        "projects/3",
        json!({
            "id": 3,
            "name": "Mau Forest",
            "phases": [
                { "phaseNumber": 1, "phaseName": "Nursery" },
                { "phaseNumber": 1, "phaseName": "Planting" }
            ]
        }),
    );
    let (form, mock) = mounted(mock, Some(3)).await;

    let saved = form.save().await.unwrap();
    assert_eq!(saved.id, 3);

    let calls = mock.calls();
    let put = calls.iter().find(|c| c.method == "PUT").unwrap();
    assert_eq!(put.path, "projects/3");
    assert_eq!(phase_numbers(put.body.as_ref().unwrap()), vec![1, 2]);
}

/// Reordered and edited phases still serialize as 1..=N.
#[tokio::test]
async fn renumbering_holds_after_removals() {
    let (form, mock) = mounted(MockCollaborator::new(), None).await;
    form.update_root_field(ProjectField::Name("Mau Forest".into()))
        .await;
    for _ in 0..5 {
        form.add_phase().await;
    }
    form.remove_phase(0).await;
    form.remove_phase(2).await;

    let draft = form.draft().await;
    let stale: Vec<u32> = draft.phases.iter().map(|p| p.phase_number).collect();
    assert_eq!(stale, vec![2, 3, 5]);

    form.save().await.unwrap();
    let body = mock.written_bodies().pop().unwrap();
    assert_eq!(phase_numbers(&body), vec![1, 2, 3]);
}

/// Create mode posts to the collection; the created entity is returned.
#[tokio::test]
async fn create_mode_posts_payload() {
    let (form, mock) = mounted(MockCollaborator::new(), None).await;
    form.update_root_field(ProjectField::Name(" Kakamega Buffer ".into()))
        .await;
    form.update_root_field(ProjectField::Area(Some(40.0))).await;
    form.set_partner_organizations_text("WWF, KFS").await;
    form.add_phase().await;
    form.add_allocation(0).await;
    form.update_allocation_field(0, 0, AllocationField::TreeSpeciesId(Some(7)))
        .await;
    form.update_allocation_field(0, 0, AllocationField::QuantityPlanned(Some(250)))
        .await;

    let saved = form.save().await.unwrap();
    assert_eq!(saved.id, CREATED_ID);
    assert_eq!(saved.name, "Kakamega Buffer");

    let calls = mock.calls();
    let post = calls.iter().find(|c| c.method == "POST").unwrap();
    assert_eq!(post.path, "projects");
    let body = post.body.as_ref().unwrap();
    assert_eq!(body["partnerOrganizations"], json!(["WWF", "KFS"]));
    assert_eq!(body["plannedTreeTotal"], 0);
    assert_eq!(body["phases"][0]["phaseName"], "Phase 1");
    assert_eq!(
        body["phases"][0]["treeSpecies"],
        json!([{ "treeSpeciesId": 7, "quantityPlanned": 250 }])
    );

    let state = form.snapshot().await;
    assert!(!state.is_saving);
    assert_eq!(state.last_error, None);
}

/// A rejected save keeps the draft field-for-field and reports the error.
#[tokio::test]
async fn save_failure_preserves_draft() {
    let (form, _) = mounted(MockCollaborator::new().failing_writes(500), None).await;
    form.update_root_field(ProjectField::Name("Mau Forest".into()))
        .await;
    form.add_phase().await;
    form.update_phase_field(0, PhaseField::Notes("fence first".into()))
        .await;
    form.add_allocation(0).await;
    form.toggle_phase_collapsed(0).await;
    let before = form.draft().await;

    let result = form.save().await;
    assert_matches!(result, Err(FormError::Save { resource: "projects", .. }));

    let state = form.snapshot().await;
    assert_eq!(state.draft, before);
    assert!(!state.is_saving);
    assert_eq!(
        state.last_error.as_ref().map(|e| e.kind),
        Some(FormErrorKind::SaveFailure)
    );
}

/// Validation failures never reach the API.
#[tokio::test]
async fn invalid_draft_is_not_submitted() {
    let (form, mock) = mounted(MockCollaborator::new(), None).await;
    form.update_root_field(ProjectField::Name("Mau Forest".into()))
        .await;
    form.update_root_field(ProjectField::Latitude(Some(-120.0)))
        .await;

    let result = form.save().await;
    assert_matches!(result, Err(FormError::Invalid(_)));
    assert!(mock.written_bodies().is_empty());

    let last = form.last_error().await.unwrap();
    assert_eq!(last.kind, FormErrorKind::SaveFailure);
    assert!(last.message.contains("Latitude"));
    assert!(!form.is_saving());
}

/// A new attempt supersedes the previous banner; dismiss clears it.
#[tokio::test]
async fn errors_persist_until_dismissed_or_superseded() {
    let (form, _) = mounted(MockCollaborator::new(), None).await;

    assert!(form.save().await.is_err());
    assert!(form.last_error().await.is_some());

    form.update_root_field(ProjectField::Name("Mau Forest".into()))
        .await;
    assert!(form.last_error().await.is_some());

    form.save().await.unwrap();
    assert_eq!(form.last_error().await, None);

    form.update_root_field(ProjectField::Name(String::new())).await;
    assert!(form.save().await.is_err());
    form.dismiss_error().await;
    assert_eq!(form.last_error().await, None);
}

// ---------------------------------------------------------------------------
// Test: reference list
// ---------------------------------------------------------------------------

/// Selecting a catalogue species pre-fills its price.
#[tokio::test]
async fn select_species_uses_reference_price() {
    let mock = MockCollaborator::new().with_entity("tree-species", species_catalogue());
    let (form, _) = mounted(mock, None).await;

    let references = form.references().await;
    assert_eq!(references.len(), 2);
    assert_eq!(references[1].display_name(), "Grevillea (Grevillea robusta)");

    form.add_phase().await;
    form.add_allocation(0).await;
    assert!(form.select_tree_species(0, 0, 7).await);
    let allocation = form.draft().await.phases[0].tree_species[0].clone();
    assert_eq!(allocation.tree_species_id, Some(7));
    assert_eq!(allocation.cost_per_tree, Some(1.25));

    form.add_allocation(0).await;
    assert!(form.select_tree_species(0, 1, 42).await);
    let unknown = form.draft().await.phases[0].tree_species[1].clone();
    assert_eq!(unknown.tree_species_id, Some(42));
    assert_eq!(unknown.cost_per_tree, None);
}

/// A failed lookup list leaves selects empty without blocking the form.
#[tokio::test]
async fn reference_list_failure_degrades_to_empty() {
    let mock = MockCollaborator::new()
        .with_entity("projects/3", json!({ "id": 3, "name": "Mau Forest" }))
        .failing_get("tree-species");
    let (form, _) = mounted(mock, Some(3)).await;

    let state = form.snapshot().await;
    assert!(state.references.is_empty());
    assert!(!state.is_loading_references);
    assert_eq!(state.draft.name, "Mau Forest");
    assert_eq!(
        state.last_error.as_ref().map(|e| e.kind),
        Some(FormErrorKind::ReferenceListFailure)
    );

    form.save().await.unwrap();
}

/// When both fetches fail the hydration error is the one shown.
#[tokio::test]
async fn hydration_error_wins_over_reference_error() {
    let mock = MockCollaborator::new()
        .failing_get("projects/3")
        .failing_get("tree-species");
    let (form, _) = mounted(mock, Some(3)).await;

    assert_eq!(
        form.last_error().await.map(|e| e.kind),
        Some(FormErrorKind::HydrationFailure)
    );
}

// ---------------------------------------------------------------------------
// Test: lifecycle
// ---------------------------------------------------------------------------

/// Mount only fetches once.
#[tokio::test]
async fn mount_is_idempotent() {
    let mock = MockCollaborator::new()
        .with_entity("projects/3", json!({ "id": 3, "name": "Mau Forest" }))
        .with_entity("tree-species", species_catalogue());
    let (form, mock) = mounted(mock, Some(3)).await;

    form.update_root_field(ProjectField::Name("Renamed".into())).await;
    form.mount().await;

    assert_eq!(mock.calls().len(), 2);
    assert_eq!(form.draft().await.name, "Renamed");
}

/// Every mutation bumps the revision observers watch.
#[tokio::test]
async fn mutations_notify_observers() {
    let (form, _) = mounted(MockCollaborator::new(), None).await;
    let mut rx = form.subscribe();
    rx.borrow_and_update();

    form.add_phase().await;
    assert!(rx.has_changed().unwrap());
    let seen = *rx.borrow_and_update();

    form.update_phase_field(0, PhaseField::Name("Nursery".into()))
        .await;
    assert!(rx.has_changed().unwrap());
    assert!(form.revision() > seen);
}
