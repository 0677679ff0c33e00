//! End-to-end controller flows over the in-memory directory service

use capdir_core::controller::{Action, DirectoryController, Effect};
use capdir_core::feedback::FeedbackKind;
use capdir_core::model::Snapshot;
use capdir_core::query::{Availability, SortKey};
use capdir_core::registry::{CapabilityBackend, InMemoryBackend, RegistryClient};
use capdir_core::render::LOAD_FAILED_NOTICE;
use std::sync::Arc;

fn scenario_snapshot() -> Snapshot {
    serde_json::from_str(
        r#"{
            "Cloud": {"description": "...", "practice_area": "Tech", "capacity": 35, "consultants": ["a@x.com"]},
            "Audit": {"description": "...", "practice_area": "Fin", "capacity": 15, "consultants": []},
            "Data": {"description": "...", "practice_area": "Tech", "capacity": 25, "consultants": ["c@x.com"]}
        }"#,
    )
    .unwrap()
}

/// Runs effects to completion inline, ignoring dismiss timers.
async fn settle(controller: &mut DirectoryController, client: &RegistryClient, effects: Vec<Effect>) {
    let mut queue = effects;
    while let Some(effect) = queue.pop() {
        let action = match effect {
            Effect::FetchSnapshot { seq } => Action::SnapshotFetched {
                seq,
                result: client.fetch_snapshot().await,
            },
            Effect::Mutate {
                mutation,
                capability,
                email,
            } => Action::MutationCompleted {
                mutation,
                outcome: client.mutate(mutation, &capability, &email).await,
            },
            Effect::ScheduleDismiss { .. } => continue,
        };
        queue.extend(controller.dispatch(action));
    }
}

async fn loaded(backend: &Arc<InMemoryBackend>) -> (DirectoryController, RegistryClient) {
    let client = RegistryClient::new(backend.clone());
    let mut controller = DirectoryController::default();
    let effects = controller.start();
    settle(&mut controller, &client, effects).await;
    (controller, client)
}

fn card_names(controller: &DirectoryController) -> Vec<String> {
    controller.view().cards.iter().map(|c| c.name.clone()).collect()
}

#[tokio::test]
async fn high_availability_filter() {
    let backend = Arc::new(InMemoryBackend::new(scenario_snapshot()));
    let (mut controller, _) = loaded(&backend).await;

    controller.dispatch(Action::SetAvailability(Some(Availability::High)));
    assert_eq!(card_names(&controller), vec!["Cloud"]);
    assert_eq!(controller.view().summary, "Showing 1 of 3 capabilities");
}

#[tokio::test]
async fn register_success_refetches_and_reorders() {
    let backend = Arc::new(InMemoryBackend::new(scenario_snapshot()));
    let (mut controller, client) = loaded(&backend).await;
    controller.dispatch(Action::SetSort(SortKey::ConsultantsDesc));
    assert_eq!(backend.fetch_count(), 1);

    controller.dispatch(Action::SetEmail("b@x.com".to_string()));
    controller.dispatch(Action::SelectCapability("Cloud".to_string()));
    let effects = controller.dispatch(Action::SubmitRegistration);
    settle(&mut controller, &client, effects).await;

    assert_eq!(backend.fetch_count(), 2);
    let cloud = controller.store().get().get("Cloud").unwrap().clone();
    assert!(cloud.has_consultant("b@x.com"));
    assert_eq!(card_names(&controller)[0], "Cloud");

    let feedback = controller.view().feedback.as_ref().unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Success);
    assert_eq!(feedback.text, "Registered b@x.com for Cloud");
    assert!(controller.form().email.is_empty());
}

#[tokio::test]
async fn unregister_unknown_pair_leaves_store_alone() {
    let backend = Arc::new(InMemoryBackend::new(scenario_snapshot()));
    let (mut controller, client) = loaded(&backend).await;
    let before = controller.store().get();
    let rosters_before = rosters(&controller);

    // The service drops a@x.com behind our back, so the rendered binding now
    // points at a pair the service no longer has.
    backend.unregister("Cloud", "a@x.com").await.unwrap();
    let binding = controller
        .view()
        .bindings()
        .find(|b| b.email == "a@x.com")
        .unwrap()
        .clone();
    let effects = controller.dispatch(Action::Unregister(binding));
    settle(&mut controller, &client, effects).await;

    assert_eq!(backend.fetch_count(), 1);
    assert_eq!(*controller.store().get(), *before);
    assert_eq!(rosters(&controller), rosters_before);
    let feedback = controller.view().feedback.as_ref().unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Error);
    assert_eq!(feedback.text, "Consultant is not registered for this capability");
}

fn rosters(controller: &DirectoryController) -> Vec<(String, Vec<String>)> {
    controller
        .view()
        .cards
        .iter()
        .map(|card| {
            let emails = card.consultants.iter().map(|row| row.email.clone()).collect();
            (card.name.clone(), emails)
        })
        .collect()
}

#[tokio::test]
async fn transport_failure_keeps_previous_state() {
    let backend = Arc::new(InMemoryBackend::new(scenario_snapshot()));
    let (mut controller, client) = loaded(&backend).await;
    backend.set_offline(true);

    controller.dispatch(Action::SetEmail("b@x.com".to_string()));
    controller.dispatch(Action::SelectCapability("Audit".to_string()));
    let effects = controller.dispatch(Action::SubmitRegistration);
    settle(&mut controller, &client, effects).await;

    let feedback = controller.view().feedback.as_ref().unwrap();
    assert_eq!(feedback.text, "Failed to register. Please try again.");
    assert_eq!(controller.view().summary, "Showing 3 of 3 capabilities");
    // The form keeps its input so the user can resubmit.
    assert_eq!(controller.form().capability, "Audit");
}

#[tokio::test]
async fn initial_load_failure_shows_inline_notice() {
    let backend = Arc::new(InMemoryBackend::new(scenario_snapshot()));
    backend.set_offline(true);
    let (controller, _) = loaded(&backend).await;

    assert_eq!(controller.view().notice.as_deref(), Some(LOAD_FAILED_NOTICE));
    assert!(controller.view().feedback.is_none());
}

#[tokio::test]
async fn clear_filters_matches_default_view() {
    let backend = Arc::new(InMemoryBackend::new(scenario_snapshot()));
    let (mut controller, _) = loaded(&backend).await;
    let default_cards = card_names(&controller);

    controller.dispatch(Action::SetSearch("clo".to_string()));
    controller.dispatch(Action::SetPracticeArea(Some("Tech".to_string())));
    controller.dispatch(Action::SetSort(SortKey::CapacityAsc));
    assert_eq!(card_names(&controller), vec!["Cloud"]);

    controller.dispatch(Action::ClearFilters);
    assert_eq!(card_names(&controller), default_cards);
    assert_eq!(default_cards, vec!["Audit", "Cloud", "Data"]);
}

#[tokio::test]
async fn refresh_failure_after_load_keeps_cards() {
    let backend = Arc::new(InMemoryBackend::new(scenario_snapshot()));
    let (mut controller, client) = loaded(&backend).await;
    backend.set_offline(true);

    let effects = controller.dispatch(Action::Refresh);
    settle(&mut controller, &client, effects).await;

    let feedback = controller.view().feedback.as_ref().unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Error);
    assert_eq!(feedback.text, LOAD_FAILED_NOTICE);
    assert!(controller.view().notice.is_none());

    controller.dispatch(Action::SetSearch("clo".to_string()));
    assert_eq!(card_names(&controller), vec!["Cloud"]);
    assert_eq!(controller.view().summary, "Showing 1 of 3 capabilities");
}
