//! View Controller
//!
//! Owns the store, the criteria, the registration form and the feedback
//! channel. Every input arrives as an [`Action`]; `dispatch` applies it,
//! re-renders the whole [`View`], and hands back the [`Effect`]s (network
//! calls, timers) the caller must run. Completed effects come back in as
//! actions, so the controller itself never awaits anything.

use crate::feedback::{FeedbackChannel, DEFAULT_DISMISS_AFTER};
use crate::model::Snapshot;
use crate::query::{Availability, Criteria, SortKey};
use crate::registry::{Mutation, Outcome};
use crate::render::{self, LoadState, RenderInput, UnregisterBinding, View};
use crate::store::CapabilityStore;
use crate::{debug_log, info_log};
use std::time::Duration;

pub const SELECT_CAPABILITY_PROMPT: &str = "Please select a capability.";
pub const ENTER_EMAIL_PROMPT: &str = "Please enter an email address.";

/// Something the user did, or something that finished.
#[derive(Debug)]
pub enum Action {
    SetSearch(String),
    SetPracticeArea(Option<String>),
    SetIndustry(Option<String>),
    SetAvailability(Option<Availability>),
    SetSort(SortKey),
    ClearFilters,

    SetEmail(String),
    SelectCapability(String),
    SubmitRegistration,
    Unregister(UnregisterBinding),
    Refresh,

    SnapshotFetched {
        seq: u64,
        result: crate::error::Result<Snapshot>,
    },
    MutationCompleted {
        mutation: Mutation,
        outcome: Outcome,
    },
    DismissFeedback {
        generation: u64,
    },
}

/// Work the controller wants done outside of itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSnapshot {
        seq: u64,
    },
    Mutate {
        mutation: Mutation,
        capability: String,
        email: String,
    },
    ScheduleDismiss {
        generation: u64,
        after: Duration,
    },
}

/// The registration form's two inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub email: String,
    pub capability: String,
}

impl RegistrationForm {
    pub fn reset(&mut self) {
        self.email.clear();
        self.capability.clear();
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.capability.trim().is_empty() {
            return Err(SELECT_CAPABILITY_PROMPT);
        }
        if self.email.trim().is_empty() {
            return Err(ENTER_EMAIL_PROMPT);
        }
        Ok(())
    }
}

/// Mutation lifecycle as seen by the UI. Overlapping attempts are allowed,
/// so this counts them rather than locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending(usize),
}

pub struct DirectoryController {
    store: CapabilityStore,
    criteria: Criteria,
    form: RegistrationForm,
    feedback: FeedbackChannel,
    load_state: LoadState,
    next_fetch_seq: u64,
    /// Newest fetch that has completed, successfully or not
    settled_seq: u64,
    in_flight: usize,
    epoch: u64,
    view: View,
}

impl DirectoryController {
    pub fn new(default_sort: SortKey, dismiss_after: Duration) -> Self {
        let criteria = Criteria {
            sort: default_sort,
            ..Default::default()
        };
        let mut controller = Self {
            store: CapabilityStore::new(),
            criteria,
            form: RegistrationForm::default(),
            feedback: FeedbackChannel::new(dismiss_after),
            load_state: LoadState::Loading,
            next_fetch_seq: 0,
            settled_seq: 0,
            in_flight: 0,
            epoch: 0,
            view: View::empty(),
        };
        controller.render();
        controller
    }

    /// Kick off the initial load.
    pub fn start(&mut self) -> Vec<Effect> {
        vec![self.fetch()]
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let effects = self.update(action);
        self.render();
        effects
    }

    fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SetSearch(term) => self.criteria.search = term,
            Action::SetPracticeArea(area) => self.criteria.practice_area = area,
            Action::SetIndustry(industry) => self.criteria.industry = industry,
            Action::SetAvailability(bucket) => self.criteria.availability = bucket,
            Action::SetSort(sort) => self.criteria.sort = sort,
            Action::ClearFilters => self.criteria = Criteria::default(),

            Action::SetEmail(email) => self.form.email = email,
            Action::SelectCapability(name) => self.form.capability = name,
            Action::SubmitRegistration => return self.submit_registration(),
            Action::Unregister(binding) => return self.unregister(binding),
            Action::Refresh => return vec![self.fetch()],

            Action::SnapshotFetched { seq, result } => return self.on_snapshot(seq, result),
            Action::MutationCompleted { mutation, outcome } => {
                return self.on_mutation_completed(mutation, outcome)
            }
            Action::DismissFeedback { generation } => {
                self.feedback.dismiss(generation);
            }
        }
        Vec::new()
    }

    fn fetch(&mut self) -> Effect {
        self.next_fetch_seq += 1;
        Effect::FetchSnapshot {
            seq: self.next_fetch_seq,
        }
    }

    fn notify(&mut self, outcome: &Outcome) -> Effect {
        let generation = match outcome {
            Outcome::Success { message } => self.feedback.success(message.clone()),
            Outcome::Failure { detail } => self.feedback.error(detail.clone()),
        };
        Effect::ScheduleDismiss {
            generation,
            after: self.feedback.dismiss_after(),
        }
    }

    fn submit_registration(&mut self) -> Vec<Effect> {
        if let Err(prompt) = self.form.validate() {
            let outcome = Outcome::Failure {
                detail: prompt.to_string(),
            };
            return vec![self.notify(&outcome)];
        }
        self.in_flight += 1;
        vec![Effect::Mutate {
            mutation: Mutation::Register,
            capability: self.form.capability.clone(),
            email: self.form.email.trim().to_string(),
        }]
    }

    fn unregister(&mut self, binding: UnregisterBinding) -> Vec<Effect> {
        if binding.epoch != self.view.epoch {
            debug_log!(
                "Ignoring unregister for {} from stale render {} (current {})",
                binding.email,
                binding.epoch,
                self.view.epoch
            );
            return Vec::new();
        }
        self.in_flight += 1;
        vec![Effect::Mutate {
            mutation: Mutation::Unregister,
            capability: binding.capability,
            email: binding.email,
        }]
    }

    fn on_snapshot(&mut self, seq: u64, result: crate::error::Result<Snapshot>) -> Vec<Effect> {
        if seq < self.settled_seq {
            debug_log!("Dropping fetch {} older than settled {}", seq, self.settled_seq);
            return Vec::new();
        }
        self.settled_seq = seq;
        match result {
            Ok(snapshot) => {
                if self.store.load_sequenced(seq, snapshot) {
                    self.load_state = LoadState::Loaded;
                    let form_target_gone = !self.form.capability.is_empty()
                        && !self.store.get().contains(&self.form.capability);
                    if form_target_gone {
                        self.form.capability.clear();
                    }
                }
                Vec::new()
            }
            Err(_) if self.store.loaded_seq() == 0 => {
                self.load_state = LoadState::Failed;
                Vec::new()
            }
            // The last good snapshot stays on screen
            Err(_) => {
                let outcome = Outcome::Failure {
                    detail: render::LOAD_FAILED_NOTICE.to_string(),
                };
                vec![self.notify(&outcome)]
            }
        }
    }

    fn on_mutation_completed(&mut self, mutation: Mutation, outcome: Outcome) -> Vec<Effect> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let mut effects = vec![self.notify(&outcome)];
        if outcome.is_success() {
            info_log!("{} succeeded: {}", mutation, outcome.text());
            if mutation == Mutation::Register {
                self.form.reset();
            }
            effects.push(self.fetch());
        }
        effects
    }

    fn render(&mut self) {
        self.epoch += 1;
        let snapshot = self.store.get();
        self.view = render::render(RenderInput {
            epoch: self.epoch,
            snapshot: &snapshot,
            criteria: &self.criteria,
            load_state: self.load_state,
            feedback: self.feedback.visible(),
            pending: self.in_flight > 0,
        });
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn store(&self) -> &CapabilityStore {
        &self.store
    }

    pub fn feedback(&self) -> &FeedbackChannel {
        &self.feedback
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn mutation_state(&self) -> MutationState {
        match self.in_flight {
            0 => MutationState::Idle,
            n => MutationState::Pending(n),
        }
    }
}

impl Default for DirectoryController {
    fn default() -> Self {
        Self::new(SortKey::NameAsc, DEFAULT_DISMISS_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Capability;

    fn loaded() -> DirectoryController {
        let mut controller = DirectoryController::default();
        let seq = match controller.start().as_slice() {
            [Effect::FetchSnapshot { seq }] => *seq,
            other => panic!("unexpected effects {:?}", other),
        };
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "Cloud",
            Capability {
                practice_area: "Tech".to_string(),
                capacity: 35.0,
                consultants: Some(vec!["a@x.com".to_string()]),
                ..Default::default()
            },
        );
        snapshot.insert(
            "Audit",
            Capability {
                practice_area: "Fin".to_string(),
                capacity: 15.0,
                ..Default::default()
            },
        );
        controller.dispatch(Action::SnapshotFetched {
            seq,
            result: Ok(snapshot),
        });
        controller
    }

    #[test]
    fn test_starts_loading() {
        let controller = DirectoryController::default();
        assert_eq!(controller.load_state(), LoadState::Loading);
        assert_eq!(controller.view().notice.as_deref(), Some(render::LOADING_NOTICE));
    }

    #[test]
    fn test_criteria_change_rerenders() {
        let mut controller = loaded();
        assert_eq!(controller.view().summary, "Showing 2 of 2 capabilities");

        let effects = controller.dispatch(Action::SetAvailability(Some(Availability::High)));
        assert!(effects.is_empty());
        assert_eq!(controller.view().summary, "Showing 1 of 2 capabilities");
        assert_eq!(controller.view().cards[0].name, "Cloud");
    }

    #[test]
    fn test_clear_filters_restores_defaults() {
        let mut controller = loaded();
        controller.dispatch(Action::SetSearch("cloud".to_string()));
        controller.dispatch(Action::SetPracticeArea(Some("Tech".to_string())));
        controller.dispatch(Action::SetSort(SortKey::CapacityAsc));
        controller.dispatch(Action::ClearFilters);

        assert_eq!(controller.criteria(), &Criteria::default());
        let names: Vec<&str> = controller.view().cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Audit", "Cloud"]);
    }

    #[test]
    fn test_clear_filters_ignores_startup_sort() {
        let mut controller = DirectoryController::new(SortKey::CapacityDesc, DEFAULT_DISMISS_AFTER);
        assert_eq!(controller.criteria().sort, SortKey::CapacityDesc);

        controller.dispatch(Action::SetSort(SortKey::NameDesc));
        controller.dispatch(Action::ClearFilters);
        assert_eq!(controller.criteria().sort, SortKey::NameAsc);
    }

    #[test]
    fn test_filters_survive_refetch() {
        let mut controller = loaded();
        controller.dispatch(Action::SetSearch("aud".to_string()));
        let seq = match controller.dispatch(Action::Refresh).as_slice() {
            [Effect::FetchSnapshot { seq }] => *seq,
            other => panic!("unexpected effects {:?}", other),
        };
        let snapshot = controller.store().get().as_ref().clone();
        controller.dispatch(Action::SnapshotFetched {
            seq,
            result: Ok(snapshot),
        });
        assert_eq!(controller.criteria().search, "aud");
        assert_eq!(controller.view().summary, "Showing 1 of 2 capabilities");
    }

    #[test]
    fn test_submit_requires_capability() {
        let mut controller = loaded();
        controller.dispatch(Action::SetEmail("b@x.com".to_string()));
        let effects = controller.dispatch(Action::SubmitRegistration);

        assert!(matches!(effects.as_slice(), [Effect::ScheduleDismiss { .. }]));
        let feedback = controller.view().feedback.as_ref().unwrap();
        assert_eq!(feedback.text, SELECT_CAPABILITY_PROMPT);
        assert_eq!(controller.mutation_state(), MutationState::Idle);
    }

    #[test]
    fn test_submit_issues_register() {
        let mut controller = loaded();
        controller.dispatch(Action::SetEmail(" b@x.com ".to_string()));
        controller.dispatch(Action::SelectCapability("Cloud".to_string()));
        let effects = controller.dispatch(Action::SubmitRegistration);

        assert_eq!(
            effects,
            vec![Effect::Mutate {
                mutation: Mutation::Register,
                capability: "Cloud".to_string(),
                email: "b@x.com".to_string(),
            }]
        );
        assert_eq!(controller.mutation_state(), MutationState::Pending(1));
        assert!(controller.view().pending);
    }

    #[test]
    fn test_success_refetches_and_resets_form() {
        let mut controller = loaded();
        controller.dispatch(Action::SetEmail("b@x.com".to_string()));
        controller.dispatch(Action::SelectCapability("Cloud".to_string()));
        controller.dispatch(Action::SubmitRegistration);

        let effects = controller.dispatch(Action::MutationCompleted {
            mutation: Mutation::Register,
            outcome: Outcome::Success {
                message: "Registered b@x.com for Cloud".to_string(),
            },
        });
        assert!(matches!(effects[0], Effect::ScheduleDismiss { .. }));
        assert!(matches!(effects[1], Effect::FetchSnapshot { .. }));
        assert_eq!(controller.form(), &RegistrationForm::default());
        assert_eq!(controller.mutation_state(), MutationState::Idle);
    }

    #[test]
    fn test_failure_does_not_refetch() {
        let mut controller = loaded();
        let before = controller.store().get();
        let effects = controller.dispatch(Action::MutationCompleted {
            mutation: Mutation::Unregister,
            outcome: Outcome::Failure {
                detail: "Consultant is not registered for this capability".to_string(),
            },
        });
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::ScheduleDismiss { .. }));
        assert_eq!(*controller.store().get(), *before);
        let feedback = controller.view().feedback.as_ref().unwrap();
        assert_eq!(feedback.kind.as_str(), "error");
    }

    #[test]
    fn test_stale_binding_is_ignored() {
        let mut controller = loaded();
        let binding = controller.view().bindings().next().unwrap().clone();
        controller.dispatch(Action::SetSearch("c".to_string()));

        assert!(controller.dispatch(Action::Unregister(binding)).is_empty());

        let fresh = controller.view().bindings().next().unwrap().clone();
        let effects = controller.dispatch(Action::Unregister(fresh));
        assert_eq!(
            effects,
            vec![Effect::Mutate {
                mutation: Mutation::Unregister,
                capability: "Cloud".to_string(),
                email: "a@x.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_older_fetch_cannot_overwrite_newer() {
        let mut controller = loaded();
        let first = controller.dispatch(Action::Refresh);
        let second = controller.dispatch(Action::Refresh);
        let (first, second) = match (first.as_slice(), second.as_slice()) {
            ([Effect::FetchSnapshot { seq: a }], [Effect::FetchSnapshot { seq: b }]) => (*a, *b),
            other => panic!("unexpected effects {:?}", other),
        };

        let newer: Snapshot = [("Fresh".to_string(), Capability::default())].into_iter().collect();
        let older: Snapshot = [("Stale".to_string(), Capability::default())].into_iter().collect();
        controller.dispatch(Action::SnapshotFetched { seq: second, result: Ok(newer) });
        controller.dispatch(Action::SnapshotFetched { seq: first, result: Ok(older) });

        assert!(controller.store().get().contains("Fresh"));
        assert_eq!(controller.view().summary, "Showing 1 of 1 capabilities");
    }

    #[test]
    fn test_fetch_failure_shows_persistent_notice() {
        let mut controller = DirectoryController::default();
        let seq = match controller.start().as_slice() {
            [Effect::FetchSnapshot { seq }] => *seq,
            other => panic!("unexpected effects {:?}", other),
        };
        let effects = controller.dispatch(Action::SnapshotFetched {
            seq,
            result: Err(crate::error::CapdirError::Http("connection refused".to_string())),
        });
        assert!(effects.is_empty());
        assert_eq!(controller.load_state(), LoadState::Failed);
        assert_eq!(controller.view().notice.as_deref(), Some(render::LOAD_FAILED_NOTICE));
        assert!(controller.view().feedback.is_none());
    }

    fn refresh(controller: &mut DirectoryController) -> u64 {
        match controller.dispatch(Action::Refresh).as_slice() {
            [Effect::FetchSnapshot { seq }] => *seq,
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn test_refetch_failure_keeps_last_snapshot() {
        let mut controller = loaded();
        let seq = refresh(&mut controller);
        let effects = controller.dispatch(Action::SnapshotFetched {
            seq,
            result: Err(crate::error::CapdirError::Http("connection refused".to_string())),
        });

        assert!(matches!(effects.as_slice(), [Effect::ScheduleDismiss { .. }]));
        assert_eq!(controller.load_state(), LoadState::Loaded);
        let feedback = controller.view().feedback.as_ref().unwrap();
        assert_eq!(feedback.text, render::LOAD_FAILED_NOTICE);
        assert_eq!(feedback.kind.as_str(), "error");

        controller.dispatch(Action::SetSearch("clo".to_string()));
        assert_eq!(controller.view().summary, "Showing 1 of 2 capabilities");
        assert!(controller.view().notice.is_none());
        assert_eq!(controller.view().cards.len(), 1);
        assert_eq!(controller.view().cards[0].name, "Cloud");
    }

    #[test]
    fn test_older_success_cannot_follow_newer_failure() {
        let mut controller = loaded();
        let older = refresh(&mut controller);
        let newer = refresh(&mut controller);
        let applied = controller.store().loaded_seq();

        controller.dispatch(Action::SnapshotFetched {
            seq: newer,
            result: Err(crate::error::CapdirError::Timeout {
                duration: Duration::from_secs(30),
            }),
        });
        let stale: Snapshot = [("Stale".to_string(), Capability::default())].into_iter().collect();
        let effects = controller.dispatch(Action::SnapshotFetched {
            seq: older,
            result: Ok(stale),
        });

        assert!(effects.is_empty());
        assert_eq!(controller.store().loaded_seq(), applied);
        assert!(!controller.store().get().contains("Stale"));
        assert_eq!(controller.view().summary, "Showing 2 of 2 capabilities");
    }

    #[test]
    fn test_initial_failure_ignores_older_success() {
        let mut controller = DirectoryController::default();
        controller.start();
        let older = refresh(&mut controller);
        let newer = refresh(&mut controller);
        controller.dispatch(Action::SnapshotFetched {
            seq: newer,
            result: Err(crate::error::CapdirError::Http("connection refused".to_string())),
        });
        controller.dispatch(Action::SnapshotFetched {
            seq: older,
            result: Ok(Snapshot::new()),
        });
        assert_eq!(controller.load_state(), LoadState::Failed);
        assert_eq!(controller.store().loaded_seq(), 0);
    }

    #[test]
    fn test_dismiss_only_hides_matching_generation() {
        let mut controller = loaded();
        let first = controller.dispatch(Action::SubmitRegistration);
        controller.dispatch(Action::SelectCapability("Cloud".to_string()));
        let second = controller.dispatch(Action::SubmitRegistration);
        let gen_of = |effects: &[Effect]| match effects {
            [Effect::ScheduleDismiss { generation, .. }] => *generation,
            other => panic!("unexpected effects {:?}", other),
        };
        let (first, second) = (gen_of(&first), gen_of(&second));

        controller.dispatch(Action::DismissFeedback { generation: first });
        assert_eq!(
            controller.view().feedback.as_ref().unwrap().text,
            ENTER_EMAIL_PROMPT
        );
        controller.dispatch(Action::DismissFeedback { generation: second });
        assert!(controller.view().feedback.is_none());
    }
}
