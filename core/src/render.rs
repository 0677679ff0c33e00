//! Render model
//!
//! `render` builds the complete visible representation from scratch: summary
//! line, one card per visible capability, and an unregister binding for every
//! consultant shown. Nothing is diffed against the previous view; bindings
//! are stamped with the render epoch so a binding from an older view can be
//! recognized and refused.

use crate::feedback::FeedbackMessage;
use crate::model::{Capability, Snapshot};
use crate::query::{self, Criteria};

pub const LOADING_NOTICE: &str = "Loading capabilities...";
pub const LOAD_FAILED_NOTICE: &str = "Failed to load capabilities. Please try again later.";
pub const NO_RESULTS_NOTICE: &str =
    "No capabilities match your filters. Try adjusting your search criteria.";
pub const NO_CONSULTANTS: &str = "No consultants registered yet";
pub const NOT_SPECIFIED: &str = "Not specified";

/// Where the list area stands with respect to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed,
}

/// Identifies one consultant's unregister control in one specific render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnregisterBinding {
    pub epoch: u64,
    pub capability: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsultantRow {
    pub email: String,
    pub binding: UnregisterBinding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityCard {
    pub name: String,
    pub description: String,
    pub practice_area: String,
    pub industries: String,
    pub capacity: String,
    pub team: String,
    pub consultants: Vec<ConsultantRow>,
}

impl CapabilityCard {
    fn build(epoch: u64, name: &str, capability: &Capability) -> Self {
        let industries = match &capability.industry_verticals {
            Some(list) => list.join(", "),
            None => NOT_SPECIFIED.to_string(),
        };
        let consultants = capability
            .consultants()
            .iter()
            .map(|email| ConsultantRow {
                email: email.clone(),
                binding: UnregisterBinding {
                    epoch,
                    capability: name.to_string(),
                    email: email.clone(),
                },
            })
            .collect();

        Self {
            name: name.to_string(),
            description: capability.description.clone(),
            practice_area: capability.practice_area.clone(),
            industries,
            capacity: format!("{} hours/week available", format_hours(capability.capacity)),
            team: format!("{} consultants", capability.consultant_count()),
            consultants,
        }
    }
}

/// Whole numbers print without a fractional part.
pub fn format_hours(capacity: f64) -> String {
    if capacity.fract() == 0.0 && capacity.abs() < 1e15 {
        format!("{}", capacity as i64)
    } else {
        format!("{}", capacity)
    }
}

/// Everything a frontend needs to draw the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub epoch: u64,
    pub summary: String,
    pub cards: Vec<CapabilityCard>,
    /// Replaces the card list when set.
    pub notice: Option<String>,
    /// Every capability in snapshot order, for the registration picker.
    pub capability_options: Vec<String>,
    pub practice_options: Vec<String>,
    pub industry_options: Vec<String>,
    pub feedback: Option<FeedbackMessage>,
    pub pending: bool,
}

impl View {
    pub fn empty() -> Self {
        Self {
            epoch: 0,
            summary: String::new(),
            cards: Vec::new(),
            notice: Some(LOADING_NOTICE.to_string()),
            capability_options: Vec::new(),
            practice_options: Vec::new(),
            industry_options: Vec::new(),
            feedback: None,
            pending: false,
        }
    }

    /// All unregister bindings in display order.
    pub fn bindings(&self) -> impl Iterator<Item = &UnregisterBinding> {
        self.cards
            .iter()
            .flat_map(|card| card.consultants.iter().map(|row| &row.binding))
    }
}

pub struct RenderInput<'a> {
    pub epoch: u64,
    pub snapshot: &'a Snapshot,
    pub criteria: &'a Criteria,
    pub load_state: LoadState,
    pub feedback: Option<&'a FeedbackMessage>,
    pub pending: bool,
}

pub fn render(input: RenderInput<'_>) -> View {
    let RenderInput {
        epoch,
        snapshot,
        criteria,
        load_state,
        feedback,
        pending,
    } = input;

    let visible = query::apply(snapshot, criteria);
    let summary = format!("Showing {} of {} capabilities", visible.len(), snapshot.len());

    let (cards, notice) = match load_state {
        LoadState::Loading => (Vec::new(), Some(LOADING_NOTICE.to_string())),
        LoadState::Failed => (Vec::new(), Some(LOAD_FAILED_NOTICE.to_string())),
        LoadState::Loaded if visible.is_empty() => {
            (Vec::new(), Some(NO_RESULTS_NOTICE.to_string()))
        }
        LoadState::Loaded => (
            visible
                .iter()
                .map(|(name, capability)| CapabilityCard::build(epoch, name, capability))
                .collect(),
            None,
        ),
    };

    View {
        epoch,
        summary,
        cards,
        notice,
        capability_options: snapshot.names().map(str::to_string).collect(),
        practice_options: snapshot.practice_areas(),
        industry_options: snapshot.industry_verticals(),
        feedback: feedback.cloned(),
        pending,
    }
}
