//! Effect runtime
//!
//! Runs the controller's effects as spawned tokio tasks and reports each
//! completion back as an [`Action`] on an unbounded channel. The frontend
//! loop owns the receiving end and the controller, so completions are
//! applied one at a time on a single task.

use crate::controller::{Action, DirectoryController, Effect};
use crate::registry::RegistryClient;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct Runtime {
    client: RegistryClient,
    tx: mpsc::UnboundedSender<Action>,
}

impl Runtime {
    pub fn new(client: RegistryClient) -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { client, tx }, rx)
    }

    pub fn run_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    /// Spawn one effect. Never blocks; no cancellation.
    pub fn run(&self, effect: Effect) {
        let tx = self.tx.clone();
        match effect {
            Effect::FetchSnapshot { seq } => {
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client.fetch_snapshot().await;
                    let _ = tx.send(Action::SnapshotFetched { seq, result });
                });
            }
            Effect::Mutate {
                mutation,
                capability,
                email,
            } => {
                let client = self.client.clone();
                tokio::spawn(async move {
                    let outcome = client.mutate(mutation, &capability, &email).await;
                    let _ = tx.send(Action::MutationCompleted { mutation, outcome });
                });
            }
            Effect::ScheduleDismiss { generation, after } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Action::DismissFeedback { generation });
                });
            }
        }
    }

    /// Dispatch `action` and run whatever it asks for.
    pub fn dispatch(&self, controller: &mut DirectoryController, action: Action) {
        let effects = controller.dispatch(action);
        self.run_all(effects);
    }
}
