//! Signup submission state machine.
//!
//! `idle -> pending -> succeeded | failed`, and back to `idle` on reset.
//! Listeners registered with [`SubmissionWorkflow::subscribe`] are called
//! with the new state after every transition, in transition order. A
//! transition made from inside a listener is queued and delivered after the
//! current one has reached every listener.

pub mod state;

use crate::models::SignupPayload;
use crate::services::signup::SignupService;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use state::{SubmissionFlags, SubmissionState};

pub type Listener = Arc<dyn Fn(&SubmissionState) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("a signup request is already in flight")]
    InFlight,
}

#[derive(Default)]
struct Inner {
    state: SubmissionState,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    // Bumped on every start and reset; a response only lands if its attempt
    // is still the current one.
    attempt: u64,
    // Transitions not yet delivered, and whether some caller is delivering.
    queued: VecDeque<SubmissionState>,
    notifying: bool,
}

impl Inner {
    /// Records a transition. Returns true if the caller must deliver the
    /// queue.
    fn transition(&mut self, next: SubmissionState) -> bool {
        self.state = next.clone();
        self.queued.push_back(next);
        !std::mem::replace(&mut self.notifying, true)
    }

    fn listeners(&self) -> Vec<Listener> {
        self.listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }
}

pub struct SubmissionWorkflow {
    service: Arc<dyn SignupService>,
    inner: Mutex<Inner>,
}

impl fmt::Debug for SubmissionWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("SubmissionWorkflow")
            .field("state", &inner.state)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl SubmissionWorkflow {
    pub fn new(service: Arc<dyn SignupService>) -> Self {
        SubmissionWorkflow {
            service,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn drain(&self) {
        loop {
            let (state, listeners) = {
                let mut inner = self.lock();
                match inner.queued.pop_front() {
                    Some(state) => (state, inner.listeners()),
                    None => {
                        inner.notifying = false;
                        return;
                    }
                }
            };
            for listener in listeners {
                listener(&state);
            }
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    pub fn flags(&self) -> SubmissionFlags {
        self.lock().state.flags()
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SubmissionState) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = ListenerId(inner.next_listener);
        inner.next_listener += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Returns false if the listener was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.listeners.len() != before
    }

    fn begin(&self) -> Result<u64, WorkflowError> {
        let (attempt, deliver) = {
            let mut inner = self.lock();
            if inner.state.loading() {
                return Err(WorkflowError::InFlight);
            }
            inner.attempt += 1;
            (inner.attempt, inner.transition(SubmissionState::Pending))
        };
        if deliver {
            self.drain();
        }
        Ok(attempt)
    }

    fn settle(&self, attempt: u64, next: SubmissionState) -> bool {
        let deliver = {
            let mut inner = self.lock();
            if inner.attempt != attempt {
                return false;
            }
            inner.transition(next)
        };
        if deliver {
            self.drain();
        }
        true
    }

    /// Issues exactly one signup request and waits for it to finish.
    ///
    /// Legal from `idle` or a settled state. Returns the state this attempt
    /// settled into. If the workflow was reset while the request was in
    /// flight, the outcome is returned but not applied.
    pub async fn start(&self, payload: SignupPayload) -> Result<SubmissionState, WorkflowError> {
        let attempt = self.begin()?;
        info!(
            username = %payload.username,
            user_type = %payload.user_type,
            "submitting signup"
        );

        let outcome = match self.service.signup(&payload).await {
            Ok(_) => {
                info!(username = %payload.username, "signup succeeded");
                SubmissionState::Succeeded
            }
            Err(err) => {
                warn!(username = %payload.username, error = %err, "signup failed");
                SubmissionState::Failed(err.user_message())
            }
        };

        if !self.settle(attempt, outcome.clone()) {
            debug!("workflow was reset while the request was in flight; discarding outcome");
        }
        Ok(outcome)
    }

    /// Forces the workflow back to idle from any state.
    pub fn reset(&self) {
        let deliver = {
            let mut inner = self.lock();
            inner.attempt += 1;
            if inner.state == SubmissionState::Idle {
                return;
            }
            inner.transition(SubmissionState::Idle)
        };
        if deliver {
            self.drain();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, UserType};
    use crate::services::signup::MockSignupService;
    use http::StatusCode;
    use tokio::sync::Notify;

    fn payload() -> SignupPayload {
        SignupPayload {
            user_type: UserType::Investor,
            first_name: "Katherine".into(),
            last_name: "Johnson".into(),
            username: "kjohnson".into(),
            email: "katherine@example.com".into(),
            password: "orbit1962".into(),
            country: Country::new("United States"),
        }
    }

    fn record(workflow: &SubmissionWorkflow) -> Arc<Mutex<Vec<SubmissionState>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        workflow.subscribe(move |state| sink.lock().unwrap().push(state.clone()));
        seen
    }

    #[tokio::test]
    async fn success_goes_idle_pending_succeeded() {
        let service = Arc::new(MockSignupService::succeeding());
        let workflow = SubmissionWorkflow::new(service.clone());
        let seen = record(&workflow);

        assert_eq!(workflow.state(), SubmissionState::Idle);
        let settled = workflow.start(payload()).await.unwrap();

        assert_eq!(settled, SubmissionState::Succeeded);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![SubmissionState::Pending, SubmissionState::Succeeded]
        );
        let flags = workflow.flags();
        assert!(!flags.loading);
        assert!(flags.success);
        assert_eq!(flags.error, None);
        assert_eq!(service.calls(), 1);
        assert_eq!(service.submitted.lock().unwrap()[0], payload());
    }

    #[tokio::test]
    async fn server_message_becomes_error() {
        let service = Arc::new(MockSignupService::rejecting(
            StatusCode::BAD_REQUEST,
            Some("username taken"),
        ));
        let workflow = SubmissionWorkflow::new(service);

        workflow.start(payload()).await.unwrap();

        assert_eq!(
            workflow.state(),
            SubmissionState::Failed("username taken".into())
        );
        assert_eq!(workflow.flags().error.as_deref(), Some("username taken"));
        assert!(!workflow.flags().success);
    }

    #[tokio::test]
    async fn rejection_without_message_uses_fallback() {
        let service = Arc::new(MockSignupService::rejecting(
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
        ));
        let workflow = SubmissionWorkflow::new(service);

        workflow.start(payload()).await.unwrap();

        assert_eq!(workflow.state().error(), Some("Signup failed"));
    }

    #[tokio::test]
    async fn unrecognized_failure_is_unknown_error() {
        let service = Arc::new(MockSignupService::failing_unexpectedly("serializer exploded"));
        let workflow = SubmissionWorkflow::new(service);

        workflow.start(payload()).await.unwrap();

        assert_eq!(workflow.state().error(), Some("An unknown error occurred"));
    }

    #[tokio::test]
    async fn start_while_pending_is_rejected() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(MockSignupService::succeeding().held(gate.clone()));
        let workflow = Arc::new(SubmissionWorkflow::new(service.clone()));

        let first = tokio::spawn({
            let workflow = workflow.clone();
            async move { workflow.start(payload()).await }
        });
        while !workflow.state().loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            workflow.start(payload()).await,
            Err(WorkflowError::InFlight)
        );

        gate.notify_one();
        assert_eq!(first.await.unwrap(), Ok(SubmissionState::Succeeded));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn restart_from_failed_clears_error() {
        let service = Arc::new(MockSignupService::rejecting(
            StatusCode::CONFLICT,
            Some("email taken"),
        ));
        let workflow = SubmissionWorkflow::new(service);
        workflow.start(payload()).await.unwrap();

        let seen = record(&workflow);
        workflow.start(payload()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], SubmissionState::Pending);
        assert_eq!(seen[0].error(), None);
        assert_eq!(seen[1], SubmissionState::Failed("email taken".into()));
    }

    #[tokio::test]
    async fn reset_returns_to_idle_from_every_state() {
        let idle = SubmissionFlags {
            loading: false,
            error: None,
            success: false,
        };

        let workflow = SubmissionWorkflow::new(Arc::new(MockSignupService::succeeding()));
        workflow.reset();
        assert_eq!(workflow.flags(), idle);

        workflow.start(payload()).await.unwrap();
        workflow.reset();
        assert_eq!(workflow.flags(), idle);

        let workflow = SubmissionWorkflow::new(Arc::new(MockSignupService::rejecting(
            StatusCode::BAD_REQUEST,
            Some("bad"),
        )));
        workflow.start(payload()).await.unwrap();
        workflow.reset();
        assert_eq!(workflow.flags(), idle);
    }

    #[tokio::test]
    async fn reset_while_pending_discards_late_outcome() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(MockSignupService::succeeding().held(gate.clone()));
        let workflow = Arc::new(SubmissionWorkflow::new(service));

        let attempt = tokio::spawn({
            let workflow = workflow.clone();
            async move { workflow.start(payload()).await }
        });
        while !workflow.state().loading() {
            tokio::task::yield_now().await;
        }

        workflow.reset();
        assert_eq!(workflow.state(), SubmissionState::Idle);

        gate.notify_one();
        assert_eq!(attempt.await.unwrap(), Ok(SubmissionState::Succeeded));
        assert_eq!(workflow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn reset_from_idle_does_not_notify() {
        let workflow = SubmissionWorkflow::new(Arc::new(MockSignupService::succeeding()));
        let seen = record(&workflow);

        workflow.reset();

        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_from_inside_a_listener_is_delivered_last() {
        let workflow = Arc::new(SubmissionWorkflow::new(Arc::new(
            MockSignupService::succeeding(),
        )));
        let resetter_seen = Arc::new(Mutex::new(Vec::new()));
        let sink = resetter_seen.clone();
        let handle = Arc::downgrade(&workflow);
        workflow.subscribe(move |state| {
            sink.lock().unwrap().push(state.clone());
            if state.success() {
                if let Some(workflow) = handle.upgrade() {
                    workflow.reset();
                }
            }
        });
        let later_seen = record(&workflow);

        workflow.start(payload()).await.unwrap();

        let expected = vec![
            SubmissionState::Pending,
            SubmissionState::Succeeded,
            SubmissionState::Idle,
        ];
        assert_eq!(workflow.state(), SubmissionState::Idle);
        assert_eq!(*resetter_seen.lock().unwrap(), expected);
        assert_eq!(*later_seen.lock().unwrap(), expected);
        assert_eq!(
            later_seen.lock().unwrap().last(),
            Some(&workflow.state())
        );
    }

    #[tokio::test]
    async fn unsubscribed_listener_is_not_called() {
        let workflow = SubmissionWorkflow::new(Arc::new(MockSignupService::succeeding()));
        let seen = Arc::new(Mutex::new(0usize));
        let sink = seen.clone();
        let id = workflow.subscribe(move |_| *sink.lock().unwrap() += 1);

        assert!(workflow.unsubscribe(id));
        assert!(!workflow.unsubscribe(id));
        workflow.start(payload()).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), 0);
    }
}
