//! The signup form controller.
//!
//! Owns the field values and their validation errors, loads the country
//! choices once per mount and hands valid payloads to the
//! [`SubmissionWorkflow`]. Dropping the form is the unmount: it resets the
//! workflow so a later mount starts from idle.

pub mod validation;

use crate::models::{Country, Field, SignupValues, UserType};
use crate::services::countries::CountrySource;
use crate::workflow::{SubmissionState, SubmissionWorkflow, WorkflowError};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

pub use validation::{validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed validation; nothing was sent.
    Invalid(ValidationErrors),
    /// A submission is already in flight.
    Busy,
    /// The request was sent and settled into this state.
    Submitted(SubmissionState),
}

pub struct SignupForm {
    values: SignupValues,
    errors: ValidationErrors,
    countries: Arc<RwLock<Vec<Country>>>,
    country_fetch: Option<JoinHandle<()>>,
    workflow: Arc<SubmissionWorkflow>,
}

impl SignupForm {
    /// Mounts the form and starts the one-time country fetch in the
    /// background. Must be called from within a tokio runtime.
    pub fn mount(workflow: Arc<SubmissionWorkflow>, source: Arc<dyn CountrySource>) -> Self {
        let countries = Arc::new(RwLock::new(Vec::new()));
        let target = Arc::downgrade(&countries);

        let country_fetch = tokio::spawn(async move {
            match source.fetch_countries().await {
                Ok(fetched) => match target.upgrade() {
                    Some(list) => {
                        debug!(count = fetched.len(), "loaded countries");
                        *list.write().unwrap_or_else(PoisonError::into_inner) = fetched;
                    }
                    None => debug!("form unmounted before the country list arrived"),
                },
                Err(err) => error!(error = %err, "Error fetching countries"),
            }
        });

        SignupForm {
            values: SignupValues::default(),
            errors: ValidationErrors::default(),
            countries,
            country_fetch: Some(country_fetch),
            workflow,
        }
    }

    /// Waits for the country fetch started at mount to finish. The list stays
    /// empty if the fetch failed.
    pub async fn countries_ready(&mut self) {
        if let Some(handle) = self.country_fetch.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "country fetch task did not complete");
            }
        }
    }

    pub fn countries(&self) -> Vec<Country> {
        self.countries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn values(&self) -> &SignupValues {
        &self.values
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value);
    }

    pub fn set_user_type(&mut self, user_type: UserType) {
        self.values.set(Field::UserType, user_type.as_str());
    }

    /// Only names from the fetched list can be chosen. Returns whether the
    /// selection was taken.
    pub fn select_country(&mut self, name: &str) -> bool {
        let known = self
            .countries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|country| country.name == name);
        if known {
            self.values.set(Field::Country, name);
        }
        known
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn state(&self) -> SubmissionState {
        self.workflow.state()
    }

    pub fn workflow(&self) -> &Arc<SubmissionWorkflow> {
        &self.workflow
    }

    /// Validates the form and, when every field passes, runs the submission
    /// to completion.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.workflow.state().loading() {
            return SubmitOutcome::Busy;
        }

        match validate(&self.values) {
            Err(errors) => {
                debug!(invalid = errors.len(), "signup form has invalid fields");
                self.errors = errors.clone();
                SubmitOutcome::Invalid(errors)
            }
            Ok(payload) => {
                self.errors = ValidationErrors::default();
                match self.workflow.start(payload).await {
                    Ok(state) => SubmitOutcome::Submitted(state),
                    Err(WorkflowError::InFlight) => SubmitOutcome::Busy,
                }
            }
        }
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for SignupForm {
    fn drop(&mut self) {
        // The country fetch is left running; its result has nowhere to land.
        self.workflow.reset();
    }
}
