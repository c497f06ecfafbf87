pub mod config;
pub mod form;
pub mod models;
pub mod services;
pub mod workflow;

pub use form::SignupForm;
pub use workflow::SubmissionWorkflow;
