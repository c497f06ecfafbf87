pub mod client;
pub mod errors;
pub mod mock_signup;
pub mod service;

pub use client::SignupClient;
pub use errors::SignupError;
#[allow(unused_imports)]
pub use mock_signup::MockSignupService;
pub use service::SignupService;
