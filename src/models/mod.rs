pub mod country;
pub mod signup;

pub use country::Country;
pub use signup::{Field, SignupPayload, SignupValues, UserType};
