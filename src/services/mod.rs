pub mod countries;
pub mod signup;
