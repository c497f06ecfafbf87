use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::country::Country;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Researcher,
    Investor,
    InstitutionStaff,
    ServiceProvider,
}

impl UserType {
    pub const ALL: [UserType; 4] = [
        UserType::Researcher,
        UserType::Investor,
        UserType::InstitutionStaff,
        UserType::ServiceProvider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Researcher => "researcher",
            UserType::Investor => "investor",
            UserType::InstitutionStaff => "institution_staff",
            UserType::ServiceProvider => "service_provider",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Researcher => "Researcher",
            UserType::Investor => "Investor",
            UserType::InstitutionStaff => "Institution Staff",
            UserType::ServiceProvider => "Service Provider",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user type '{0}'")]
pub struct UnknownUserType(pub String);

impl FromStr for UserType {
    type Err = UnknownUserType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserType::ALL
            .into_iter()
            .find(|user_type| user_type.as_str() == s)
            .ok_or_else(|| UnknownUserType(s.to_string()))
    }
}

/// Validated signup data, serialized as the body of the signup request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignupPayload {
    pub user_type: UserType,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub country: Country,
}

/// Raw form values as entered. Any of them may be empty until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupValues {
    pub user_type: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub country: String,
}

impl SignupValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::UserType => &self.user_type,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::Country => &self.country,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::UserType => &mut self.user_type,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::Country => &mut self.country,
        };
        *slot = value.into();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    UserType,
    FirstName,
    LastName,
    Username,
    Email,
    Password,
    Country,
}

impl Field {
    /// Form order.
    pub const ALL: [Field; 7] = [
        Field::UserType,
        Field::FirstName,
        Field::LastName,
        Field::Username,
        Field::Email,
        Field::Password,
        Field::Country,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::UserType => "user_type",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::Country => "country",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::UserType => "User Type",
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Username => "Username",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::Country => "Country",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
