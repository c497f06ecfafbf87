use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{Country, Field, SignupPayload, SignupValues, UserType};

pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PASSWORD_MIN_LENGTH_MESSAGE: &str = "Password must be at least 6 characters";

pub fn required_message(field: Field) -> String {
    format!("{} is required", field.label())
}

/// Per-field validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: Field, message: String) {
        self.errors.entry(field).or_insert(message);
    }
}

fn join_messages(errors: &BTreeMap<Field, String>) -> String {
    let messages: Vec<&str> = errors.values().map(String::as_str).collect();
    messages.join("; ")
}

/// Checks every field and builds the payload when all of them pass.
pub fn validate(values: &SignupValues) -> Result<SignupPayload, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for field in Field::ALL {
        if values.get(field).is_empty() {
            errors.insert(field, required_message(field));
        }
    }

    // Anything other than one of the offered options counts as no selection.
    let user_type = values.user_type.parse::<UserType>().ok();
    if user_type.is_none() {
        errors.insert(Field::UserType, required_message(Field::UserType));
    }

    if !values.password.is_empty() && values.password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.insert(Field::Password, PASSWORD_MIN_LENGTH_MESSAGE.to_string());
    }

    match user_type {
        Some(user_type) if errors.is_empty() => Ok(SignupPayload {
            user_type,
            first_name: values.first_name.clone(),
            last_name: values.last_name.clone(),
            username: values.username.clone(),
            email: values.email.clone(),
            password: values.password.clone(),
            country: Country::new(values.country.clone()),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> SignupValues {
        SignupValues {
            user_type: "service_provider".into(),
            first_name: "Mary".into(),
            last_name: "Jackson".into(),
            username: "mjackson".into(),
            email: "mary@example.com".into(),
            password: "windtunnel".into(),
            country: "United States".into(),
        }
    }

    #[test]
    fn complete_values_build_payload() {
        let payload = validate(&complete()).expect("valid");

        assert_eq!(payload.user_type, UserType::ServiceProvider);
        assert_eq!(payload.username, "mjackson");
        assert_eq!(payload.country, Country::new("United States"));
    }

    #[test]
    fn every_empty_field_is_reported() {
        let errors = validate(&SignupValues::default()).unwrap_err();

        assert_eq!(errors.len(), Field::ALL.len());
        assert_eq!(errors.get(Field::UserType), Some("User Type is required"));
        assert_eq!(errors.get(Field::FirstName), Some("First Name is required"));
        assert_eq!(errors.get(Field::LastName), Some("Last Name is required"));
        assert_eq!(errors.get(Field::Username), Some("Username is required"));
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
        assert_eq!(errors.get(Field::Country), Some("Country is required"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), Field::ALL.to_vec());
    }

    #[test]
    fn each_missing_field_alone_blocks_submission() {
        for field in Field::ALL {
            let mut values = complete();
            values.set(field, "");

            let errors = validate(&values).unwrap_err();

            assert_eq!(errors.len(), 1, "{field}");
            assert_eq!(errors.get(field), Some(required_message(field).as_str()));
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let mut values = complete();
        values.password = "abc12".into();

        let errors = validate(&values).unwrap_err();

        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn six_character_password_passes() {
        let mut values = complete();
        values.password = "abc123".into();

        assert!(validate(&values).is_ok());
    }

    #[test]
    fn password_length_counts_characters() {
        let mut values = complete();
        values.password = "ééééé".into();
        assert!(validate(&values).is_err());

        values.password = "éééééé".into();
        assert!(validate(&values).is_ok());
    }

    #[test]
    fn unknown_user_type_counts_as_missing() {
        let mut values = complete();
        values.user_type = "astronaut".into();

        let errors = validate(&values).unwrap_err();

        assert_eq!(errors.get(Field::UserType), Some("User Type is required"));
    }

    #[test]
    fn display_lists_messages_in_form_order() {
        let mut values = complete();
        values.email = String::new();
        values.password = "pw".into();

        let errors = validate(&values).unwrap_err();

        assert_eq!(
            errors.to_string(),
            "Email is required; Password must be at least 6 characters"
        );
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        let mut values = complete();
        values.first_name = " ".into();

        assert!(validate(&values).is_ok());
    }
}
