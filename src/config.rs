use std::env;

pub const DEFAULT_SIGNUP_ENDPOINT_URL: &str = "https://django-dev.aakscience.com/signup/";
pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1/all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub signup_endpoint_url: String,
    pub countries_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            signup_endpoint_url: DEFAULT_SIGNUP_ENDPOINT_URL.to_string(),
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok(); // Load .env file

        let signup_endpoint_url = env_or_default("SIGNUP_ENDPOINT_URL", DEFAULT_SIGNUP_ENDPOINT_URL);
        let countries_url = env_or_default("COUNTRIES_URL", DEFAULT_COUNTRIES_URL);

        Config {
            signup_endpoint_url,
            countries_url,
        }
    }
}
