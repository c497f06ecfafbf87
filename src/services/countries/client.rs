use crate::models::{country::ApiCountry, Country};
use crate::services::countries::{errors::CountryError, service::CountrySource};
use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;

/// Reads the country list from the REST Countries API.
#[derive(Clone)]
pub struct RestCountriesClient {
    pub client: Client,
    pub url: String,
}

impl RestCountriesClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        RestCountriesClient {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    async fn fetch_countries(&self) -> Result<Vec<Country>, CountryError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status =
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Err(CountryError::Status(status));
        }

        let body = response.text().await?;
        let entries: Vec<ApiCountry> = serde_json::from_str(&body)
            .map_err(|err| CountryError::InvalidResponse(err.to_string()))?;

        Ok(entries
            .into_iter()
            .filter_map(ApiCountry::into_country)
            .collect())
    }
}
