use crate::models::Country;
use crate::services::countries::errors::CountryError;
use async_trait::async_trait;

#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<Country>, CountryError>;
}
