pub mod client;
pub mod errors;
pub mod mock_countries;
pub mod service;

pub use client::RestCountriesClient;
pub use errors::CountryError;
#[allow(unused_imports)]
pub use mock_countries::MockCountrySource;
pub use service::CountrySource;
