use crate::models::Country;
use crate::services::countries::{errors::CountryError, service::CountrySource};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MockCountrySource {
    pub countries: Vec<Country>,
    pub fail: bool,
    pub fetches: AtomicUsize,
    /// When set, the fetch waits for a notification before answering.
    pub hold: Option<Arc<Notify>>,
}

#[allow(dead_code)]
impl MockCountrySource {
    pub fn with_names(names: &[&str]) -> Self {
        MockCountrySource {
            countries: names.iter().map(|name| Country::new(*name)).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        MockCountrySource {
            fail: true,
            ..Default::default()
        }
    }

    pub fn held(mut self, gate: Arc<Notify>) -> Self {
        self.hold = Some(gate);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CountrySource for MockCountrySource {
    async fn fetch_countries(&self) -> Result<Vec<Country>, CountryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = self.hold.as_ref() {
            gate.notified().await;
        }

        if self.fail {
            Err(CountryError::InvalidResponse("mock failure".into()))
        } else {
            Ok(self.countries.clone())
        }
    }
}
