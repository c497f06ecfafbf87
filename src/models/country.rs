use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Country {
    pub name: String,
}

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Country { name: name.into() }
    }
}

/// One entry of the REST Countries `/v3.1/all` listing. Only the common name
/// is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountry {
    #[serde(default)]
    pub name: Option<ApiCountryName>,
    #[serde(default)]
    pub flags: Option<ApiCountryFlags>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountryName {
    #[serde(default)]
    pub common: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountryFlags {
    #[serde(default)]
    pub png: Option<String>,
}

impl ApiCountry {
    pub fn into_country(self) -> Option<Country> {
        self.name
            .and_then(|name| name.common)
            .filter(|common| !common.is_empty())
            .map(Country::new)
    }
}
