//! Country and neighbor relation models
//!
//! Field names on the wire (`countryID`, `neighborId`) are kept exactly as
//! existing clients send and expect them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for inbound country data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least one country is required")]
    EmptyBatch,

    #[error("Country at index {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },
}

/// Stored country record.
///
/// `country_id` is assigned server-side on creation and never changes.
/// `population`, `area` and `subregion` are only present when the creator
/// supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "countryID")]
    pub country_id: String,
    pub name: String,
    pub capital: String,
    pub region: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
}

/// Country as submitted by a caller, before validation.
///
/// Any caller-supplied `countryID` is ignored: unknown fields are dropped
/// during deserialization and the repository assigns a fresh identifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryDraft {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub currency: Option<String>,
    #[serde(default)]
    pub population: Option<f64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub subregion: Option<String>,
}

impl CountryDraft {
    /// Validate the draft and turn it into a storable [`Country`].
    ///
    /// `index` is the draft's position in its batch and is only used for
    /// error reporting. Blank (whitespace-only) required fields count as
    /// missing.
    pub fn into_country(
        self,
        index: usize,
        country_id: String,
    ) -> Result<Country, ValidationError> {
        Ok(Country {
            country_id,
            name: required(self.name, index, "name")?,
            capital: required(self.capital, index, "capital")?,
            region: required(self.region, index, "region")?,
            currency: required(self.currency, index, "currency")?,
            population: self.population,
            area: self.area,
            subregion: self.subregion,
        })
    }
}

fn required(
    value: Option<String>,
    index: usize,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField { index, field }),
    }
}

/// Directed neighbor relation `(country_id -> neighbor_id)`.
///
/// The record carries no payload; its existence is the relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRelation {
    #[serde(rename = "countryID")]
    pub country_id: String,
    #[serde(rename = "neighborId")]
    pub neighbor_id: String,
}

impl NeighborRelation {
    pub fn new(country_id: impl Into<String>, neighbor_id: impl Into<String>) -> Self {
        Self {
            country_id: country_id.into(),
            neighbor_id: neighbor_id.into(),
        }
    }
}

/// Public projection of a neighboring country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborCountry {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub capital: String,
    pub region: String,
}

impl From<Country> for NeighborCountry {
    fn from(country: Country) -> Self {
        Self {
            id: country.country_id,
            name: country.name,
            currency: country.currency,
            capital: country.capital,
            region: country.region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> CountryDraft {
        CountryDraft {
            name: Some("Alpha".to_string()),
            capital: Some("Alpha City".to_string()),
            region: Some("Europe".to_string()),
            currency: Some("ALP".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_ignores_caller_supplied_id() {
        let draft: CountryDraft = serde_json::from_value(json!({
            "countryID": "caller-chosen",
            "name": "Alpha",
            "capital": "Alpha City",
            "region": "Europe",
            "currency": "ALP"
        }))
        .unwrap();

        let country = draft.into_country(0, "server-id".to_string()).unwrap();
        assert_eq!(country.country_id, "server-id");
    }

    #[test]
    fn test_population_accepts_integers_and_floats() {
        let drafts: Vec<CountryDraft> = serde_json::from_value(json!([
            { "name": "Germany", "population": 83240000.0 },
            { "name": "Austria", "population": 8917000 }
        ]))
        .unwrap();

        assert_eq!(drafts[0].population, Some(83_240_000.0));
        assert_eq!(drafts[1].population, Some(8_917_000.0));
    }

    #[test]
    fn test_blank_required_field_is_missing() {
        let mut blank = draft();
        blank.capital = Some("   ".to_string());

        let err = blank.into_country(3, "id".to_string()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                index: 3,
                field: "capital"
            }
        );
    }

    #[test]
    fn test_country_serializes_wire_names_and_skips_absent_optionals() {
        let country = draft().into_country(0, "c-1".to_string()).unwrap();
        let value = serde_json::to_value(&country).unwrap();

        assert_eq!(value["countryID"], "c-1");
        assert!(value.get("population").is_none());
        assert!(value.get("subregion").is_none());
    }

    #[test]
    fn test_neighbor_projection() {
        let mut alpha = draft().into_country(0, "A".to_string()).unwrap();
        alpha.population = Some(10.0);

        let projected = NeighborCountry::from(alpha);
        let value = serde_json::to_value(&projected).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "A",
                "name": "Alpha",
                "currency": "ALP",
                "capital": "Alpha City",
                "region": "Europe"
            })
        );
    }
}
