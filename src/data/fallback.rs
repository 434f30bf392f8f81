//! Live "today" values from the district feature service.
//!
//! The bulk workbook usually lags a day behind; this query returns the current 7-day
//! incidence for every district and is used only to fill today's slot.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::data::fetch::Fetch;
use crate::error::AppError;

/// Feature query for all districts: name (`GEN`), kind (`BEZ`) and `cases7_per_100k`.
pub const FALLBACK_URL: &str = "https://services7.arcgis.com/mOBPykOjAyBO2ZKk/arcgis/rest/services/RKI_Landkreisdaten/FeatureServer/0/query?where=1%3D1&outFields=GEN%2CBEZ%2Ccases7_per_100k&returnGeometry=false&f=json";

/// Today's value per caller region; `None` when no feature matched.
pub type TodayValues = BTreeMap<String, Option<f64>>;

#[derive(Debug, Deserialize)]
struct FeatureResponse {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    attributes: Attributes,
}

#[derive(Debug, Deserialize)]
struct Attributes {
    #[serde(rename = "GEN", default)]
    name: Option<String>,
    #[serde(rename = "BEZ", default)]
    kind: Option<String>,
    #[serde(default)]
    cases7_per_100k: Option<f64>,
}

/// Query the feature service and pick today's value for each region.
pub fn fetch_today(fetcher: &dyn Fetch, url: &str, regions: &[String]) -> Result<TodayValues, AppError> {
    let body = fetcher.fetch(url)?;
    parse_today_values(&body, regions)
}

/// For each region, the rate of the first feature (in response order) whose name contains
/// the region name, compared case-insensitively.
pub fn parse_today_values(body: &[u8], regions: &[String]) -> Result<TodayValues, AppError> {
    let response: FeatureResponse = serde_json::from_slice(body)
        .map_err(|e| AppError::data(format!("Failed to parse fallback response: {e}")))?;

    regions
        .iter()
        .map(|region| Ok::<_, AppError>((region.clone(), value_for_region(&response.features, region)?)))
        .collect()
}

fn value_for_region(features: &[Feature], region: &str) -> Result<Option<f64>, AppError> {
    if region.is_empty() {
        return Ok(None);
    }
    let needle = region.to_lowercase();
    let Some(attributes) = features
        .iter()
        .map(|feature| &feature.attributes)
        .find(|attrs| attrs.name.as_deref().is_some_and(|name| name.to_lowercase().contains(&needle)))
    else {
        return Ok(None);
    };

    let value = attributes.cases7_per_100k.ok_or_else(|| {
        AppError::data(format!(
            "Fallback feature for '{region}' has no cases7_per_100k value."
        ))
    })?;
    tracing::debug!(
        region,
        name = attributes.name.as_deref().unwrap_or_default(),
        kind = attributes.kind.as_deref().unwrap_or_default(),
        value,
        "fallback feature matched"
    );
    Ok(Some(value))
}
