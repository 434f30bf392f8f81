//! Source URLs, with per-source overrides from the environment (or `.env`).

use crate::data::fallback::FALLBACK_URL;

pub const CASE_WORKBOOK_URL: &str = "https://www.rki.de/DE/Content/InfAZ/N/Neuartiges_Coronavirus/Daten/Fallzahlen_Inzidenz_aktualisiert.xlsx?__blob=publicationFile";
pub const STATE_HOSPITALIZATION_URL: &str = "https://raw.githubusercontent.com/robert-koch-institut/COVID-19-Hospitalisierungen_in_Deutschland/master/Aktuell_Deutschland_COVID-19-Hospitalisierungen.csv";
pub const NDS_INDICATORS_URL: &str = "https://www.ms.niedersachsen.de/download/177306/CSV-Tabelle.csv";

pub const ENV_CASE_WORKBOOK: &str = "CORONA_OVERVIEW_CASES_XLSX_URL";
pub const ENV_STATE_HOSPITALIZATION: &str = "CORONA_OVERVIEW_RKI_HOSPITALIZATION_URL";
pub const ENV_NDS_INDICATORS: &str = "CORONA_OVERVIEW_NDS_URL";
pub const ENV_FALLBACK: &str = "CORONA_OVERVIEW_FALLBACK_URL";
pub const ENV_REGIONAL_INCIDENCE: &str = "CORONA_OVERVIEW_REGIONAL_CSV_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    pub case_workbook: String,
    pub state_hospitalization: String,
    pub nds_indicators: String,
    pub fallback: String,
    /// When set, case incidence comes from this CSV instead of the workbook.
    pub regional_incidence: Option<String>,
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            case_workbook: CASE_WORKBOOK_URL.to_string(),
            state_hospitalization: STATE_HOSPITALIZATION_URL.to_string(),
            nds_indicators: NDS_INDICATORS_URL.to_string(),
            fallback: FALLBACK_URL.to_string(),
            regional_incidence: None,
        }
    }
}

impl SourceUrls {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            case_workbook: get(ENV_CASE_WORKBOOK).unwrap_or(defaults.case_workbook),
            state_hospitalization: get(ENV_STATE_HOSPITALIZATION).unwrap_or(defaults.state_hospitalization),
            nds_indicators: get(ENV_NDS_INDICATORS).unwrap_or(defaults.nds_indicators),
            fallback: get(ENV_FALLBACK).unwrap_or(defaults.fallback),
            regional_incidence: get(ENV_REGIONAL_INCIDENCE),
        }
    }
}
