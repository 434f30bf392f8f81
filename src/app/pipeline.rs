//! The data pipeline shared by the binary and the tests:
//! fetch primaries -> parse -> today fallback -> merged `Overview`.
//!
//! The three primary sources are independent, so they are fetched in parallel. Parsing
//! only starts once all of them are in, and the fallback is applied strictly after the
//! case-incidence source has been parsed.

use std::borrow::Cow;

use crate::data::{Fetch, SourceUrls, fetch_today};
use crate::domain::{OverviewConfig, RegionSeries};
use crate::error::AppError;
use crate::io::feeds::{extract_nds_indicators, extract_regional_incidence, extract_state_hospitalization};
use crate::io::workbook::extract_case_incidence;
use crate::reconcile::{Overview, apply_today_fallback};

/// Run the whole pipeline against `fetcher`.
pub fn run_overview(config: &OverviewConfig, urls: &SourceUrls, fetcher: &dyn Fetch) -> Result<Overview, AppError> {
    // 1) Fetch the primary sources.
    let case_url = urls.regional_incidence.as_deref().unwrap_or(&urls.case_workbook);
    let (case_bytes, (nds_bytes, state_bytes)) = rayon::join(
        || fetcher.fetch(case_url),
        || {
            rayon::join(
                || fetcher.fetch(&urls.nds_indicators),
                || fetcher.fetch(&urls.state_hospitalization),
            )
        },
    );
    let (case_bytes, nds_bytes, state_bytes) = (case_bytes?, nds_bytes?, state_bytes?);

    // 2) Parse them.
    let mut diagnostics = Vec::new();
    let mut case_incidence = match urls.regional_incidence {
        Some(_) => extract_regional_incidence(&decode(&case_bytes, case_url), &config.regions)?,
        None => {
            let extract = extract_case_incidence(&case_bytes, &config.regions)
                .map_err(|e| e.in_source("case incidence workbook"))?;
            tracing::debug!(sheet = ?extract.sheet, "case incidence workbook read");
            diagnostics.extend(extract.diagnostics);
            extract.series
        }
    };
    let nds = extract_nds_indicators(&decode(&nds_bytes, &urls.nds_indicators))?;
    let state_hospitalization =
        extract_state_hospitalization(&decode(&state_bytes, &urls.state_hospitalization))?;
    tracing::debug!(
        regions = case_incidence.len(),
        nds_days = nds.len(),
        state_days = state_hospitalization.len(),
        "primary sources parsed"
    );

    // 3) Fill today's gaps from the live service; failure here is never fatal.
    if let Some(message) = apply_fallback(&mut case_incidence, config, urls, fetcher) {
        diagnostics.push(message);
    }

    Ok(Overview::new(
        config.regions.clone(),
        config.display_dates(),
        case_incidence,
        state_hospitalization,
        nds,
    )
    .with_diagnostics(diagnostics))
}

/// Returns a diagnostic if the fallback could not be used.
fn apply_fallback(
    case_incidence: &mut RegionSeries,
    config: &OverviewConfig,
    urls: &SourceUrls,
    fetcher: &dyn Fetch,
) -> Option<String> {
    match fetch_today(fetcher, &urls.fallback, &config.regions) {
        Ok(today_values) => {
            let applied = apply_today_fallback(case_incidence, &config.regions, config.today, &today_values);
            tracing::debug!(applied, "today fallback applied");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "error while loading data from web service");
            Some(format!("error while loading data from web service: {err}"))
        }
    }
}

/// Invalid UTF-8 is replaced, so labels in such a feed may stop matching; log it.
fn decode<'a>(bytes: &'a [u8], url: &str) -> Cow<'a, str> {
    let text = String::from_utf8_lossy(bytes);
    if matches!(text, Cow::Owned(_)) {
        tracing::warn!(url, "source is not valid UTF-8; invalid bytes replaced");
    }
    text
}
