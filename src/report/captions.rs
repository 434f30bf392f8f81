//! UI captions for the report, one immutable set per language.

use chrono::Weekday;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    De,
    En,
}

#[derive(Debug, Clone)]
pub struct Captions {
    pub case_incidence: &'static str,
    pub hospitalization_incidence_nds: &'static str,
    pub hospitalization_incidence_rki: &'static str,
    pub intensive_care_beds_percentage_nds: &'static str,
    pub data_from: &'static str,
    pub oclock: &'static str,
    pub data_source: &'static str,
    /// Monday first.
    weekdays: [&'static str; 7],
}

impl Captions {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::De => Self::german(),
            Language::En => Self::english(),
        }
    }

    pub fn german() -> Self {
        Self {
            case_incidence: "7-Tage-Inzidenz (Fälle pro 100.000 Einwohner)",
            hospitalization_incidence_nds: "7-Tage-Hospitalisierungsinzidenz Niedersachsen (Land Niedersachsen)",
            hospitalization_incidence_rki: "7-Tage-Hospitalisierungsinzidenz Niedersachsen (RKI)",
            intensive_care_beds_percentage_nds: "Anteil COVID-19-Patienten an Intensivbetten in Niedersachsen",
            data_from: "Daten vom",
            oclock: "Uhr",
            data_source: "Datenquelle:",
            weekdays: [
                "Montag",
                "Dienstag",
                "Mittwoch",
                "Donnerstag",
                "Freitag",
                "Samstag",
                "Sonntag",
            ],
        }
    }

    pub fn english() -> Self {
        Self {
            case_incidence: "7-day incidence (cases per 100,000 inhabitants)",
            hospitalization_incidence_nds: "7-day hospitalization incidence Lower Saxony (state of Lower Saxony)",
            hospitalization_incidence_rki: "7-day hospitalization incidence Lower Saxony (RKI)",
            intensive_care_beds_percentage_nds: "Share of COVID-19 patients in intensive care beds in Lower Saxony",
            data_from: "Data from",
            oclock: "",
            data_source: "Data source:",
            weekdays: [
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
            ],
        }
    }

    pub fn weekday(&self, day: Weekday) -> &'static str {
        self.weekdays[day.num_days_from_monday() as usize]
    }
}
