//! Static HTML page: one collapsible table per region, newest day on top.

use chrono::NaiveDateTime;

use crate::reconcile::Overview;
use crate::report::captions::Captions;
use crate::report::format::{UNKNOWN, ValueFormat, long_date, long_date_time};

const CELL_STYLE: &str = "padding-right:25px;text-align:right";
const MUTED_CELL_STYLE: &str = "padding-right:25px;text-align:right; color:#A0A0A0";

const HEAD: &str = r#"<html>
<head>
  <title>Corona-Overview</title><meta charset="UTF-8">
  <link rel="icon" href="favicon.ico">
  <script type="text/javascript">function details(classname) {
    var el = document.getElementsByClassName(classname + "m");
    for (var i = 0; i < el.length; i++) {
         el[i].style.display = "none";
    }
    el = document.getElementsByClassName(classname);
    for (var i = 0; i < el.length; i++) {
      el[i].style.display = "inherit";
    }
  }</script>
</head>
<body style="padding:30px;padding-left:60px">
"#;

const SOURCE_LINKS: &str = r#"<a href="https://www.rki.de/DE/Content/InfAZ/N/Neuartiges_Coronavirus/nCoV_node.html" target="_blank">Robert-Koch-Institut</a> /
<a href="https://www.ms.niedersachsen.de/startseite/gesundheit_pflege/gesundheit/krankenhauser/krankenhausplanung/krankenhauser_nach_21/krankenhauser-nach-21-krankenhausfinanzierungsgesetz-khg-195705.html" target="_blank">Land Niedersachsen</a>
"#;

/// Render the whole document.
pub fn render_html(
    overview: &Overview,
    captions: &Captions,
    format: &ValueFormat,
    generated_at: NaiveDateTime,
) -> String {
    let mut out = String::from(HEAD);

    for diagnostic in &overview.diagnostics {
        out.push_str(&format!("<!-- {} -->\n", comment_safe(diagnostic)));
    }

    for region in &overview.regions {
        render_region(&mut out, overview, region, captions, format);
    }

    out.push_str("<br/><br/><br/><small><i>");
    out.push_str(&format!(
        "{} {} {}",
        captions.data_from,
        long_date_time(generated_at, captions),
        captions.oclock
    ));
    out.push_str("<br/>\n");
    out.push_str(captions.data_source);
    out.push('\n');
    out.push_str(SOURCE_LINKS);
    out.push_str("</i></small>\n</body>\n</html>\n");
    out
}

fn render_region(out: &mut String, overview: &Overview, region: &str, captions: &Captions, format: &ValueFormat) {
    let class = region_class(region);

    out.push_str(&format!(
        "<h3>{}</h3>\n<table style=\"padding-left:20px\" onclick=\"details('{class}')\">",
        escape(region)
    ));

    for (line, &day) in overview.dates.iter().enumerate() {
        let first = line == 0;
        if first {
            out.push_str("<tr style=\"display:inherit\">");
        } else {
            out.push_str(&format!("<tr class=\"{class}\" style=\"display:none\">"));
        }

        let case_incidence = format.format_opt(overview.case_incidence(region, day));
        let nds = format!("H<small><sub>NDS</sub></small>: {}", format.format_opt(overview.nds_hospitalization(day)));
        let rki = format!("H<small><sub>RKI</sub></small>: {}", format.format_opt(overview.state_hospitalization(day)));
        let icu = match overview.icu_percentage(day) {
            Some(v) => format!("K: {} %", format.format(v)),
            None => format!("K: {UNKNOWN}"),
        };

        push_cell(out, CELL_STYLE, first, captions.case_incidence, &case_incidence);
        push_cell(out, CELL_STYLE, first, captions.hospitalization_incidence_nds, &nds);
        push_cell(out, MUTED_CELL_STYLE, first, captions.hospitalization_incidence_rki, &rki);
        push_cell(out, CELL_STYLE, first, captions.intensive_care_beds_percentage_nds, &icu);
        out.push_str(&format!(
            "<td style=\"color:#606060\"><small>{}</small></td></tr>\n",
            long_date(day, captions)
        ));

        if first {
            out.push_str(&format!(
                "<tr class=\"{class}m\"><td colspan=\"2\" style=\"text-align:center\">...</td></tr>\n"
            ));
        }
    }

    out.push_str("</table>\n");
}

fn push_cell(out: &mut String, style: &str, bold: bool, title: &str, body: &str) {
    let (open, close) = if bold { ("<b>", "</b>") } else { ("", "") };
    out.push_str(&format!(
        "<td style=\"{style}\">{open}<span title=\"{}\">{body}</span>{close}</td>",
        escape(title)
    ));
}

/// CSS class for a region: ASCII letters only, upper-cased.
pub fn region_class(region: &str) -> String {
    region
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `--` may not appear inside an HTML comment.
fn comment_safe(s: &str) -> String {
    let mut out = s.to_string();
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DateSeries, Indicators, RegionSeries, display_dates};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn overview() -> Overview {
        let today = d(2022, 3, 5);
        Overview::new(
            vec!["Celle".to_string(), "Hameln-Pyrmont".to_string()],
            display_dates(today, 3),
            RegionSeries::from([(
                "Celle".to_string(),
                DateSeries::from([(today, 1500.26), (d(2022, 3, 4), 1450.0)]),
            )]),
            DateSeries::from([(d(2022, 3, 4), 7.5)]),
            BTreeMap::from([(
                today,
                Indicators {
                    case_incidence: 1300.0,
                    hospitalization_incidence: 7.9,
                    icu_percentage: 4.2,
                },
            )]),
        )
    }

    fn render(overview: &Overview) -> String {
        let at = d(2022, 3, 5).and_hms_opt(9, 30, 0).unwrap();
        render_html(overview, &Captions::german(), &ValueFormat::german(), at)
    }

    #[test]
    fn renders_one_table_per_region_in_caller_order() {
        let html = render(&overview());
        let celle = html.find("<h3>Celle</h3>").unwrap();
        let hameln = html.find("<h3>Hameln-Pyrmont</h3>").unwrap();
        assert!(celle < hameln);
        assert_eq!(html.matches("<table").count(), 2);
        assert!(html.contains("details('HAMELNPYRMONT')"));
    }

    #[test]
    fn first_row_is_bold_and_values_are_localized() {
        let html = render(&overview());
        assert!(html.contains("<b><span title=\"7-Tage-Inzidenz (Fälle pro 100.000 Einwohner)\">1.500,3</span></b>"));
        assert!(html.contains("H<small><sub>NDS</sub></small>: 7,9"));
        assert!(html.contains("K: 4,2 %"));
        assert!(html.contains("Samstag, 05.03.2022"));
        assert!(html.contains("<tr class=\"CELLEm\">"));
    }

    #[test]
    fn missing_values_render_as_question_marks() {
        let html = render(&overview());
        // Hameln-Pyrmont has no case incidence at all; the oldest day has no feed data.
        assert!(html.contains(">?</span>"));
        assert!(html.contains("H<small><sub>RKI</sub></small>: ?"));
        assert!(html.contains("K: ?"));
        assert!(!html.contains(">0,0<"));
    }

    #[test]
    fn diagnostics_become_html_comments() {
        let overview = overview().with_diagnostics(vec!["fallback failed -- timeout".to_string()]);
        let html = render(&overview);
        assert!(html.contains("<!-- fallback failed - - timeout -->"));
    }

    #[test]
    fn dash_runs_cannot_close_a_diagnostic_comment() {
        assert_eq!(comment_safe("X--->y"), "X- - ->y");
        assert!(!comment_safe("region X----->injected<b>").contains("--"));

        let overview = overview().with_diagnostics(vec!["LK X--->injected<b>".to_string()]);
        let html = render(&overview);
        assert!(html.contains("<!-- LK X- - ->injected<b> -->"));
    }

    #[test]
    fn region_names_are_escaped() {
        let overview = Overview::new(
            vec!["<Celle & Co>".to_string()],
            display_dates(d(2022, 3, 5), 1),
            RegionSeries::new(),
            DateSeries::new(),
            BTreeMap::new(),
        );
        let html = render(&overview);
        assert!(html.contains("<h3>&lt;Celle &amp; Co&gt;</h3>"));
        assert!(html.contains("details('CELLECO')"));
    }

    #[test]
    fn footer_carries_generation_time() {
        let html = render(&overview());
        assert!(html.contains("Daten vom Samstag, 05.03.2022, 09:30 Uhr"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
