//! HTML composition of the report page.

use crate::analysis::aggregate::{Aggregate, GroupKey, Summaries};
use crate::analysis::clean::CleaningReport;
use crate::error::BikeShareError;
use crate::render::artifact::Artifact;
use crate::types::dataset::Dataset;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use polars::prelude::AnyValue;

/// Number of weather groups shown on the page; the full list is in `summary.json`.
pub const WEATHER_PREVIEW_ROWS: usize = 5;

const STYLE: &str = "table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:2px 6px}\
                     .raw{max-height:400px;overflow:auto}iframe{width:100%;height:600px;border:none}";

/// Everything the report page shows, in page order.
pub struct ReportPage<'a> {
    pub dataset: &'a Dataset,
    pub cleaning: &'a CleaningReport,
    pub summaries: &'a Summaries,
    pub artifacts: &'a [Artifact],
    /// Limit of raw rows shown, `None` for all of them.
    pub raw_rows: Option<usize>,
}

impl ReportPage<'_> {
    pub fn to_html(&self) -> Result<String, BikeShareError> {
        Ok(self.render()?.into_string())
    }

    fn render(&self) -> Result<Markup, BikeShareError> {
        let raw = self.raw_table()?;
        let missing: Vec<Vec<String>> = self
            .cleaning
            .missing_values
            .iter()
            .map(|m| vec![m.column.clone(), m.count.to_string()])
            .collect();
        let weather = &self.summaries.weather;
        let preview = &weather[..weather.len().min(WEATHER_PREVIEW_ROWS)];

        Ok(html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { "Bike Rental Analysis" }
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    h1 { "Bike Rental Analysis" }

                    p { "Bike rental data:" }
                    div class="raw" { (raw) }

                    h3 { "Data Assessment" }
                    p { "Duplicate rows: " (self.cleaning.duplicate_rows) }
                    p { "Missing values:" }
                    (table(&["column", "missing"], &missing))
                    @if self.cleaning.dates_converted {
                        p { "Date format has been updated." }
                    }

                    h2 { "Effect of Weather (Humidity and Temperature) on Bike Rentals" }
                    p { "Effect of humidity and temperature on bike rentals:" }
                    (aggregate_table(preview))

                    h2 { "Monthly and Seasonal Trends in Bike Rentals" }
                    p { "Monthly trend of bike rentals:" }
                    (aggregate_table(&self.summaries.monthly))
                    p { "Seasonal trend of bike rentals:" }
                    (aggregate_table(&self.summaries.seasonal))

                    h2 { "Visualisations" }
                    @for artifact in self.artifacts {
                        h3 { (artifact.title) }
                        iframe src=(chart_source(artifact)) title=(artifact.title) {}
                    }
                }
            }
        })
    }

    fn raw_table(&self) -> Result<Markup, BikeShareError> {
        let frame = self.dataset.frame();
        let shown = self
            .raw_rows
            .map_or(frame.height(), |limit| limit.min(frame.height()));
        let header: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = Vec::with_capacity(shown);
        for i in 0..shown {
            let row = frame
                .get_columns()
                .iter()
                .map(|column| column.get(i).map(|value| cell(&value)))
                .collect::<Result<Vec<String>, _>>()?;
            rows.push(row);
        }

        let header: Vec<&str> = header.iter().map(String::as_str).collect();
        Ok(html! {
            (table(&header, &rows))
            @if shown < frame.height() {
                p { "Showing " (shown) " of " (frame.height()) " rows." }
            }
        })
    }
}

/// Chart files sit next to `index.html`, so the file name is enough.
fn chart_source(artifact: &Artifact) -> String {
    artifact
        .path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn aggregate_table(aggregates: &[Aggregate]) -> Markup {
    let Some(first) = aggregates.first() else {
        return html! { p { "No groups." } };
    };
    let key_headers: &[&str] = match first.key {
        GroupKey::Weather { .. } => &["temp", "hum"],
        GroupKey::Month(_) => &["mnth", "month"],
        GroupKey::Season(_) => &["season", "name"],
    };
    let mut header = key_headers.to_vec();
    header.extend(["sum", "max", "min", "mean", "std"]);

    let rows: Vec<Vec<String>> = aggregates
        .iter()
        .map(|a| {
            let mut row = match a.key {
                GroupKey::Weather {
                    temperature,
                    humidity,
                } => vec![temperature.to_string(), humidity.to_string()],
                GroupKey::Month(code) | GroupKey::Season(code) => {
                    vec![code.to_string(), a.key.label()]
                }
            };
            row.push(a.sum.to_string());
            row.push(optional(a.max));
            row.push(optional(a.min));
            row.push(optional(a.mean.map(|m| format!("{m:.2}"))));
            row.push(optional(a.std.map(|s| format!("{s:.2}"))));
            row
        })
        .collect();
    table(&header, &rows)
}

fn table(header: &[&str], rows: &[Vec<String>]) -> Markup {
    html! {
        table {
            tr {
                @for name in header {
                    th { (name) }
                }
            }
            @for row in rows {
                tr {
                    @for value in row {
                        td { (value) }
                    }
                }
            }
        }
    }
}

fn cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
