use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The charts the report renders, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArtifactKind {
    /// Rental count against temperature, colored by season.
    TemperatureScatter,
    /// Rental count against humidity, colored by season.
    HumidityScatter,
    /// Heatmap of the temperature / humidity / count correlations.
    CorrelationHeatmap,
    /// Mean rental count per month, January to December.
    MonthlyTrend,
    /// Mean rental count per season, in season code order.
    SeasonalTrend,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::TemperatureScatter,
        ArtifactKind::HumidityScatter,
        ArtifactKind::CorrelationHeatmap,
        ArtifactKind::MonthlyTrend,
        ArtifactKind::SeasonalTrend,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ArtifactKind::TemperatureScatter => "Temperature and Bike Rentals",
            ArtifactKind::HumidityScatter => "Humidity and Bike Rentals",
            ArtifactKind::CorrelationHeatmap => "Correlation between Weather Factors and Bike Rentals",
            ArtifactKind::MonthlyTrend => "Monthly Bike Rental Trend",
            ArtifactKind::SeasonalTrend => "Seasonal Bike Rental Trend",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::TemperatureScatter => "temperature_scatter.html",
            ArtifactKind::HumidityScatter => "humidity_scatter.html",
            ArtifactKind::CorrelationHeatmap => "correlation_heatmap.html",
            ArtifactKind::MonthlyTrend => "monthly_trend.html",
            ArtifactKind::SeasonalTrend => "seasonal_trend.html",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A chart written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub title: String,
    pub path: PathBuf,
}
