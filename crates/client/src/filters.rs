//! Query-string pieces for the PostgREST views.
//!
//! PostgREST filters take the form `column=op.value`; values supplied by the
//! caller are percent-encoded, operators are not.

/// Stay category of a moorage as labelled in the PostgSail UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayType {
    Unknown,
    Anchor,
    MooringBuoy,
    Dock,
}

impl StayType {
    pub const ALL: [StayType; 4] = [
        StayType::Unknown,
        StayType::Anchor,
        StayType::MooringBuoy,
        StayType::Dock,
    ];

    /// Upstream `stay_code` identifier.
    pub fn code(&self) -> u8 {
        match self {
            StayType::Unknown => 1,
            StayType::Anchor => 2,
            StayType::MooringBuoy => 3,
            StayType::Dock => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StayType::Unknown => "Unknown",
            StayType::Anchor => "Anchor",
            StayType::MooringBuoy => "Mooring Buoy",
            StayType::Dock => "Dock",
        }
    }

    /// `None` for "All" and anything unrecognized, meaning no filter.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }

    pub fn labels() -> Vec<&'static str> {
        let mut labels: Vec<&str> = Self::ALL.iter().map(StayType::label).collect();
        labels.push("All");
        labels
    }
}

/// Optional lower and upper bound on a timestamp column pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self {
            start: start.filter(|s| !s.is_empty()),
            end: end.filter(|s| !s.is_empty()),
        }
    }

    /// Filters for the start column (`gte`) and end column (`lte`).
    pub fn filters(&self, start_column: &str, end_column: &str) -> Vec<String> {
        let mut filters = Vec::new();
        if let Some(start) = &self.start {
            filters.push(format!("{}=gte.{}", start_column, urlencoding::encode(start)));
        }
        if let Some(end) = &self.end {
            filters.push(format!("{}=lte.{}", end_column, urlencoding::encode(end)));
        }
        filters
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Gpx,
    GeoJson,
    Kml,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gpx" => Some(ExportFormat::Gpx),
            "geojson" => Some(ExportFormat::GeoJson),
            "kml" => Some(ExportFormat::Kml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Gpx => "gpx",
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Kml => "kml",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimelapseFormat {
    #[default]
    Points,
    LineString,
}

impl TimelapseFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "points" => Some(TimelapseFormat::Points),
            "linestring" => Some(TimelapseFormat::LineString),
            _ => None,
        }
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            TimelapseFormat::Points => "export_logbooks_geojson_point_trips_fn",
            TimelapseFormat::LineString => "export_logbooks_geojson_linestring_trips_fn",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatsKind {
    Logs,
    Moorages,
    #[default]
    General,
}

impl StatsKind {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "logs" => StatsKind::Logs,
            "moorages" => StatsKind::Moorages,
            _ => StatsKind::General,
        }
    }
}

/// Joins a view name with its query parameters.
pub fn with_query(view: &str, params: &[String]) -> String {
    if params.is_empty() {
        view.to_string()
    } else {
        format!("{}?{}", view, params.join("&"))
    }
}
