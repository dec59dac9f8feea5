use chrono::{DateTime, Local};
use ratatui::widgets::TableState;

use crate::{
    aggregation::{aggregate, Aggregation, GroupingKey},
    fetch::FetchError,
    filter::SearchFilter,
    geojson::FeatureCollection,
    ip_record::IpRecord,
    presentation::{build_markers, style_regions, MapMarker, RegionCounts, StyledRegion},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MapMode {
    Markers,
    Choropleth,
}

impl MapMode {
    pub fn toggled(self) -> Self {
        match self {
            MapMode::Markers => MapMode::Choropleth,
            MapMode::Choropleth => MapMode::Markers,
        }
    }
}

impl From<MapMode> for usize {
    fn from(map_mode: MapMode) -> Self {
        match map_mode {
            MapMode::Markers => 0,
            MapMode::Choropleth => 1,
        }
    }
}

impl From<MapMode> for &'static str {
    fn from(map_mode: MapMode) -> Self {
        match map_mode {
            MapMode::Markers => "Markers",
            MapMode::Choropleth => "Choropleth",
        }
    }
}

pub fn get_map_mode_strings() -> Vec<&'static str> {
    [MapMode::Markers, MapMode::Choropleth]
        .into_iter()
        .map(|map_mode| map_mode.into())
        .collect()
}

/// Everything the dashboard shows. Derived data is rebuilt wholesale whenever
/// an asset arrives.
pub struct ViewState {
    pub map_mode: MapMode,
    pub table_state: TableState,
    grouping: GroupingKey,
    records: Vec<IpRecord>,
    records_loaded: bool,
    boundaries: Option<FeatureCollection>,
    aggregation: Aggregation,
    markers: Vec<MapMarker>,
    regions: Vec<StyledRegion>,
    search: String,
    selected_overlay: usize,
    status: String,
    loaded_at: Option<DateTime<Local>>,
}

impl ViewState {
    pub fn new(grouping: GroupingKey, map_mode: MapMode) -> Self {
        Self {
            map_mode,
            table_state: TableState::default(),
            grouping,
            records: Vec::new(),
            records_loaded: false,
            boundaries: None,
            aggregation: Aggregation::default(),
            markers: Vec::new(),
            regions: Vec::new(),
            search: String::new(),
            selected_overlay: 0,
            status: "Loading...".to_string(),
            loaded_at: None,
        }
    }

    pub fn set_records(&mut self, records: Vec<IpRecord>) {
        self.records = records;
        self.records_loaded = true;
        self.loaded_at = Some(Local::now());
        self.status = format!("{} banned IPs loaded", self.records.len());
        self.recompute();
    }

    pub fn set_boundaries(&mut self, boundaries: FeatureCollection) {
        self.boundaries = Some(boundaries);
        self.recompute();
    }

    /// A failed fetch leaves whatever was already loaded in place.
    pub fn record_fetch_failure(&mut self, asset: &str, error: &FetchError) {
        tracing::error!("Error loading {asset}: {error}");
        self.status = format!("Error loading {asset}: {error}");
    }

    fn recompute(&mut self) {
        self.aggregation = aggregate(&self.records, self.grouping);
        self.markers = build_markers(&self.aggregation);
        self.regions = match (&self.boundaries, self.records_loaded) {
            (Some(boundaries), true) => {
                let counts = RegionCounts::from_aggregation(&self.aggregation);
                style_regions(boundaries, &counts)
            }
            _ => Vec::new(),
        };
        self.selected_overlay = 0;
        self.clamp_table_selection();
        tracing::debug!(
            "Recomputed {} aggregates, {} markers, {} regions",
            self.aggregation.len(),
            self.markers.len(),
            self.regions.len()
        );
    }

    pub fn records(&self) -> &[IpRecord] {
        &self.records
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    /// Styled boundaries, present only once both the CSV and the boundaries
    /// have arrived.
    pub fn regions(&self) -> Option<&[StyledRegion]> {
        (!self.regions.is_empty()).then_some(self.regions.as_slice())
    }

    pub fn shaded_regions(&self) -> impl Iterator<Item = &StyledRegion> {
        self.regions.iter().filter(|region| region.count > 0)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filtered_records(&self) -> Vec<&IpRecord> {
        SearchFilter::new(&self.search).apply(&self.records)
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
        self.clamp_table_selection();
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.clamp_table_selection();
    }

    pub fn select_next_row(&mut self) {
        let next_index = self.table_state.selected().map_or(0, |i| i + 1);
        if next_index < self.filtered_records().len() {
            self.table_state.select(Some(next_index));
        }
    }

    pub fn select_previous_row(&mut self) {
        if self.filtered_records().is_empty() {
            return;
        }
        let previous_index = self
            .table_state
            .selected()
            .map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(previous_index));
    }

    fn clamp_table_selection(&mut self) {
        let rows = self.filtered_records().len();
        let selected = match self.table_state.selected() {
            _ if rows == 0 => None,
            Some(i) => Some(i.min(rows - 1)),
            None => None,
        };
        self.table_state.select(selected);
    }

    fn overlay_len(&self) -> usize {
        match self.map_mode {
            MapMode::Markers => self.markers.len(),
            MapMode::Choropleth => self.shaded_regions().count(),
        }
    }

    pub fn toggle_map_mode(&mut self) {
        self.map_mode = self.map_mode.toggled();
        self.selected_overlay = 0;
    }

    pub fn select_next_overlay(&mut self) {
        let len = self.overlay_len();
        if len > 0 {
            self.selected_overlay = (self.selected_overlay + 1) % len;
        }
    }

    pub fn select_previous_overlay(&mut self) {
        let len = self.overlay_len();
        if len > 0 {
            self.selected_overlay = (self.selected_overlay + len - 1) % len;
        }
    }

    pub fn selected_marker(&self) -> Option<&MapMarker> {
        self.markers.get(self.selected_overlay)
    }

    pub fn selected_region(&self) -> Option<&StyledRegion> {
        self.shaded_regions().nth(self.selected_overlay)
    }

    pub fn status_line(&self) -> String {
        match self.loaded_at {
            Some(loaded_at) => format!("{} (at {})", self.status, loaded_at.format("%H:%M:%S")),
            None => self.status.clone(),
        }
    }
}
