//! Shapes aggregated data for the map and table widgets.
//!
//! Nothing here performs I/O: it consumes an [`Aggregation`] that is already
//! built and GeoJSON feature properties that are already fetched.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    aggregation::Aggregation,
    coordinates::{self, Coordinate},
    geojson::{FeatureCollection, Region, Ring},
};

/// A point annotation for one country with a resolvable coordinate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapMarker {
    pub code: String,
    pub coordinate: Coordinate,
    pub title: String,
    pub body: Vec<String>,
    pub count: usize,
}

impl MapMarker {
    pub fn label(&self) -> String {
        format!("{} ({})", self.code, self.count)
    }
}

/// One marker per resolvable country code, in first-occurrence order.
/// Aggregates sharing a code (name grouping with several spellings) land on
/// the same marker. Unresolvable countries are left off the map.
pub fn build_markers(aggregation: &Aggregation) -> Vec<MapMarker> {
    let mut markers: Vec<MapMarker> = Vec::new();
    let mut by_code: HashMap<&str, usize> = HashMap::new();

    for aggregate in aggregation {
        let code = aggregate.country_code();
        if let Some(&position) = by_code.get(code) {
            let marker = &mut markers[position];
            marker.body.extend(aggregate.ips().map(str::to_string));
            marker.count += aggregate.count();
            continue;
        }
        let Some(coordinate) = coordinates::resolve(code) else {
            tracing::debug!("No coordinate for {code}, leaving it off the map");
            continue;
        };
        by_code.insert(code, markers.len());
        markers.push(MapMarker {
            code: code.to_string(),
            coordinate,
            title: aggregate.country_name().to_string(),
            body: aggregate.ips().map(str::to_string).collect(),
            count: aggregate.count(),
        });
    }

    markers
}

/// Seven fill buckets, from lightest to darkest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ChoroplethBucket {
    None,
    One,
    Two,
    Three,
    Four,
    Five,
    MoreThanFive,
}

impl ChoroplethBucket {
    pub const ALL: [ChoroplethBucket; 7] = [
        ChoroplethBucket::None,
        ChoroplethBucket::One,
        ChoroplethBucket::Two,
        ChoroplethBucket::Three,
        ChoroplethBucket::Four,
        ChoroplethBucket::Five,
        ChoroplethBucket::MoreThanFive,
    ];

    pub fn for_count(count: usize) -> Self {
        match count {
            c if c > 5 => ChoroplethBucket::MoreThanFive,
            c if c > 4 => ChoroplethBucket::Five,
            c if c > 3 => ChoroplethBucket::Four,
            c if c > 2 => ChoroplethBucket::Three,
            c if c > 1 => ChoroplethBucket::Two,
            c if c > 0 => ChoroplethBucket::One,
            _ => ChoroplethBucket::None,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ChoroplethBucket::MoreThanFive => "#800026",
            ChoroplethBucket::Five => "#BD0026",
            ChoroplethBucket::Four => "#E31A1C",
            ChoroplethBucket::Three => "#FC4E2A",
            ChoroplethBucket::Two => "#FD8D3C",
            ChoroplethBucket::One => "#FEB24C",
            ChoroplethBucket::None => "#FFEDA0",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        let hex = self.hex().trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }

    pub fn legend(self) -> &'static str {
        match self {
            ChoroplethBucket::MoreThanFive => "6+",
            ChoroplethBucket::Five => "5",
            ChoroplethBucket::Four => "4",
            ChoroplethBucket::Three => "3",
            ChoroplethBucket::Two => "2",
            ChoroplethBucket::One => "1",
            ChoroplethBucket::None => "0",
        }
    }
}

/// Counts joined against boundary regions, by code first and name second.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionCounts {
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl RegionCounts {
    pub fn from_aggregation(aggregation: &Aggregation) -> Self {
        let mut counts = Self::default();
        for aggregate in aggregation {
            for record in &aggregate.records {
                if !record.country_code.is_empty() {
                    *counts.by_code.entry(record.country_code.clone()).or_default() += 1;
                }
                if !record.country.is_empty() {
                    *counts.by_name.entry(record.country.to_lowercase()).or_default() += 1;
                }
            }
        }
        counts
    }

    /// Resolves a region to a country code: its own `ISO_A2`, else its name
    /// through the code table.
    pub fn region_code(region: &Region) -> Option<String> {
        region
            .iso_a2
            .clone()
            .or_else(|| coordinates::code_for_name(&region.name).map(str::to_string))
    }

    pub fn count_for(&self, region: &Region) -> usize {
        if let Some(count) = Self::region_code(region).and_then(|code| self.by_code.get(&code)) {
            return *count;
        }
        self.by_name
            .get(&region.name.to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionStyle {
    pub fill_color: &'static str,
    pub bucket: ChoroplethBucket,
    pub weight: u8,
    pub opacity: f32,
    pub color: &'static str,
    pub fill_opacity: f32,
}

pub fn region_style(region: &Region, counts: &RegionCounts) -> RegionStyle {
    let bucket = ChoroplethBucket::for_count(counts.count_for(region));
    RegionStyle {
        fill_color: bucket.hex(),
        bucket,
        weight: 1,
        opacity: 1.0,
        color: "white",
        fill_opacity: 0.7,
    }
}

pub fn region_popup(region: &Region, counts: &RegionCounts) -> String {
    format!("{}: {} IP(s)", region.name, counts.count_for(region))
}

/// A boundary feature ready to draw: identity, style, popup and outline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyledRegion {
    pub name: String,
    pub code: Option<String>,
    pub count: usize,
    pub style: RegionStyle,
    pub popup: String,
    #[serde(skip)]
    pub rings: Vec<Ring>,
}

pub fn style_regions(boundaries: &FeatureCollection, counts: &RegionCounts) -> Vec<StyledRegion> {
    boundaries
        .features
        .iter()
        .map(|feature| {
            let region = feature.region();
            StyledRegion {
                code: RegionCounts::region_code(&region),
                count: counts.count_for(&region),
                style: region_style(&region, counts),
                popup: region_popup(&region, counts),
                rings: feature.rings(),
                name: region.name,
            }
        })
        .collect()
}
