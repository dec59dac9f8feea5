//! Static country centroid table.
//!
//! Coordinates are approximate centres for placing a marker, not points that
//! are guaranteed to fall inside the country's borders.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

pub struct CountryEntry {
    pub code: &'static str,
    pub coordinate: Coordinate,
    /// Display name first, then the other spellings seen in boundary datasets.
    pub names: &'static [&'static str],
}

const fn entry(
    code: &'static str,
    latitude: f64,
    longitude: f64,
    names: &'static [&'static str],
) -> CountryEntry {
    CountryEntry {
        code,
        coordinate: Coordinate {
            latitude,
            longitude,
        },
        names,
    }
}

pub const COUNTRY_TABLE: &[CountryEntry] = &[
    entry("US", 37.0902, -95.7129, &["United States", "United States of America", "USA"]),
    entry("GB", 55.3781, -3.436, &["United Kingdom", "Great Britain", "UK"]),
    entry("DE", 51.1657, 10.4515, &["Germany"]),
    entry("FR", 46.2276, 2.2137, &["France"]),
    entry("CN", 35.8617, 104.1954, &["China"]),
    entry("JP", 36.2048, 138.2529, &["Japan"]),
    entry("KR", 35.9078, 127.7669, &["South Korea", "Republic of Korea", "Korea, Republic of"]),
    entry("IN", 20.5937, 78.9629, &["India"]),
    entry("BR", -14.235, -51.9253, &["Brazil"]),
    entry("RU", 61.524, 105.3188, &["Russia", "Russian Federation"]),
    entry("ID", -0.7893, 113.9213, &["Indonesia"]),
    entry("KH", 12.5657, 104.991, &["Cambodia"]),
    entry("VN", 14.0583, 108.2772, &["Vietnam", "Viet Nam"]),
    entry("MY", 4.2105, 101.9758, &["Malaysia"]),
    entry("HK", 22.3193, 114.1694, &["Hong Kong", "Hong Kong S.A.R."]),
    entry("IR", 32.4279, 53.688, &["Iran", "Iran, Islamic Republic of"]),
    entry("SC", -4.6796, 55.492, &["Seychelles"]),
    entry("VE", 6.4238, -66.5897, &["Venezuela", "Venezuela, Bolivarian Republic of"]),
    entry("MX", 23.6345, -102.5528, &["Mexico"]),
    entry("MA", 31.7917, -7.0926, &["Morocco"]),
    entry("KZ", 48.0196, 66.9237, &["Kazakhstan"]),
];

fn find_by_code(code: &str) -> Option<&'static CountryEntry> {
    let code = code.trim();
    COUNTRY_TABLE
        .iter()
        .find(|entry| entry.code.eq_ignore_ascii_case(code))
}

/// Centroid for `code`, or `None` when the table has no entry. There is no
/// fallback position.
pub fn resolve(code: &str) -> Option<Coordinate> {
    find_by_code(code).map(|entry| entry.coordinate)
}

pub fn name_for_code(code: &str) -> Option<&'static str> {
    find_by_code(code).and_then(|entry| entry.names.first().copied())
}

pub fn code_for_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    COUNTRY_TABLE
        .iter()
        .find(|entry| entry.names.iter().any(|n| n.eq_ignore_ascii_case(name)))
        .map(|entry| entry.code)
}
