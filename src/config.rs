//! Command line options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{
    aggregation::GroupingKey,
    app_state::MapMode,
    fetch::{AssetSource, DEFAULT_CSV_ASSET, DEFAULT_GEOJSON_ASSET},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Code,
    Name,
}

impl From<GroupBy> for GroupingKey {
    fn from(group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::Code => GroupingKey::CountryCode,
            GroupBy::Name => GroupingKey::CountryName,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StartMode {
    Markers,
    Choropleth,
}

impl From<StartMode> for MapMode {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Markers => MapMode::Markers,
            StartMode::Choropleth => MapMode::Choropleth,
        }
    }
}

/// Banned IP addresses on a world map and in a searchable table.
#[derive(Debug, Clone, Parser)]
#[command(name = "banned_ip_map", version, about)]
pub struct Opt {
    /// CSV of `ip,countryCode,country[,city]` rows, as a path or http(s) URL
    #[arg(long, default_value = DEFAULT_CSV_ASSET)]
    pub csv: String,

    /// GeoJSON country boundaries used for the choropleth
    #[arg(long, default_value = DEFAULT_GEOJSON_ASSET)]
    pub geojson: String,

    /// Skip the boundary download; only markers are shown
    #[arg(long)]
    pub no_geojson: bool,

    /// Field the per-country aggregation groups on
    #[arg(long, value_enum, default_value_t = GroupBy::Code)]
    pub group_by: GroupBy,

    /// Map view shown at start
    #[arg(long, value_enum, default_value_t = StartMode::Markers)]
    pub mode: StartMode,

    /// Directory for the hourly rolling log file
    #[arg(long, default_value = ".")]
    pub log_dir: PathBuf,

    /// Write markers and region styles as JSON to this path (`-` for stdout)
    /// and exit instead of starting the dashboard
    #[arg(long)]
    pub export: Option<String>,
}

impl Opt {
    pub fn csv_source(&self) -> AssetSource {
        AssetSource::parse(&self.csv)
    }

    pub fn geojson_source(&self) -> Option<AssetSource> {
        (!self.no_geojson).then(|| AssetSource::parse(&self.geojson))
    }

    pub fn grouping(&self) -> GroupingKey {
        self.group_by.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opt = Opt::parse_from(["banned_ip_map"]);
        assert_eq!(opt.csv_source(), AssetSource::parse(DEFAULT_CSV_ASSET));
        assert_eq!(
            opt.geojson_source(),
            Some(AssetSource::Url(DEFAULT_GEOJSON_ASSET.to_string()))
        );
        assert_eq!(opt.grouping(), GroupingKey::CountryCode);
        assert_eq!(MapMode::from(opt.mode), MapMode::Markers);
        assert!(opt.export.is_none());
    }

    #[test]
    fn overrides() {
        let opt = Opt::parse_from([
            "banned_ip_map",
            "--csv",
            "https://example.com/ips.csv",
            "--no-geojson",
            "--group-by",
            "name",
            "--mode",
            "choropleth",
            "--export",
            "-",
        ]);
        assert!(matches!(opt.csv_source(), AssetSource::Url(_)));
        assert_eq!(opt.geojson_source(), None);
        assert_eq!(opt.grouping(), GroupingKey::CountryName);
        assert_eq!(MapMode::from(opt.mode), MapMode::Choropleth);
        assert_eq!(opt.export.as_deref(), Some("-"));
    }
}
