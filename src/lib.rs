pub mod aggregation;
pub mod app_state;
pub mod config;
pub mod coordinates;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod geojson;
pub mod ingestion;
pub mod ip_record;
pub mod presentation;

pub use aggregation::{aggregate, Aggregation, CountryAggregate, GroupingKey};
pub use ip_record::IpRecord;
