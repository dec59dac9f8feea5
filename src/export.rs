//! JSON document handed to an external map widget instead of the dashboard.

use std::io::Write;

use serde::Serialize;

use crate::{
    app_state::ViewState,
    presentation::{MapMarker, StyledRegion},
};

#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub total_records: usize,
    pub markers: &'a [MapMarker],
    pub regions: &'a [StyledRegion],
}

impl<'a> ExportDocument<'a> {
    pub fn from_state(state: &'a ViewState) -> Self {
        Self {
            total_records: state.records().len(),
            markers: state.markers(),
            regions: state.regions().unwrap_or_default(),
        }
    }

    pub fn write_to<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}
