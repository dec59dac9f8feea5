use banned_ip_map::{
    config::Opt,
    fetch::{self, AssetSource, FetchError},
    geojson::FeatureCollection,
    ip_record::IpRecord,
};
use reqwest::Client;
use std::sync::mpsc::Sender as StdSender;

pub enum AssetEvent {
    Records(Result<Vec<IpRecord>, FetchError>),
    Boundaries(Result<FeatureCollection, FetchError>),
}

/// An asset event tagged with the load that produced it.
pub struct LoadedAsset {
    pub generation: u64,
    pub event: AssetEvent,
}

#[derive(Clone, Debug)]
pub struct AssetSources {
    pub csv: AssetSource,
    pub geojson: Option<AssetSource>,
}

impl From<&Opt> for AssetSources {
    fn from(opt: &Opt) -> Self {
        Self {
            csv: opt.csv_source(),
            geojson: opt.geojson_source(),
        }
    }
}

/// Fetches the CSV and the boundaries concurrently, reporting each one to
/// `tx_assets` as soon as it completes, tagged with `generation`.
pub fn spawn_asset_load(
    client: Client,
    sources: AssetSources,
    generation: u64,
    tx_assets: StdSender<LoadedAsset>,
) {
    tokio::spawn(async move {
        let records = async {
            let result = fetch::load_records(&client, &sources.csv).await;
            send_asset_event(&tx_assets, generation, AssetEvent::Records(result));
        };
        let boundaries = async {
            if let Some(source) = &sources.geojson {
                let result = fetch::load_boundaries(&client, source).await;
                send_asset_event(&tx_assets, generation, AssetEvent::Boundaries(result));
            }
        };
        futures::join!(records, boundaries);
    });
}

/// Fetches both assets concurrently and waits for both.
pub async fn load_assets(client: &Client, sources: &AssetSources) -> Vec<AssetEvent> {
    let boundaries = async {
        match &sources.geojson {
            Some(source) => Some(fetch::load_boundaries(client, source).await),
            None => None,
        }
    };
    let (records, boundaries) =
        futures::join!(fetch::load_records(client, &sources.csv), boundaries);

    let mut events = vec![AssetEvent::Records(records)];
    events.extend(boundaries.map(AssetEvent::Boundaries));
    events
}

fn send_asset_event(tx_assets: &StdSender<LoadedAsset>, generation: u64, event: AssetEvent) {
    if tx_assets.send(LoadedAsset { generation, event }).is_err() {
        tracing::info!("Dashboard closed before the asset arrived.");
    }
}
