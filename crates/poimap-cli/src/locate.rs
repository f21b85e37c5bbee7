//! `locate` command: the locate-me flow against a fixed position.

use anyhow::{ensure, Context};
use poimap_core::{AppConfig, Coordinate};
use poimap_geo::GeoClient;
use poimap_search::{locate_me, LocateOptions};

use crate::console::{ConsoleMap, FixedLocation};

pub(crate) async fn run_locate(config: &AppConfig, lat: f64, lon: f64) -> anyhow::Result<()> {
    let position = Coordinate::new(lat, lon);
    ensure!(position.is_valid(), "{position} is not a valid coordinate");

    let client = GeoClient::from_config(config).context("failed to build geo client")?;
    let options = LocateOptions::from_config(config);
    let mine = locate_me(&client, &FixedLocation(position), &mut ConsoleMap, &options)
        .await
        .with_context(|| format!("failed to locate {position}"))?;

    tracing::debug!(address = %mine.full_address, "located");
    Ok(())
}
