use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use super::{
    api::{Simulation, SimulationIndex, SimulationName, Snapshot, SnapshotEntry, SnapshotQuery,
        SubhaloDetail},
    download::{build_async_client, build_runtime, download_blocking},
};
use crate::{config::IllustrisConfig, constants::SubhaloId, mond_errors::MondError};

/// Authenticated client of the Illustris web API.
///
/// JSON pages go through a blocking [`ureq::Agent`]; binary payloads are streamed to disk with
/// `reqwest` (see [`IllustrisClient::download`]). Both carry the `api-key` header and the
/// configured global timeout. The API root index is fetched once and cached.
///
/// Downloads run on a current-thread runtime owned by the client, so the client must be used
/// (and dropped) outside of any async context.
#[derive(Debug)]
pub struct IllustrisClient {
    config: IllustrisConfig,
    agent: Agent,
    downloader: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    index: OnceCell<SimulationIndex>,
}

impl IllustrisClient {
    /// Build a client from a validated configuration.
    ///
    /// Return
    /// ----------
    /// * The client, or [`MondError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: IllustrisConfig) -> Result<Self, MondError> {
        config.validate()?;

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .build()
            .into();
        let downloader = build_async_client(&config)?;
        let runtime = build_runtime()?;

        Ok(IllustrisClient {
            config,
            agent,
            downloader,
            runtime,
            index: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &IllustrisConfig {
        &self.config
    }

    /// `GET url` and decode the JSON body into `T`.
    ///
    /// Arguments
    /// -----------------
    /// * `url` – Absolute API URL.
    /// * `params` – Query parameters.
    ///
    /// Return
    /// ----------
    /// * The decoded record, [`MondError::UreqHttpError`] on transport / non-2xx status /
    ///   decoding failure, or [`MondError::UnexpectedContentType`] if the body is not JSON.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MondError> {
        debug!(url, "GET json");
        let mut response = self
            .agent
            .get(url)
            .header("api-key", &self.config.api_key)
            .query_pairs(params.iter().copied())
            .call()?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("application/json") {
            return Err(MondError::UnexpectedContentType {
                url: url.to_string(),
                content_type,
            });
        }

        Ok(response.body_mut().read_json::<T>()?)
    }

    /// Download a binary resource into `dest_dir` (see [`super::download`]).
    pub fn download(
        &self,
        url: &str,
        params: &[(&str, &str)],
        dest_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, MondError> {
        download_blocking(&self.runtime, &self.downloader, url, params, dest_dir)
    }

    /// API root listing every simulation, fetched on first use.
    pub fn simulations(&self) -> Result<&SimulationIndex, MondError> {
        self.index
            .get_or_try_init(|| self.get_json(&self.config.base_url, &[]))
    }

    /// Detail page of a named simulation.
    ///
    /// Return
    /// ----------
    /// * The simulation, or [`MondError::InvalidSimulation`] if the API does not list it.
    pub fn simulation(&self, name: &SimulationName) -> Result<Simulation, MondError> {
        let entry = self
            .simulations()?
            .find(name.as_str())
            .ok_or_else(|| MondError::InvalidSimulation(name.to_string()))?;
        self.get_json(&entry.url, &[])
    }

    /// Snapshot of `simulation` selected by `query`.
    ///
    /// A redshift selects `<snapshots>z=<z>/` (the API picks the closest snapshot); a snapshot
    /// number must appear in the simulation's snapshot list.
    pub fn snapshot(
        &self,
        simulation: &Simulation,
        query: SnapshotQuery,
    ) -> Result<Snapshot, MondError> {
        let url = match query {
            SnapshotQuery::Redshift(z) => format!("{}z={z:?}/", simulation.snapshots),
            SnapshotQuery::Number(snapnum) => {
                let snapshots: Vec<SnapshotEntry> = self.get_json(&simulation.snapshots, &[])?;
                snapshots
                    .into_iter()
                    .find(|s| s.number == snapnum)
                    .map(|s| s.url)
                    .ok_or_else(|| MondError::InvalidSnapshotNumber {
                        simulation: simulation.name.clone(),
                        snapnum,
                    })?
            }
        };
        self.get_json(&url, &[])
    }

    pub fn subhalo(&self, snapshot: &Snapshot, id: SubhaloId) -> Result<SubhaloDetail, MondError> {
        self.get_json(&snapshot.subhalo_url(id), &[])
    }
}
