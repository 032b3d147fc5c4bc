//! Streaming download of binary API responses (particle cutouts).
//!
//! Cutouts can reach hundreds of megabytes, so they are streamed chunk by chunk to disk with
//! `reqwest` and `tokio` instead of being buffered through the JSON agent. A download that
//! fails after the file was created leaves nothing behind.
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_DISPOSITION};
use tokio::{
    fs::File,
    io::AsyncWriteExt,
    runtime::{Handle, Runtime},
};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::{config::IllustrisConfig, mond_errors::MondError};

static FILENAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"filename\s*=\s*"?([^";]+)"?"#).expect("static content-disposition regex")
});

/// File name announced by a `content-disposition` header value.
///
/// Only the final path component is kept, so a hostile header cannot escape the destination
/// directory.
pub fn content_disposition_file_name(header: &str) -> Option<String> {
    let raw = FILENAME_REGEX.captures(header)?.get(1)?.as_str().trim();
    let name = Utf8Path::new(raw).file_name()?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Async client for binary downloads, carrying the same `api-key` header and timeout as the
/// JSON agent.
pub(crate) fn build_async_client(config: &IllustrisConfig) -> Result<reqwest::Client, MondError> {
    let mut headers = HeaderMap::new();
    let key = HeaderValue::from_str(&config.api_key)
        .map_err(|e| MondError::InvalidConfig(format!("api_key is not a valid header: {e}")))?;
    headers.insert("api-key", key);

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .build()?)
}

/// Stream `url` into `dest_dir`, naming the file after the `content-disposition` header.
///
/// Arguments
/// -----------------
/// * `client` – Async client from [`build_async_client`].
/// * `url` – Resource to fetch.
/// * `params` – Query parameters.
/// * `dest_dir` – Existing directory receiving the file.
///
/// Return
/// ----------
/// * Path of the written file, [`MondError::MissingContentDisposition`] if the response does
///   not name its file, or the HTTP / I/O error. On a mid-stream failure the partial file is
///   removed before the error is returned.
pub(crate) async fn stream_to_dir(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, &str)],
    dest_dir: &Utf8Path,
) -> Result<Utf8PathBuf, MondError> {
    let response = client
        .get(url)
        .query(params)
        .send()
        .await?
        .error_for_status()?;

    let file_name = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(content_disposition_file_name)
        .ok_or_else(|| MondError::MissingContentDisposition(url.to_string()))?;
    let path = dest_dir.join(file_name);

    info!(url, path = %path, "downloading");
    let written = async {
        let mut file = File::create(&path).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0usize;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            written += chunk.len();
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok::<_, MondError>(written)
    }
    .await;

    match written {
        Ok(bytes) => {
            debug!(path = %path, bytes, "download complete");
            Ok(path)
        }
        Err(err) => {
            if let Err(rm_err) = tokio::fs::remove_file(&path).await {
                warn!(path = %path, error = %rm_err, "unable to remove partial download");
            }
            Err(err)
        }
    }
}

/// Current-thread runtime driving the blocking downloads of one client.
pub(crate) fn build_runtime() -> Result<Runtime, MondError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Blocking wrapper around [`stream_to_dir`] on `runtime`.
///
/// Return
/// ----------
/// * As [`stream_to_dir`], or [`MondError::BlockingDownloadInRuntime`] when called from a task
///   of another runtime, where blocking would panic.
pub(crate) fn download_blocking(
    runtime: &Runtime,
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, &str)],
    dest_dir: &Utf8Path,
) -> Result<Utf8PathBuf, MondError> {
    if Handle::try_current().is_ok() {
        return Err(MondError::BlockingDownloadInRuntime(url.to_string()));
    }
    runtime.block_on(stream_to_dir(client, url, params, dest_dir))
}
