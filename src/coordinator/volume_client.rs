//! HTTP client for volume servers
//!
//! Volumes are plain HTTP stores: `PUT http://<volume><path>` must answer 201
//! or 204, `DELETE http://<volume><path>` must answer 204. Nothing is retried.

use crate::common::{Error, Result};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, StatusCode};
use std::time::Duration;

/// URL of `path` on `volume`
pub fn volume_url(volume: &str, path: &str) -> String {
    format!("http://{}{}", volume, path)
}

#[derive(Clone)]
pub struct VolumeClient {
    client: reqwest::Client,
}

impl VolumeClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }

    /// Store `body` at `path` on `volume`, declaring `content_length` upfront.
    pub async fn store(
        &self,
        volume: &str,
        path: &str,
        body: impl Into<Body>,
        content_length: u64,
    ) -> Result<()> {
        let response = self
            .client
            .put(volume_url(volume, path))
            .header(CONTENT_LENGTH, content_length)
            .body(body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            status => Err(Error::Volume {
                volume: volume.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    /// Delete `path` on `volume`
    pub async fn remove(&self, volume: &str, path: &str) -> Result<()> {
        let response = self.client.delete(volume_url(volume, path)).send().await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(Error::Volume {
                volume: volume.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}
