//! Async HTTP client for a running pendulum-q service.

use log::debug;
use reqwest::Client;

use crate::error::{PendulumError, Result};
use crate::replay_buffer::{Record, Transition, RECORD_FIELDS};

#[derive(Clone, Debug)]
pub struct ServiceClient {
    http: Client,
    base_url: String,
}

impl ServiceClient {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:5000`.
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ServiceClient {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_form(&self, route: &str, form: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, route);
        let response = self.http.post(&url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PendulumError::HttpError(format!("{} returned {}: {}", url, status, body)));
        }
        debug!("{} -> {}", route, body);
        Ok(body)
    }

    /// Ask the service for an action in state `(theta, omega)`.
    pub async fn predict(&self, theta: f64, omega: f64) -> Result<usize> {
        let body = self
            .post_form("/predict", &[("theta", theta.to_string()), ("omega", omega.to_string())])
            .await?;
        body.trim()
            .parse::<usize>()
            .map_err(|_| PendulumError::invalid_value("action", body.as_str()))
    }

    /// Push one transition into the service's replay memory.
    pub async fn save(&self, transition: &Transition) -> Result<()> {
        let record = Record::from(transition);
        let form: Vec<(&str, String)> = RECORD_FIELDS
            .iter()
            .copied()
            .zip(record.fields.iter().cloned())
            .collect();
        self.post_form("/save", &form).await?;
        Ok(())
    }

    /// Run `batches` training iterations on the service.
    pub async fn train(&self, batches: usize) -> Result<()> {
        self.post_form("/train", &[("epochs", batches.to_string())]).await?;
        Ok(())
    }

    pub async fn debug(&self) -> Result<()> {
        self.post_form("/debug", &[("key", "test".to_string())]).await?;
        Ok(())
    }
}
