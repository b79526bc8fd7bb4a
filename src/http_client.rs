use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

use crate::config::ApiConfig;

static CLIENT: OnceCell<Client> = OnceCell::new();
static PRESENTATION_CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared client for stat reads. The timeout comes from the config seen on
/// first use; the config is resolved once per process anyway.
pub fn http_client(config: &ApiConfig) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build_client(config.request_timeout))
}

/// Long-timeout client for the server-side screenshot presentation.
pub fn presentation_client(config: &ApiConfig) -> Result<&'static Client> {
    PRESENTATION_CLIENT.get_or_try_init(|| build_client(config.presentation_timeout))
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")
}
