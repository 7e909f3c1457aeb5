//! Opensheet roster source.
//!
//! Fetches the roster as JSON from an opensheet-style endpoint:
//! `{base}/{spreadsheet_id}/{sheet_name}` returns an array of row objects.

use anyhow::{Context, Result};
use selfie_sync_core::domain::RosterRow;
use selfie_sync_core::ports::RosterSource;
use tracing::debug;

/// Public opensheet instance.
pub const OPENSHEET_BASE_URL: &str = "https://opensheet.elk.sh";

/// Roster source backed by an opensheet endpoint.
pub struct OpensheetSource {
    client: reqwest::blocking::Client,
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
}

impl OpensheetSource {
    /// Creates a source against the public opensheet instance.
    #[must_use]
    pub fn new(spreadsheet_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self::with_base_url(OPENSHEET_BASE_URL, spreadsheet_id, sheet_name)
    }

    /// Creates a source against a custom base URL. Used by tests.
    #[must_use]
    pub fn with_base_url(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }
}

impl RosterSource for OpensheetSource {
    fn rows(&self) -> Result<Vec<RosterRow>> {
        let url = format!(
            "{}/{}/{}",
            self.base_url, self.spreadsheet_id, self.sheet_name
        );
        debug!("Fetching roster from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("failed to fetch roster from {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("roster fetch returned {status} for {url}");
        }

        let rows: Vec<RosterRow> = response
            .json()
            .with_context(|| format!("failed to parse roster JSON from {url}"))?;
        debug!("Fetched {} roster rows", rows.len());
        Ok(rows)
    }
}
