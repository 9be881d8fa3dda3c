//! Remote sheet store (feature `sheets`)
//!
//! Talks to a worksheet exposed over HTTP as a JSON array of flat rows:
//!
//! ```text
//! GET {base_url}/{worksheet}   -> [TradeRow, ...]
//! PUT {base_url}/{worksheet}   <- [TradeRow, ...]   (replaces the sheet)
//! ```
//!
//! Append and delete read the whole sheet, modify it and write it back, so
//! concurrent writers from other processes can overwrite each other.

use crate::error::StoreError;
use crate::repository::TradeStore;
use crate::row::TradeRow;
use async_trait::async_trait;
use journal_domain::TradeRecord;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Default request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Journal persisted to a shared remote worksheet
pub struct SheetStore {
    client: Client,
    url: String,
    token: Option<String>,
    write_lock: Mutex<()>,
}

impl SheetStore {
    /// Create a store for `worksheet` under `base_url`
    pub fn new(
        base_url: &str,
        worksheet: &str,
        token: Option<String>,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: format!("{}/{}", base_url.trim_end_matches('/'), worksheet),
            token,
            write_lock: Mutex::new(()),
        })
    }

    /// Worksheet URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch(&self) -> Result<Vec<TradeRecord>, StoreError> {
        let rows: Vec<TradeRow> = self
            .authorize(self.client.get(&self.url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let total = rows.len();
        let records = rows
            .into_iter()
            .filter(|row| !row.is_blank())
            .map(TradeRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if records.len() < total {
            warn!(
                dropped = total - records.len(),
                url = %self.url,
                "Dropped blank sheet rows"
            );
        }
        Ok(records)
    }

    async fn replace(&self, records: &[TradeRecord]) -> Result<(), StoreError> {
        let rows: Vec<TradeRow> = records.iter().map(TradeRow::from).collect();
        self.authorize(self.client.put(&self.url))
            .json(&rows)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl TradeStore for SheetStore {
    async fn append(&self, record: &TradeRecord) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.fetch().await?;
        records.push(record.clone());
        self.replace(&records).await?;

        let position = records.len() - 1;
        info!(position, trade_id = %record.id, url = %self.url, "Trade synced to sheet");
        Ok(position)
    }

    async fn list(&self) -> Result<Vec<TradeRecord>, StoreError> {
        self.fetch().await
    }

    async fn delete(&self, position: usize) -> Result<TradeRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.fetch().await?;
        if position >= records.len() {
            return Err(StoreError::not_found(position, records.len()));
        }
        let removed = records.remove(position);
        self.replace(&records).await?;

        info!(position, trade_id = %removed.id, url = %self.url, "Trade removed from sheet");
        Ok(removed)
    }

    fn backend(&self) -> &'static str {
        "sheet"
    }
}
