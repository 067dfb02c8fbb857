//! # Application State
//!
//! The options file is re-read on every request so an operator can
//! repoint the sheet or the event bus without restarting the server.
//! Only the store auth manager is cached across requests (it holds the
//! bearer token), keyed by the key file path so a changed key takes
//! effect on the next request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use gridpos_sales::{EventSink, HttpEventSink, NullEventSink, SaleProcessor};
use gridpos_store::{Options, ServiceAccountKey, SheetsStore, StoreAuth, StoreResult};

use crate::error::ApiError;

/// Shared server state.
pub struct AppState {
    options_path: PathBuf,
    port: u16,
    http: reqwest::Client,
    auth: Mutex<Option<(PathBuf, Arc<StoreAuth>)>>,
}

impl AppState {
    pub fn new(options_path: PathBuf, port: u16) -> Self {
        Self {
            options_path,
            port,
            http: reqwest::Client::new(),
            auth: Mutex::new(None),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Builds the sale processor for one request: fresh options, the
    /// cached auth manager, and the event sink the options call for.
    pub async fn processor(&self) -> Result<SaleProcessor<SheetsStore>, ApiError> {
        let options = Options::load(&self.options_path)?;
        let auth = self.auth_for(&options.service_account_key).await?;

        let store = match &options.store_base_url {
            Some(base) => SheetsStore::with_base_url(auth, &options.sheet_id, base)?,
            None => SheetsStore::new(auth, &options.sheet_id)?,
        };

        // Notifications stay off unless both the bus and its token are
        // configured.
        let sink: Arc<dyn EventSink> = match (&options.bus_url, &options.bus_token) {
            (Some(url), Some(token)) => {
                Arc::new(HttpEventSink::new(url, Some(token.clone()))?)
            }
            _ => Arc::new(NullEventSink),
        };

        Ok(SaleProcessor::with_event(store, sink, options.event))
    }

    /// Returns the cached auth manager, rebuilding it when the key file
    /// path has changed since the last request.
    async fn auth_for(&self, key_path: &Path) -> StoreResult<Arc<StoreAuth>> {
        let mut guard = self.auth.lock().await;
        if let Some((cached_path, auth)) = guard.as_ref() {
            if cached_path == key_path {
                return Ok(auth.clone());
            }
        }

        let key = ServiceAccountKey::from_file(key_path)?;
        let auth = Arc::new(StoreAuth::new(key, self.http.clone()));
        *guard = Some((key_path.to_path_buf(), auth.clone()));
        Ok(auth)
    }
}
