use std::sync::Arc;

use importer_core::{ErrorKind, FetchOutcome};
use importer_logging::{current_run_id, importer_debug, importer_info, importer_warn};

use crate::json::to_canonical_string;
use crate::{InventorySource, SlotStore};

/// Imports one account: fetch, validate, write to every configured slot.
#[derive(Clone)]
pub struct AccountFetcher {
    source: Arc<dyn InventorySource>,
    store: Arc<dyn SlotStore>,
}

impl AccountFetcher {
    pub fn new(source: Arc<dyn InventorySource>, store: Arc<dyn SlotStore>) -> Self {
        Self { source, store }
    }

    /// Never fails: every error becomes a `FetchOutcome::Failure`.
    pub async fn fetch(&self, account_id: &str, slots: &[String]) -> FetchOutcome {
        if slots.is_empty() {
            importer_debug!("Account {} has no slots, skipping", account_id);
            return FetchOutcome::Skipped {
                account_id: account_id.to_string(),
            };
        }

        let failure = |kind: ErrorKind, detail: String| {
            importer_warn!(
                "[run {}] Account {} failed ({}): {}",
                current_run_id(),
                account_id,
                kind,
                detail
            );
            FetchOutcome::Failure {
                account_id: account_id.to_string(),
                kind,
                detail,
            }
        };

        let response = match self.source.get_inventory(account_id).await {
            Ok(response) => response,
            Err(err) => return failure(ErrorKind::NetworkError, err.to_string()),
        };
        if response.status != 200 {
            return failure(
                ErrorKind::HttpError(response.status),
                response.status.to_string(),
            );
        }

        let inventory = match extract_inventory(&response.body) {
            Ok(text) => text,
            Err((kind, detail)) => return failure(kind, detail),
        };

        for slot in slots {
            if let Err(err) = self.store.write(slot, &inventory) {
                importer_warn!(
                    "Account {}: write to slot {:?} failed: {}",
                    account_id,
                    slot,
                    err
                );
            }
        }
        importer_info!(
            "[run {}] Imported inventory of account {} into slots: {}",
            current_run_id(),
            account_id,
            slots.join(", ")
        );
        FetchOutcome::Success {
            account_id: account_id.to_string(),
        }
    }
}

/// Pulls the `inventory` array out of a response body and re-serializes it in
/// compact form with browser-style numbers.
pub fn extract_inventory(body: &str) -> Result<String, (ErrorKind, String)> {
    let parsed: serde_json::Value =
        serde_json::from_str(body).map_err(|err| (ErrorKind::ParseError, err.to_string()))?;
    let inventory = parsed
        .get("inventory")
        .filter(|value| value.is_array())
        .ok_or_else(|| {
            (
                ErrorKind::SchemaError,
                "missing \"inventory\" array".to_string(),
            )
        })?;
    Ok(to_canonical_string(inventory))
}
