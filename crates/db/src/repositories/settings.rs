//! Reference-data repository backed by the `ledger_settings` JSON store.
//!
//! Category and payment-mode allow-lists live in a key/value JSON table so
//! they can be tuned at runtime without a redeploy. Reads go through a small
//! in-memory cache with a configurable TTL; when a key has never been stored
//! the configured defaults are used instead.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::sync::Cache;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde_json::Value as JsonValue;

use tallix_core::ledger::{LedgerError, ReferenceLists};
use tallix_shared::config::LedgerConfig;

use crate::entities::ledger_settings;

/// Settings key holding the category allow-list.
pub const CATEGORIES_KEY: &str = "ledger.categories";

/// Settings key holding the payment-mode allow-list.
pub const PAYMENT_MODES_KEY: &str = "ledger.payment_modes";

/// Maximum number of cached settings values.
const CACHE_CAPACITY: u64 = 32;

/// Repository for tunable reference data.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
    cache: Cache<String, Arc<Vec<String>>>,
    defaults: LedgerConfig,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    ///
    /// `config` supplies the fallback lists and the cache TTL.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &LedgerConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(config.reference_cache_secs))
            .build();

        Self {
            db,
            cache,
            defaults: config.clone(),
        }
    }

    /// Loads both allow-lists as a [`ReferenceLists`] provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a stored value is
    /// not a JSON string array.
    pub async fn reference_lists(&self) -> Result<ReferenceLists, LedgerError> {
        let categories = self
            .string_list(CATEGORIES_KEY, &self.defaults.default_categories)
            .await?;
        let payment_modes = self
            .string_list(PAYMENT_MODES_KEY, &self.defaults.default_payment_modes)
            .await?;

        Ok(ReferenceLists::new(categories, payment_modes))
    }

    /// Stores an allow-list under the given key and drops the cached copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn put_string_list(&self, key: &str, values: &[String]) -> Result<(), LedgerError> {
        let row = ledger_settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(JsonValue::from(values.to_vec())),
            updated_at: Set(Utc::now().into()),
        };

        ledger_settings::Entity::insert(row)
            .on_conflict(
                OnConflict::column(ledger_settings::Column::Key)
                    .update_columns([
                        ledger_settings::Column::Value,
                        ledger_settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        self.cache.invalidate(key);
        Ok(())
    }

    /// Drops every cached settings value.
    ///
    /// Useful after out-of-band changes to the `ledger_settings` table.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    /// Reads one list, consulting the cache first and the fallback last.
    async fn string_list(&self, key: &str, fallback: &[String]) -> Result<Vec<String>, LedgerError> {
        if let Some(cached) = self.cache.get(key) {
            return Ok((*cached).clone());
        }

        let stored = ledger_settings::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let list = match stored {
            Some(row) => decode_string_list(key, &row.value)?,
            None => fallback.to_vec(),
        };

        self.cache.insert(key.to_string(), Arc::new(list.clone()));
        Ok(list)
    }
}

// ============================================================================
// JSON decoding helpers
// ============================================================================

/// Decodes a settings value into a list of strings.
fn decode_string_list(key: &str, value: &JsonValue) -> Result<Vec<String>, LedgerError> {
    serde_json::from_value(value.clone())
        .map_err(|e| LedgerError::Database(format!("malformed settings value for '{key}': {e}")))
}
