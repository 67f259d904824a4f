//! Reference validation for ledger entries.
//!
//! Categories and payment modes are matched against externally supplied
//! allow-lists, and entry dates are checked against a configurable
//! lookback window. The allow-lists come in through
//! [`ReferenceDataProvider`] so validation stays independent of where
//! the configuration is stored.

use chrono::NaiveDate;

use super::error::LedgerError;

/// Source of the reference allow-lists.
///
/// Implementations are read-only from the validator's perspective;
/// staleness only affects error messages, never chain correctness.
pub trait ReferenceDataProvider {
    /// Categories an entry may use.
    fn allowed_categories(&self) -> &[String];

    /// Payment modes an entry may use.
    fn allowed_payment_modes(&self) -> &[String];
}

/// In-memory reference lists, the plain implementation of
/// [`ReferenceDataProvider`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceLists {
    /// Allowed categories.
    pub categories: Vec<String>,
    /// Allowed payment modes.
    pub payment_modes: Vec<String>,
}

impl ReferenceLists {
    /// Creates reference lists from the two allow-lists.
    #[must_use]
    pub const fn new(categories: Vec<String>, payment_modes: Vec<String>) -> Self {
        Self {
            categories,
            payment_modes,
        }
    }
}

impl ReferenceDataProvider for ReferenceLists {
    fn allowed_categories(&self) -> &[String] {
        &self.categories
    }

    fn allowed_payment_modes(&self) -> &[String] {
        &self.payment_modes
    }
}

/// Validates reference fields and the entry-date window.
#[derive(Debug, Clone)]
pub struct ReferenceValidator<P> {
    provider: P,
    lookback_days: u32,
}

impl<P: ReferenceDataProvider> ReferenceValidator<P> {
    /// Creates a validator over the given provider and lookback window.
    #[must_use]
    pub const fn new(provider: P, lookback_days: u32) -> Self {
        Self {
            provider,
            lookback_days,
        }
    }

    /// Validates category, payment mode, and entry date together.
    ///
    /// `today` is the current date in the acting user's timezone; callers
    /// derive it from the request context so the future-date check follows
    /// the user's clock, not the server's.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate(
        &self,
        category: &str,
        payment_mode: &str,
        entry_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), LedgerError> {
        self.validate_category(category)?;
        self.validate_payment_mode(payment_mode)?;
        self.validate_entry_date(entry_date, today)?;
        Ok(())
    }

    /// Checks the category against the allow-list.
    ///
    /// Matching is case-sensitive; the input is trimmed first. The error
    /// enumerates the allowed values.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` when the value is not on the list.
    pub fn validate_category(&self, category: &str) -> Result<(), LedgerError> {
        let candidate = category.trim();
        let allowed = self.provider.allowed_categories();
        if allowed.iter().any(|c| c == candidate) {
            Ok(())
        } else {
            Err(LedgerError::UnknownCategory {
                category: candidate.to_string(),
                allowed: allowed.to_vec(),
            })
        }
    }

    /// Checks the payment mode against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPaymentMode` when the value is not on the list.
    pub fn validate_payment_mode(&self, payment_mode: &str) -> Result<(), LedgerError> {
        let candidate = payment_mode.trim();
        let allowed = self.provider.allowed_payment_modes();
        if allowed.iter().any(|m| m == candidate) {
            Ok(())
        } else {
            Err(LedgerError::UnknownPaymentMode {
                payment_mode: candidate.to_string(),
                allowed: allowed.to_vec(),
            })
        }
    }

    /// Checks that the entry date is not in the future and not older
    /// than the configured lookback window. Both boundaries are
    /// inclusive: today and the window's first day are valid entry dates.
    ///
    /// # Errors
    ///
    /// Returns `FutureDate` or `TooOld`.
    pub fn validate_entry_date(
        &self,
        entry_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), LedgerError> {
        if entry_date > today {
            return Err(LedgerError::FutureDate { entry_date, today });
        }
        let age_days = (today - entry_date).num_days();
        if age_days > i64::from(self.lookback_days) {
            return Err(LedgerError::TooOld {
                entry_date,
                today,
                allowed_days: self.lookback_days,
            });
        }
        Ok(())
    }
}
