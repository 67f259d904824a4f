//! Per-kind domain rules for ledger entries.
//!
//! Rules that depend on the ledger kind rather than on reference data:
//! amount sign, odometer presence, and the monotonic odometer check for
//! fuel entries. The monotonic rule compares against the most recent
//! approved reading, which the caller looks up and passes in.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tallix_shared::types::{EntryId, SubjectId};

use super::error::LedgerError;
use super::types::LedgerKind;

/// The most recent approved odometer reading for a subject.
///
/// Produced by a store query ordered by entry date, then reading,
/// descending, over active approved fuel entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorReading {
    /// The version row carrying the reading.
    pub entry_id: EntryId,
    /// Entry date of that version.
    pub entry_date: NaiveDate,
    /// The reading itself.
    pub odometer: Decimal,
}

/// Checks that the amount is non-negative.
///
/// Direction comes from the transaction type, so the stored amount is
/// always an absolute value. Zero is allowed.
///
/// # Errors
///
/// Returns `NegativeAmount` for amounts below zero.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount(amount));
    }
    Ok(())
}

/// Checks that the odometer field matches the ledger kind.
///
/// Fuel entries must carry a reading; expense entries must not.
///
/// # Errors
///
/// Returns `MissingOdometer` or `UnexpectedOdometer`.
pub fn validate_kind_shape(
    kind: LedgerKind,
    odometer: Option<Decimal>,
) -> Result<(), LedgerError> {
    match (kind.tracks_odometer(), odometer) {
        (true, None) => Err(LedgerError::MissingOdometer { kind }),
        (false, Some(_)) => Err(LedgerError::UnexpectedOdometer { kind }),
        _ => Ok(()),
    }
}

/// Checks that a new odometer reading does not regress.
///
/// `prior` is the latest approved reading for the subject, excluding the
/// chain being written; `None` means no approved reading exists and any
/// value is acceptable. Equal readings are allowed, the counter must not
/// decrease.
///
/// # Errors
///
/// Returns `OdometerRegression` when the new value is below the prior one.
pub fn check_monotonic(
    subject_id: SubjectId,
    new_value: Decimal,
    prior: Option<&PriorReading>,
) -> Result<(), LedgerError> {
    if let Some(prior) = prior {
        if new_value < prior.odometer {
            return Err(LedgerError::OdometerRegression {
                subject_id,
                new_value,
                previous_value: prior.odometer,
                previous_date: prior.entry_date,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;

    fn reading(odometer: Decimal) -> PriorReading {
        PriorReading {
            entry_id: EntryId::new(),
            entry_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            odometer,
        }
    }

    /// Strategy for generating decimal amounts with two fraction digits.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any non-negative amount passes, any negative amount fails.
        #[test]
        fn prop_amount_sign_decides(cents in -100_000_000i64..100_000_000i64) {
            let amount = Decimal::new(cents, 2);
            let result = validate_amount(amount);
            if cents < 0 {
                prop_assert!(
                    matches!(result, Err(LedgerError::NegativeAmount(_))),
                    "negative amount should be rejected, got: {:?}",
                    result
                );
            } else {
                prop_assert!(result.is_ok());
            }
        }

        /// A reading at or above the prior one is never a regression.
        #[test]
        fn prop_non_decreasing_reading_accepted(
            prior in amount_strategy(),
            delta in amount_strategy(),
        ) {
            let result = check_monotonic(SubjectId::new(), prior + delta, Some(&reading(prior)));
            prop_assert!(result.is_ok());
        }

        /// A reading strictly below the prior one is always a regression.
        #[test]
        fn prop_decreasing_reading_rejected(
            new_value in amount_strategy(),
            drop_cents in 1i64..100_000_000i64,
        ) {
            let prior = new_value + Decimal::new(drop_cents, 2);
            let result = check_monotonic(SubjectId::new(), new_value, Some(&reading(prior)));
            prop_assert!(
                matches!(result, Err(LedgerError::OdometerRegression { .. })),
                "regressing reading should be rejected, got: {:?}",
                result
            );
        }

        /// With no prior reading, any value is acceptable.
        #[test]
        fn prop_first_reading_always_accepted(new_value in amount_strategy()) {
            prop_assert!(check_monotonic(SubjectId::new(), new_value, None).is_ok());
        }
    }

    #[test]
    fn test_fuel_requires_odometer() {
        assert!(matches!(
            validate_kind_shape(LedgerKind::Fuel, None),
            Err(LedgerError::MissingOdometer {
                kind: LedgerKind::Fuel
            })
        ));
        assert!(validate_kind_shape(LedgerKind::Fuel, Some(dec!(42100))).is_ok());
    }

    #[test]
    fn test_expense_forbids_odometer() {
        assert!(matches!(
            validate_kind_shape(LedgerKind::Expense, Some(dec!(42100))),
            Err(LedgerError::UnexpectedOdometer {
                kind: LedgerKind::Expense
            })
        ));
        assert!(validate_kind_shape(LedgerKind::Expense, None).is_ok());
    }

    #[test]
    fn test_equal_reading_is_not_a_regression() {
        let prior = reading(dec!(42100));
        assert!(check_monotonic(SubjectId::new(), dec!(42100), Some(&prior)).is_ok());
    }

    #[test]
    fn test_regression_error_carries_both_values() {
        let subject_id = SubjectId::new();
        let prior = reading(dec!(42100));
        let err = check_monotonic(subject_id, dec!(41999.9), Some(&prior)).unwrap_err();
        match err {
            LedgerError::OdometerRegression {
                subject_id: reported,
                new_value,
                previous_value,
                previous_date,
            } => {
                assert_eq!(reported, subject_id);
                assert_eq!(new_value, dec!(41999.9));
                assert_eq!(previous_value, dec!(42100));
                assert_eq!(previous_date, prior.entry_date);
            }
            other => panic!("expected OdometerRegression, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        assert!(validate_amount(Decimal::ZERO).is_ok());
    }
}
