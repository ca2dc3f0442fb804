//! Revenue split between a coach and the institution.
//!
//! The coach share is computed from the percentage and rounded to kuruş; the
//! management share is whatever is left, so the two always add back up to the
//! amount received.

use super::money::{ensure_non_negative, ensure_percentage, round2};
use crate::{entities::coach, errors::Result};
use serde::Serialize;

/// Result of splitting one payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSplit {
    /// Portion kept by the coach
    pub coach_share: f64,
    /// Portion kept by the institution
    pub management_share: f64,
}

/// Where the share percentage used for a payment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareSource {
    /// The coach named on the payment
    Coach,
    /// No coach could be resolved; the configured default was used
    Default,
}

/// Splits `amount` using `share_percentage` (0-100) for the coach.
///
/// # Errors
/// `InvalidAmount` for negative or non-finite amounts, `InvalidPercentage`
/// for percentages outside `0..=100`.
pub fn split_revenue(amount: f64, share_percentage: f64) -> Result<RevenueSplit> {
    let amount = ensure_non_negative(amount)?;
    let share_percentage = ensure_percentage(share_percentage)?;

    let coach_share = round2(amount * share_percentage / 100.0);
    let management_share = round2(amount - coach_share);

    Ok(RevenueSplit {
        coach_share,
        management_share,
    })
}

/// Picks the share percentage for a payment: the coach's own value when a
/// coach was found, otherwise `default_percentage`.
#[must_use]
pub fn resolve_share_percentage(
    coach: Option<&coach::Model>,
    default_percentage: f64,
) -> (f64, ShareSource) {
    coach.map_or((default_percentage, ShareSource::Default), |c| {
        (c.share_percentage, ShareSource::Coach)
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::ActivityStatus;

    fn coach_with_share(share_percentage: f64) -> coach::Model {
        coach::Model {
            id: 1,
            name: "Ayşe Yılmaz".to_string(),
            branches: serde_json::json!(["Matematik"]),
            hourly_rate: 500.0,
            email: "ayse@example.com".to_string(),
            phone: "555".to_string(),
            availability: String::new(),
            share_percentage,
            status: ActivityStatus::Active,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_split_example() {
        let split = split_revenue(1888.0, 60.0).unwrap();
        assert_eq!(split.coach_share, 1132.8);
        assert_eq!(split.management_share, 755.2);
    }

    #[test]
    fn test_split_zero_amount() {
        let split = split_revenue(0.0, 60.0).unwrap();
        assert_eq!(split.coach_share, 0.0);
        assert_eq!(split.management_share, 0.0);
    }

    #[test]
    fn test_split_extreme_percentages() {
        let all_coach = split_revenue(750.0, 100.0).unwrap();
        assert_eq!(all_coach.coach_share, 750.0);
        assert_eq!(all_coach.management_share, 0.0);

        let all_management = split_revenue(750.0, 0.0).unwrap();
        assert_eq!(all_management.coach_share, 0.0);
        assert_eq!(all_management.management_share, 750.0);
    }

    #[test]
    fn test_split_sums_to_amount() {
        let amounts = [0.01, 1.0, 99.99, 333.33, 1234.56, 1888.0, 10_000.0, 12_345.67];
        let percentages = [0.0, 1.0, 12.5, 33.33, 50.0, 60.0, 66.67, 99.0, 100.0];

        for amount in amounts {
            for percentage in percentages {
                let split = split_revenue(amount, percentage).unwrap();
                let total = split.coach_share + split.management_share;
                assert!(
                    (total - amount).abs() < 1e-6,
                    "{amount} at {percentage}% split into {split:?}"
                );
            }
        }
    }

    #[test]
    fn test_split_rejects_bad_input() {
        assert!(matches!(
            split_revenue(100.0, 101.0),
            Err(crate::errors::Error::InvalidPercentage { .. })
        ));
        assert!(matches!(
            split_revenue(100.0, -5.0),
            Err(crate::errors::Error::InvalidPercentage { .. })
        ));
        assert!(matches!(
            split_revenue(-1.0, 50.0),
            Err(crate::errors::Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_resolve_share_percentage() {
        let coach = coach_with_share(70.0);
        assert_eq!(
            resolve_share_percentage(Some(&coach), 60.0),
            (70.0, ShareSource::Coach)
        );
        assert_eq!(
            resolve_share_percentage(None, 60.0),
            (60.0, ShareSource::Default)
        );
    }
}
