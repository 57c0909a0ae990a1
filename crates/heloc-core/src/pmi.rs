//! Loan-to-value and mortgage-insurance primitives shared by the engines and
//! the validation layer.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalculationError;
use crate::types::{Money, Rate};
use crate::CalcResult;

/// LTV above which mortgage insurance is required on a conventional loan.
const MIP_REQUIRED_LTV: Decimal = dec!(80);

// ---------------------------------------------------------------------------
// LTV
// ---------------------------------------------------------------------------

/// Loan-to-value as a percentage (e.g. 83.5 for 83.5%).
///
/// Errors with `INVALID_CALCULATION_INPUT` on non-positive loan or value;
/// use [`safe_ltv_calculation`] at call sites that must not fail.
pub fn calculate_ltv(loan_amount: Money, property_value: Money) -> CalcResult<Decimal> {
    if loan_amount <= Decimal::ZERO {
        return Err(CalculationError::invalid_input(
            "loan_amount",
            format!("must be positive, got {loan_amount}"),
        ));
    }
    if property_value <= Decimal::ZERO {
        return Err(CalculationError::invalid_input(
            "property_value",
            format!("must be positive, got {property_value}"),
        ));
    }
    Ok(loan_amount / property_value * dec!(100))
}

/// Whether mortgage insurance is required at this LTV. Exactly `ltv > 80`.
pub fn is_mip_required(ltv: Decimal) -> bool {
    ltv > MIP_REQUIRED_LTV
}

/// Non-throwing LTV result for live-typing call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeLtvResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ltv_ratio: Option<Decimal>,
    pub can_calculate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Wrapper around [`calculate_ltv`] that reports failure as data instead of
/// an error, for UI validation while the user is still typing.
pub fn safe_ltv_calculation(loan_amount: Money, property_value: Money) -> SafeLtvResult {
    match calculate_ltv(loan_amount, property_value) {
        Ok(ltv) => SafeLtvResult {
            success: true,
            ltv_ratio: Some(ltv),
            can_calculate: true,
            error: None,
        },
        Err(e) => SafeLtvResult {
            success: false,
            ltv_ratio: None,
            can_calculate: false,
            error: Some(e.user_message),
        },
    }
}

// ---------------------------------------------------------------------------
// PMI rate table
// ---------------------------------------------------------------------------

/// Annual PMI rate by LTV bracket.
pub fn pmi_annual_rate(ltv: Decimal) -> Rate {
    if ltv <= MIP_REQUIRED_LTV {
        Decimal::ZERO
    } else if ltv <= dec!(85) {
        dec!(0.005)
    } else if ltv <= dec!(90) {
        dec!(0.0075)
    } else if ltv <= dec!(95) {
        dec!(0.010)
    } else {
        dec!(0.0125)
    }
}

/// Suggested monthly PMI premium, rounded to whole dollars.
pub fn suggested_monthly_pmi(loan_amount: Money, ltv: Decimal) -> Money {
    let annual = loan_amount * pmi_annual_rate(ltv);
    (annual / dec!(12)).round()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ltv_basic() {
        let ltv = calculate_ltv(dec!(240000), dec!(300000)).unwrap();
        assert_eq!(ltv, dec!(80));
    }

    #[test]
    fn test_ltv_monotonic_in_loan() {
        let low = calculate_ltv(dec!(200000), dec!(300000)).unwrap();
        let high = calculate_ltv(dec!(250000), dec!(300000)).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_ltv_monotonic_in_value() {
        let low = calculate_ltv(dec!(240000), dec!(320000)).unwrap();
        let high = calculate_ltv(dec!(240000), dec!(280000)).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_ltv_rejects_zero_value() {
        assert!(calculate_ltv(dec!(240000), Decimal::ZERO).is_err());
        assert!(calculate_ltv(Decimal::ZERO, dec!(300000)).is_err());
        assert!(calculate_ltv(dec!(-1), dec!(300000)).is_err());
    }

    #[test]
    fn test_mip_required_exact_boundary() {
        assert!(!is_mip_required(dec!(80.0)));
        assert!(is_mip_required(dec!(80.0001)));
        assert!(is_mip_required(dec!(95)));
        assert!(!is_mip_required(dec!(62.5)));
    }

    #[test]
    fn test_pmi_rate_table() {
        assert_eq!(pmi_annual_rate(dec!(85)), dec!(0.005));
        assert_eq!(pmi_annual_rate(dec!(90)), dec!(0.0075));
        assert_eq!(pmi_annual_rate(dec!(95)), dec!(0.010));
        assert_eq!(pmi_annual_rate(dec!(97)), dec!(0.0125));
        assert_eq!(pmi_annual_rate(dec!(78)), Decimal::ZERO);
    }

    #[test]
    fn test_suggested_monthly_pmi_rounds_to_dollars() {
        // 250000 * 0.0075 / 12 = 156.25 → 156
        assert_eq!(suggested_monthly_pmi(dec!(250000), dec!(90)), dec!(156));
        // 300000 * 0.010 / 12 = 250
        assert_eq!(suggested_monthly_pmi(dec!(300000), dec!(95)), dec!(250));
        assert_eq!(suggested_monthly_pmi(dec!(300000), dec!(75)), Decimal::ZERO);
    }

    #[test]
    fn test_safe_ltv_reports_error_as_data() {
        let ok = safe_ltv_calculation(dec!(240000), dec!(300000));
        assert!(ok.success && ok.can_calculate);
        assert_eq!(ok.ltv_ratio, Some(dec!(80)));

        let bad = safe_ltv_calculation(dec!(240000), Decimal::ZERO);
        assert!(!bad.success && !bad.can_calculate);
        assert!(bad.ltv_ratio.is_none());
        assert!(bad.error.is_some());
    }
}
