use heloc_core::amortization::{
    generate_amortization_schedule, monthly_payment, remaining_balance, MortgageInput,
};
use heloc_core::BALANCE_EPSILON;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Payment formula tests
// ===========================================================================

#[test]
fn test_payment_reference_values() {
    // $200,000 at 6.5% over 30 years ≈ $1,264.14 (standard reference)
    let p = monthly_payment(dec!(200000), dec!(0.065), 360).unwrap();
    assert!((p - dec!(1264.14)).abs() < dec!(0.50), "payment {p}");

    // $100,000 at 4% over 15 years ≈ $739.69
    let p = monthly_payment(dec!(100000), dec!(0.04), 180).unwrap();
    assert!((p - dec!(739.69)).abs() < dec!(0.50), "payment {p}");
}

#[test]
fn test_zero_rate_payment_is_exact() {
    assert_eq!(monthly_payment(dec!(240000), Decimal::ZERO, 240).unwrap(), dec!(1000));
    assert_eq!(monthly_payment(dec!(1), Decimal::ZERO, 1).unwrap(), dec!(1));
}

// ===========================================================================
// Schedule property tests
// ===========================================================================

fn schedule_input(principal: Decimal, rate: Decimal, term: u32) -> MortgageInput {
    MortgageInput {
        principal,
        annual_interest_rate: rate,
        term_in_months: term,
        current_balance: None,
        monthly_payment: None,
        property_value: None,
        pmi_monthly: None,
    }
}

#[test]
fn test_schedule_terminates_and_chains_across_inputs() {
    let cases = [
        (dec!(100000), dec!(0.03), 120u32),
        (dec!(250000), dec!(0.065), 360),
        (dec!(500000), dec!(0.0999), 360),
        (dec!(50000), Decimal::ZERO, 60),
        (dec!(1000), dec!(0.30), 12),
    ];

    for (principal, rate, term) in cases {
        let out = generate_amortization_schedule(&schedule_input(principal, rate, term)).unwrap();
        let schedule = &out.result.schedule;

        assert!(!schedule.is_empty());
        assert!(schedule.len() as u32 <= term);
        assert!(schedule.last().unwrap().ending_balance <= BALANCE_EPSILON);

        for pair in schedule.windows(2) {
            assert_eq!(pair[0].ending_balance, pair[1].beginning_balance);
            assert_eq!(pair[1].month, pair[0].month + 1);
        }

        for row in schedule {
            assert_eq!(
                row.ending_balance,
                row.beginning_balance - row.principal_payment
            );
        }
    }
}

#[test]
fn test_cumulative_totals_match_sums() {
    let out = generate_amortization_schedule(&schedule_input(dec!(180000), dec!(0.055), 240)).unwrap();
    let schedule = &out.result.schedule;

    let mut interest_sum = Decimal::ZERO;
    let mut principal_sum = Decimal::ZERO;
    for row in schedule {
        interest_sum += row.interest_payment;
        principal_sum += row.principal_payment;
        assert_eq!(row.cumulative_interest, interest_sum);
        assert_eq!(row.cumulative_principal, principal_sum);
    }

    assert_eq!(out.result.total_interest, interest_sum);
    // All principal returned over the life of the loan.
    assert!((principal_sum - dec!(180000)).abs() <= BALANCE_EPSILON);
}

#[test]
fn test_zero_rate_schedule_is_straight_line() {
    let out = generate_amortization_schedule(&schedule_input(dec!(120000), Decimal::ZERO, 120)).unwrap();
    assert_eq!(out.result.monthly_payment, dec!(1000));
    assert_eq!(out.result.total_interest, Decimal::ZERO);
    assert_eq!(out.result.payoff_months, 120);
    for row in &out.result.schedule {
        assert_eq!(row.interest_payment, Decimal::ZERO);
        assert_eq!(row.principal_payment, dec!(1000));
    }
}

// ===========================================================================
// Closed-form remaining balance vs. the iterated schedule
// ===========================================================================

#[test]
fn test_remaining_balance_agrees_with_schedule() {
    let principal = dec!(275000);
    let rate = dec!(0.0575);
    let term = 360u32;
    let out = generate_amortization_schedule(&schedule_input(principal, rate, term)).unwrap();

    for months_paid in [1u32, 12, 60, 180, 300, 359] {
        let closed = remaining_balance(principal, rate, term, months_paid).unwrap();
        let iterated = out.result.schedule[months_paid as usize - 1].ending_balance;
        let diff = (closed - iterated).abs();
        assert!(
            diff < dec!(0.01),
            "after {months_paid} months: closed {closed} vs iterated {iterated}"
        );
    }
}
