use heloc_core::scenarios::{
    apply_scenarios, monthly_amount, ExpenseScenario, Frequency, IncomeScenario,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn income(name: &str, amount: Decimal, start: u32, end: Option<u32>, freq: Frequency) -> IncomeScenario {
    IncomeScenario {
        name: name.into(),
        amount,
        start_month: start,
        end_month: end,
        frequency: freq,
        is_active: true,
        tax_rate: dec!(0.25),
    }
}

fn expense(name: &str, amount: Decimal, start: u32, end: Option<u32>, freq: Frequency) -> ExpenseScenario {
    ExpenseScenario {
        name: name.into(),
        amount,
        start_month: start,
        end_month: end,
        frequency: freq,
        is_active: true,
        is_essential: false,
        priority_level: 5,
    }
}

// ===========================================================================
// Recurrence timing
// ===========================================================================

#[test]
fn test_one_time_contributes_exactly_once() {
    for month in 1..=24u32 {
        let amount = monthly_amount(dec!(5000), Frequency::OneTime, month, 6);
        if month == 6 {
            assert_eq!(amount, dec!(5000));
        } else {
            assert_eq!(amount, Decimal::ZERO, "month {month}");
        }
    }
}

#[test]
fn test_quarterly_fires_every_third_month() {
    let firing: Vec<u32> = (1..=24)
        .filter(|&m| !monthly_amount(dec!(900), Frequency::Quarterly, m, 2).is_zero())
        .collect();
    assert_eq!(firing, vec![2, 5, 8, 11, 14, 17, 20, 23]);
}

#[test]
fn test_annual_fires_every_twelfth_month() {
    let firing: Vec<u32> = (1..=36)
        .filter(|&m| !monthly_amount(dec!(4000), Frequency::Annually, m, 12).is_zero())
        .collect();
    assert_eq!(firing, vec![12, 24, 36]);
}

// ===========================================================================
// End-to-end adjustment cases
// ===========================================================================

#[test]
fn test_raise_with_tax_end_to_end() {
    let incomes = vec![income("Raise", dec!(500), 13, None, Frequency::Monthly)];

    let before = apply_scenarios(dec!(6000), dec!(4000), 1, &incomes, &[]);
    assert_eq!(before.adjusted_income, dec!(6000));
    assert_eq!(before.discretionary_income, dec!(2000));

    let after = apply_scenarios(dec!(6000), dec!(4000), 13, &incomes, &[]);
    assert_eq!(after.adjusted_income, dec!(6375));
    assert_eq!(after.discretionary_income, dec!(2375));
}

#[test]
fn test_one_time_expense_end_to_end() {
    let expenses = vec![expense("Emergency", dec!(5000), 6, Some(6), Frequency::OneTime)];

    assert_eq!(
        apply_scenarios(dec!(6000), dec!(4000), 5, &[], &expenses).adjusted_expenses,
        dec!(4000)
    );
    assert_eq!(
        apply_scenarios(dec!(6000), dec!(4000), 6, &[], &expenses).adjusted_expenses,
        dec!(9000)
    );
    assert_eq!(
        apply_scenarios(dec!(6000), dec!(4000), 7, &[], &expenses).adjusted_expenses,
        dec!(4000)
    );
}

#[test]
fn test_overlapping_scenarios_stack() {
    let incomes = vec![
        income("Raise", dec!(500), 1, None, Frequency::Monthly),
        income("Bonus", dec!(8000), 12, Some(12), Frequency::OneTime),
    ];
    let expenses = vec![
        expense("Daycare", dec!(1100), 1, Some(60), Frequency::Monthly),
        expense("Insurance", dec!(600), 3, None, Frequency::Quarterly),
    ];

    // Month 12: raise (375 net) + bonus (6000 net), daycare (1100),
    // insurance fires at 3, 6, 9, 12 (1100 + 600).
    let adj = apply_scenarios(dec!(6000), dec!(4000), 12, &incomes, &expenses);
    assert_eq!(adj.adjusted_income, dec!(6000) + dec!(375) + dec!(6000));
    assert_eq!(adj.adjusted_expenses, dec!(4000) + dec!(1100) + dec!(600));
    assert_eq!(
        adj.discretionary_income,
        adj.adjusted_income - adj.adjusted_expenses
    );
    assert_eq!(adj.scenarios_applied.len(), 4);
}

#[test]
fn test_discretionary_can_go_negative() {
    let expenses = vec![expense("Major repair", dec!(9000), 2, Some(2), Frequency::OneTime)];
    let adj = apply_scenarios(dec!(6000), dec!(4000), 2, &[], &expenses);
    assert_eq!(adj.discretionary_income, dec!(-7000));
}

#[test]
fn test_audit_trail_names_scenarios() {
    let incomes = vec![income("Side gig", dec!(400), 1, None, Frequency::Monthly)];
    let adj = apply_scenarios(dec!(6000), dec!(4000), 1, &incomes, &[]);
    assert_eq!(adj.scenarios_applied.len(), 1);
    assert!(adj.scenarios_applied[0].contains("Side gig"));
}
