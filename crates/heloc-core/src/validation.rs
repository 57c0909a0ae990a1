//! Pre-flight validation of calculator form input: a range table keyed by a
//! field enum plus hand-written cross-field consistency rules. Always
//! returns a full report; never fails part-way through.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::pmi::{calculate_ltv, is_mip_required};
use crate::scenarios::Scenario;
use crate::types::{Money, Rate};

/// Allowed drift between the supplied discretionary income and
/// `net - expenses`.
const DISCRETIONARY_TOLERANCE: Decimal = dec!(50);

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Field enum and range table
// ---------------------------------------------------------------------------

/// Every calculator field with a range rule. Keying the table on this enum
/// keeps the lookup exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Principal,
    AnnualInterestRate,
    TermInMonths,
    MonthlyPayment,
    PropertyValue,
    PmiMonthly,
    MonthlyGrossIncome,
    MonthlyNetIncome,
    MonthlyExpenses,
    DiscretionaryIncome,
    PrincipalMultiplier,
    HelocLimit,
    HelocRate,
    HelocAvailableCredit,
}

/// Inclusive range with its user-facing violation message.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub min: Decimal,
    pub max: Decimal,
    pub message: &'static str,
}

/// Range rule for a field.
pub fn rule(field: Field) -> ValidationRule {
    match field {
        Field::Principal => ValidationRule {
            min: dec!(1000),
            max: dec!(50000000),
            message: "Loan principal must be between $1,000 and $50,000,000",
        },
        Field::AnnualInterestRate => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(0.30),
            message: "Interest rate must be between 0% and 30% (enter 0.065 for 6.5%)",
        },
        Field::TermInMonths => ValidationRule {
            min: Decimal::ONE,
            max: dec!(600),
            message: "Loan term must be between 1 and 600 months",
        },
        Field::MonthlyPayment => ValidationRule {
            min: Decimal::ONE,
            max: dec!(100000),
            message: "Monthly payment must be between $1 and $100,000",
        },
        Field::PropertyValue => ValidationRule {
            min: dec!(1000),
            max: dec!(100000000),
            message: "Property value must be between $1,000 and $100,000,000",
        },
        Field::PmiMonthly => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(5000),
            message: "Monthly PMI must be between $0 and $5,000",
        },
        Field::MonthlyGrossIncome => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(1000000),
            message: "Monthly gross income must be between $0 and $1,000,000",
        },
        Field::MonthlyNetIncome => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(1000000),
            message: "Monthly net income must be between $0 and $1,000,000",
        },
        Field::MonthlyExpenses => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(1000000),
            message: "Monthly expenses must be between $0 and $1,000,000",
        },
        Field::DiscretionaryIncome => ValidationRule {
            min: dec!(-100000),
            max: dec!(1000000),
            message: "Discretionary income must be between -$100,000 and $1,000,000",
        },
        Field::PrincipalMultiplier => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(10),
            message: "Principal multiplier must be between 0 and 10",
        },
        Field::HelocLimit => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(10000000),
            message: "HELOC limit must be between $0 and $10,000,000",
        },
        Field::HelocRate => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(0.30),
            message: "HELOC rate must be between 0% and 30% (enter 0.085 for 8.5%)",
        },
        Field::HelocAvailableCredit => ValidationRule {
            min: Decimal::ZERO,
            max: dec!(10000000),
            message: "HELOC available credit must be between $0 and $10,000,000",
        },
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A single validation finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFinding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    pub code: ErrorCode,
    pub message: String,
}

/// Accumulated validation result; `is_valid` is false iff `errors` is
/// non-empty. Warnings and suggestions never block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
    pub suggestions: Vec<ValidationFinding>,
}

impl ValidationReport {
    fn new() -> Self {
        ValidationReport {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn error(&mut self, field: Option<Field>, code: ErrorCode, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(ValidationFinding {
            field,
            code,
            message: message.into(),
        });
    }

    fn warning(&mut self, field: Option<Field>, message: impl Into<String>) {
        self.warnings.push(ValidationFinding {
            field,
            code: ErrorCode::ValidationFailed,
            message: message.into(),
        });
    }

    fn suggestion(&mut self, field: Option<Field>, message: impl Into<String>) {
        self.suggestions.push(ValidationFinding {
            field,
            code: ErrorCode::ValidationFailed,
            message: message.into(),
        });
    }
}

/// Raw calculator form values. Absent fields are skipped by the range
/// checks; cross-field rules fire only when every field they need is
/// present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_interest_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_in_months: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmi_monthly: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_gross_income: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_net_income: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_expenses: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discretionary_income: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_multiplier: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heloc_limit: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heloc_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heloc_available_credit: Option<Money>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate calculator inputs. Pure accumulation over an immutable input:
/// calling twice yields identical reports.
pub fn validate_calculator_inputs(input: &ValidationInput) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_range(&mut report, Field::Principal, input.principal);
    check_range(&mut report, Field::AnnualInterestRate, input.annual_interest_rate);
    check_range(&mut report, Field::TermInMonths, input.term_in_months);
    check_range(&mut report, Field::MonthlyPayment, input.monthly_payment);
    check_range(&mut report, Field::PropertyValue, input.property_value);
    check_range(&mut report, Field::PmiMonthly, input.pmi_monthly);
    check_range(&mut report, Field::MonthlyGrossIncome, input.monthly_gross_income);
    check_range(&mut report, Field::MonthlyNetIncome, input.monthly_net_income);
    check_range(&mut report, Field::MonthlyExpenses, input.monthly_expenses);
    check_range(&mut report, Field::DiscretionaryIncome, input.discretionary_income);
    check_range(&mut report, Field::PrincipalMultiplier, input.principal_multiplier);
    check_range(&mut report, Field::HelocLimit, input.heloc_limit);
    check_range(&mut report, Field::HelocRate, input.heloc_rate);
    check_range(&mut report, Field::HelocAvailableCredit, input.heloc_available_credit);

    if let Some(term) = input.term_in_months {
        if !term.fract().is_zero() {
            report.error(
                Some(Field::TermInMonths),
                ErrorCode::InvalidLoanTerm,
                "Loan term must be a whole number of months",
            );
        }
    }

    // --- Cross-field rules ---

    if let (Some(net), Some(gross)) = (input.monthly_net_income, input.monthly_gross_income) {
        if net > gross {
            report.error(
                Some(Field::MonthlyNetIncome),
                ErrorCode::ValidationFailed,
                "Net income cannot exceed gross income",
            );
        }
    }

    if let (Some(expenses), Some(net)) = (input.monthly_expenses, input.monthly_net_income) {
        if expenses > net {
            report.error(
                Some(Field::MonthlyExpenses),
                ErrorCode::InsufficientDiscretionary,
                "Monthly expenses exceed net income — there is no discretionary income to accelerate with",
            );
        }
    }

    if let (Some(discretionary), Some(net), Some(expenses)) = (
        input.discretionary_income,
        input.monthly_net_income,
        input.monthly_expenses,
    ) {
        let derived = net - expenses;
        if (discretionary - derived).abs() > DISCRETIONARY_TOLERANCE {
            report.error(
                Some(Field::DiscretionaryIncome),
                ErrorCode::ValidationFailed,
                format!(
                    "Discretionary income {discretionary} does not match net income minus expenses ({derived})"
                ),
            );
        }
    }

    if let (Some(available), Some(limit)) = (input.heloc_available_credit, input.heloc_limit) {
        if available > limit {
            report.error(
                Some(Field::HelocAvailableCredit),
                ErrorCode::HelocExceedsLimit,
                "HELOC available credit cannot exceed the HELOC limit",
            );
        }
    }

    // Negative amortization pre-check: the engines run bounded rather than
    // detect this, so it is caught here.
    if let (Some(payment), Some(rate)) = (input.monthly_payment, input.annual_interest_rate) {
        if let Some(balance) = input.current_balance.or(input.principal) {
            let monthly_interest = balance * rate / MONTHS_PER_YEAR;
            if payment <= monthly_interest {
                report.error(
                    Some(Field::MonthlyPayment),
                    ErrorCode::NegativeAmortization,
                    format!(
                        "Payment {payment} does not cover the monthly interest of {monthly_interest:.2} — the balance will never decrease"
                    ),
                );
            }
        }
    }

    // LTV-driven PMI requirement.
    if let (Some(balance), Some(value)) = (
        input.current_balance.or(input.principal),
        input.property_value,
    ) {
        if let Ok(ltv) = calculate_ltv(balance, value) {
            if ltv > dec!(100) {
                report.error(
                    None,
                    ErrorCode::UnderwaterMortgage,
                    format!("Loan balance exceeds property value (LTV {ltv:.1}%)"),
                );
            }
            let pmi = input.pmi_monthly.unwrap_or(Decimal::ZERO);
            if is_mip_required(ltv) && pmi.is_zero() {
                report.error(
                    Some(Field::PmiMonthly),
                    ErrorCode::ValidationFailed,
                    format!("PMI is required at {ltv:.1}% LTV — enter your monthly PMI premium"),
                );
            } else if !is_mip_required(ltv) && pmi > Decimal::ZERO {
                report.suggestion(
                    Some(Field::PmiMonthly),
                    format!(
                        "LTV is {ltv:.1}% — PMI may no longer be necessary; consider requesting removal"
                    ),
                );
            }
        }
    }

    report
}

fn check_range(report: &mut ValidationReport, field: Field, value: Option<Decimal>) {
    let Some(value) = value else { return };
    let rule = rule(field);
    if value < rule.min || value > rule.max {
        report.error(Some(field), ErrorCode::ValidationFailed, rule.message);
    }
}

/// Validate a list of scenarios against the data-model constraints.
pub fn validate_scenarios(scenarios: &[Scenario]) -> ValidationReport {
    let mut report = ValidationReport::new();

    for scenario in scenarios {
        match scenario {
            Scenario::Income(s) => {
                check_window(&mut report, &s.name, s.start_month, s.end_month, s.frequency);
                if s.tax_rate < Decimal::ZERO || s.tax_rate > Decimal::ONE {
                    report.error(
                        None,
                        ErrorCode::ValidationFailed,
                        format!("Scenario '{}': tax rate must be between 0 and 1", s.name),
                    );
                }
                if s.amount.is_zero() {
                    report.warning(
                        None,
                        format!("Scenario '{}' has a zero amount and no effect", s.name),
                    );
                }
            }
            Scenario::Expense(s) => {
                check_window(&mut report, &s.name, s.start_month, s.end_month, s.frequency);
                if s.amount <= Decimal::ZERO {
                    report.error(
                        None,
                        ErrorCode::ValidationFailed,
                        format!(
                            "Scenario '{}': expense amounts must be positive (model income changes as income scenarios)",
                            s.name
                        ),
                    );
                }
                if !(1..=10).contains(&s.priority_level) {
                    report.error(
                        None,
                        ErrorCode::ValidationFailed,
                        format!("Scenario '{}': priority level must be between 1 and 10", s.name),
                    );
                }
            }
        }
    }

    report
}

fn check_window(
    report: &mut ValidationReport,
    name: &str,
    start_month: u32,
    end_month: Option<u32>,
    frequency: crate::scenarios::Frequency,
) {
    if start_month < 1 {
        report.error(
            None,
            ErrorCode::ValidationFailed,
            format!("Scenario '{name}': start month must be at least 1"),
        );
    }
    if let Some(end) = end_month {
        if end < start_month {
            report.error(
                None,
                ErrorCode::ValidationFailed,
                format!("Scenario '{name}': end month must not precede start month"),
            );
        }
        if frequency == crate::scenarios::Frequency::OneTime && end != start_month {
            report.error(
                None,
                ErrorCode::ValidationFailed,
                format!("Scenario '{name}': one-time scenarios must end the month they start"),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
