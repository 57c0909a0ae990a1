pub mod amortization;
pub mod budgeting;
pub mod heloc;
pub mod scenarios;
pub mod validation;
