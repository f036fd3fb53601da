pub mod hard_money;
pub mod loan_comparison;
