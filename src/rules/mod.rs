pub mod clock;
pub mod eligibility;
