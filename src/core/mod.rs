/// Coach records and their computed student assignments
pub mod coach;
/// Contracts binding students to packages
pub mod contract;
/// Invoices with balances derived from payments
pub mod invoice;
/// Currency rounding and amount validation
pub mod money;
/// Sellable packages
pub mod package;
/// Guardians
pub mod parent;
/// Partial-update deserialization helpers
pub mod patch;
/// Payments and their revenue split snapshot
pub mod payment;
/// Dashboard, dues and per-coach revenue reports
pub mod report;
/// Coach/management revenue split
pub mod revenue;
/// Installment plans
pub mod schedule;
/// Invoice and installment status rules
pub mod status;
/// Student records
pub mod student;
