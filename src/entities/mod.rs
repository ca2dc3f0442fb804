//! Entity module - Contains all SeaORM entity definitions for the collection store.
//! Each collection is one table; records reference each other by id only, so
//! deleting a record never cascades or blocks on dependents.

pub mod coach;
pub mod contract;
pub mod invoice;
pub mod package;
pub mod parent;
pub mod payment;
pub mod payment_schedule;
pub mod sea_orm_active_enums;
pub mod student;

// Re-export specific types to avoid conflicts
pub use coach::{Column as CoachColumn, Entity as Coach, Model as CoachModel};
pub use contract::{Column as ContractColumn, Entity as Contract, Model as ContractModel};
pub use invoice::{Column as InvoiceColumn, Entity as Invoice, Model as InvoiceModel};
pub use package::{Column as PackageColumn, Entity as Package, Model as PackageModel};
pub use parent::{Column as ParentColumn, Entity as Parent, Model as ParentModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use payment_schedule::{
    Column as PaymentScheduleColumn, Entity as PaymentSchedule, Model as PaymentScheduleModel,
};
pub use sea_orm_active_enums::{
    ActivityStatus, ContactChannel, ContractStatus, PaymentCycle, PaymentMethod,
};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
