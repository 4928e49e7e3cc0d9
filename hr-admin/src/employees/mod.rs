//! Employee roster screen

pub mod controller;
pub mod deletion;
pub mod form;
pub mod page;
pub mod schema;

pub use controller::{EmployeeCollectionController, ListState, QueryIntent, QueryState};
pub use deletion::{DeletionConfirmation, DeletionOutcome};
pub use form::{EmployeeForm, FormMode, SubmitOutcome};
pub use page::EmployeesPage;
