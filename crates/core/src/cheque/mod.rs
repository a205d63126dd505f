//! External and personal cheque lifecycle.
//!
//! - External cheques are received from persons, recovered in installments
//!   through history rows, or endorsed over to someone else.
//! - Personal cheques are issued by us and move through a small state machine.

pub mod error;
pub mod service;
pub mod types;

pub use error::ChequeError;
pub use service::ChequeService;
pub use types::{
    ChequeHistory, ChequeSummary, ExternalCheque, ExternalChequeAction, ExternalChequeStatus,
    PersonalCheque, PersonalChequeAction, PersonalChequeStatus,
};
