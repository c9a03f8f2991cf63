//! Patient Domain - accounts, appointments, and code allocation
//!
//! This crate owns the patient aggregate: the prepaid wallet balance and
//! the intake workflow status, both of which the billing engine mutates on
//! successful payments, plus the slim appointment record that invoices
//! reference and the facility-scoped patient code allocator.

pub mod appointment;
pub mod code;
pub mod error;
pub mod patient;
pub mod ports;
pub mod services;

pub use appointment::{Appointment, AppointmentStatus};
pub use code::{allocate_code, InvalidPatientCode, PatientCode};
pub use error::PatientError;
pub use patient::{Patient, PatientStatus};
pub use ports::PatientPort;
pub use services::{PatientService, RegisterPatientRequest};
