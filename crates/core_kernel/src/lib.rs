//! Core Kernel - Foundational types for the clinic billing engine
//!
//! This crate provides the building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers and the request identity context
//! - The shared error taxonomy and port error type
//! - The clock port and facility-local time handling

pub mod clock;
pub mod context;
pub mod error;
pub mod identifiers;
pub mod money;
pub mod ports;

pub use clock::{Clock, ManualClock, SystemClock, Timezone};
pub use context::RequestContext;
pub use error::{Classify, ErrorKind};
pub use identifiers::{AppointmentId, FacilityId, InvoiceId, PatientId, PaymentId, UserId};
pub use money::{Currency, Money, MoneyError};
pub use ports::{DomainPort, PortError};
