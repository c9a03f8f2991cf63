//! Patient domain ports
//!
//! The `PatientPort` trait defines everything the patient domain needs
//! from its data source. Adapters implement it against a real store; the
//! in-memory adapter in `infra_mem` backs the test suites. Every method is
//! scoped by facility: a row from another facility does not exist as far
//! as these queries are concerned.

use async_trait::async_trait;

use core_kernel::{AppointmentId, DomainPort, FacilityId, PatientId, PortError};

use crate::appointment::Appointment;
use crate::code::PatientCode;
use crate::patient::Patient;

/// Store operations for patients and appointments
#[async_trait]
pub trait PatientPort: DomainPort {
    /// Fetches a patient by id within the facility
    async fn get_patient(
        &self,
        facility_id: FacilityId,
        id: PatientId,
    ) -> Result<Option<Patient>, PortError>;

    /// The facility's most recently created patient, if any
    async fn latest_patient(&self, facility_id: FacilityId) -> Result<Option<Patient>, PortError>;

    /// Every patient code in use at the facility
    async fn patient_codes(&self, facility_id: FacilityId) -> Result<Vec<PatientCode>, PortError>;

    /// Persists a new patient; fails with `Conflict` if the code is taken
    async fn insert_patient(&self, patient: &Patient) -> Result<(), PortError>;

    /// Fetches an appointment owned by the given patient within the facility
    async fn get_appointment(
        &self,
        facility_id: FacilityId,
        patient_id: PatientId,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, PortError>;

    /// Persists a new appointment
    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), PortError>;
}
