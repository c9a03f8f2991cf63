//! Appointment record
//!
//! Scheduling flows live outside the engine; this record exists so an
//! invoice can reference the visit it bills and so the duplicate-billing
//! guard has something to hold on to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AppointmentId, FacilityId, PatientId};

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    CheckedIn,
    Completed,
    Cancelled,
}

/// A scheduled visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique identifier
    pub id: AppointmentId,
    /// Facility the appointment belongs to
    pub facility_id: FacilityId,
    /// Patient being seen
    pub patient_id: PatientId,
    /// Status
    pub status: AppointmentStatus,
    /// Scheduled start
    pub start_time: DateTime<Utc>,
    /// Scheduled duration
    pub duration_minutes: u32,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Creates a new scheduled appointment
    pub fn new(
        facility_id: FacilityId,
        patient_id: PatientId,
        start_time: DateTime<Utc>,
        duration_minutes: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AppointmentId::new_v7(),
            facility_id,
            patient_id,
            status: AppointmentStatus::Scheduled,
            start_time,
            duration_minutes,
            created_at,
        }
    }
}
