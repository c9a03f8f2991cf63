//! Patient domain services

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Clock, Currency, Money, PatientId, RequestContext};

use crate::code::allocate_code;
use crate::error::PatientError;
use crate::patient::Patient;
use crate::ports::PatientPort;

/// Request for registering a new patient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPatientRequest {
    /// Full name
    #[validate(length(min = 1, message = "Patient name is required"))]
    pub name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Wallet currency; defaults to the clinic's home currency
    pub currency: Option<Currency>,
    /// Opening wallet balance
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Registration and lookup for patient accounts
pub struct PatientService {
    store: Arc<dyn PatientPort>,
    clock: Arc<dyn Clock>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientPort>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Registers a patient, allocating the next free facility code
    ///
    /// The new account starts in `Processing` with the requested opening
    /// balance. Code allocation proposes the successor of the latest
    /// patient's code and falls back to a scan when the proposal is taken.
    pub async fn register_patient(
        &self,
        ctx: RequestContext,
        request: RegisterPatientRequest,
    ) -> Result<Patient, PatientError> {
        request
            .validate()
            .map_err(|e| PatientError::validation_field(flatten_errors(&e), "name"))?;

        if request.opening_balance.is_sign_negative() {
            return Err(PatientError::validation_field(
                "Opening balance cannot be negative",
                "opening_balance",
            ));
        }

        let latest = self.store.latest_patient(ctx.facility_id).await?;
        let existing = self.store.patient_codes(ctx.facility_id).await?;
        let code = allocate_code(latest.as_ref().map(|p| &p.code), &existing);

        let currency = request.currency.unwrap_or_default();
        let patient = Patient::new(
            ctx.facility_id,
            code,
            request.name.trim(),
            request.phone.map(|p| p.trim().to_string()),
            Money::new(request.opening_balance, currency),
            self.clock.now(),
        );

        self.store.insert_patient(&patient).await.map_err(|e| {
            if matches!(e, core_kernel::PortError::Conflict { .. }) {
                PatientError::DuplicateCode(patient.code.clone())
            } else {
                PatientError::Store(e)
            }
        })?;

        tracing::info!(
            patient_id = %patient.id,
            code = %patient.code,
            facility_id = %ctx.facility_id,
            "patient registered"
        );

        Ok(patient)
    }

    /// Fetches a patient within the caller's facility
    pub async fn get_patient(
        &self,
        ctx: RequestContext,
        id: PatientId,
    ) -> Result<Patient, PatientError> {
        self.store
            .get_patient(ctx.facility_id, id)
            .await?
            .ok_or_else(|| PatientError::not_found(id))
    }
}

fn flatten_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid value".to_string())
        })
        .collect::<Vec<_>>()
        .join("; ")
}
