//! Engine test harness
//!
//! Wires the services to the in-memory store and a manual clock, so a
//! test drives the whole engine the way a caller would while controlling
//! time explicitly.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use core_kernel::{ManualClock, RequestContext};
use domain_billing::{BillingConfig, BillingService};
use domain_patient::{
    Appointment, Patient, PatientPort, PatientService, RegisterPatientRequest,
};
use infra_mem::MemoryStore;

use crate::builders::TestAppointmentBuilder;
use crate::fixtures::TemporalFixtures;

static TRACING: Lazy<()> = Lazy::new(|| {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init()
        .ok();
});

/// Installs the test tracing subscriber once per process
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// A fully wired engine over the in-memory store
pub struct TestEngine {
    pub store: MemoryStore,
    pub clock: Arc<ManualClock>,
    pub billing: BillingService,
    pub patients: PatientService,
}

/// Builds an engine with the default configuration
pub fn engine() -> TestEngine {
    engine_with_config(BillingConfig::default())
}

/// Builds an engine with a custom billing configuration
pub fn engine_with_config(config: BillingConfig) -> TestEngine {
    init_tracing();

    let store = MemoryStore::new();
    let clock = Arc::new(ManualClock::new(TemporalFixtures::clinic_morning()));

    let billing = BillingService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        clock.clone(),
        config,
    );
    let patients = PatientService::new(Arc::new(store.clone()), clock.clone());

    TestEngine {
        store,
        clock,
        billing,
        patients,
    }
}

impl TestEngine {
    /// Registers a patient through the service, with an opening balance
    pub async fn seed_patient(&self, ctx: RequestContext, opening_balance: Decimal) -> Patient {
        self.patients
            .register_patient(
                ctx,
                RegisterPatientRequest {
                    name: "Chidi Okafor".to_string(),
                    phone: None,
                    currency: None,
                    opening_balance,
                },
            )
            .await
            .expect("failed to seed patient")
    }

    /// Inserts an appointment for the patient directly through the port
    pub async fn seed_appointment(&self, patient: &Patient) -> Appointment {
        let appointment = TestAppointmentBuilder::for_patient(patient).build();
        self.store
            .insert_appointment(&appointment)
            .await
            .expect("failed to seed appointment");
        appointment
    }
}
