//! Billing engine services
//!
//! `BillingService` is the operation surface of the engine: invoice
//! creation, Draft update, finalize, and payment application. Every
//! operation runs validate-then-apply against the store; payment,
//! finalize, and update additionally run inside a per-invoice critical
//! section so two concurrent submissions cannot both pass the
//! remaining-balance check and jointly overpay.
//!
//! Duplicate payment protection is two-layered. A caller-supplied
//! idempotency key is authoritative when present: a replay with the same
//! key is rejected no matter how much time has passed. Without a key, a
//! request matching an existing payment's invoice, amount, and acting
//! user within the configured trailing window is treated as a duplicate
//! submit. The window is a heuristic, not a guarantee.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;
use validator::Validate;

use core_kernel::{Clock, InvoiceId, Money, PatientId, PaymentId, RequestContext};
use domain_patient::PatientPort;

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::invoice::{format_invoice_number, Invoice};
use crate::payment::{Payment, PaymentMethod};
use crate::ports::BillingPort;
use crate::pricing::{price_items, CreateInvoiceRequest, UpdateInvoiceRequest};

/// Request for applying a payment to an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPaymentRequest {
    /// Invoice being paid
    pub invoice_id: InvoiceId,
    /// Amount to apply
    pub amount: Decimal,
    /// Payment method tag, e.g. "Cash" or "Wallet"
    pub method: String,
    /// Optional idempotency token; replays with the same token are rejected
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Registry of per-invoice critical sections
#[derive(Default)]
struct InvoiceLocks {
    inner: StdMutex<HashMap<InvoiceId, Arc<AsyncMutex<()>>>>,
}

impl InvoiceLocks {
    fn for_invoice(&self, id: InvoiceId) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().expect("invoice lock registry poisoned");
        map.entry(id).or_default().clone()
    }
}

/// The invoice lifecycle and payment application engine
pub struct BillingService {
    billing: Arc<dyn BillingPort>,
    patients: Arc<dyn PatientPort>,
    clock: Arc<dyn Clock>,
    config: BillingConfig,
    locks: InvoiceLocks,
}

impl BillingService {
    pub fn new(
        billing: Arc<dyn BillingPort>,
        patients: Arc<dyn PatientPort>,
        clock: Arc<dyn Clock>,
        config: BillingConfig,
    ) -> Self {
        Self {
            billing,
            patients,
            clock,
            config,
            locks: InvoiceLocks::default(),
        }
    }

    /// Creates a Draft invoice for a patient
    ///
    /// When an appointment is supplied it must exist, belong to the
    /// patient, and not already be billed by a non-Draft invoice. Draft
    /// invoices for the same appointment are allowed, so retries and
    /// pre-finalize edits stay safe.
    pub async fn create_invoice(
        &self,
        ctx: RequestContext,
        request: CreateInvoiceRequest,
    ) -> Result<Invoice, BillingError> {
        request
            .validate()
            .map_err(|e| BillingError::validation(flatten_errors(&e)))?;

        let patient = self
            .patients
            .get_patient(ctx.facility_id, request.patient_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Patient", request.patient_id))?;

        if let Some(appointment_id) = request.appointment_id {
            self.patients
                .get_appointment(ctx.facility_id, request.patient_id, appointment_id)
                .await?
                .ok_or_else(|| BillingError::not_found("Appointment", appointment_id))?;

            if let Some(existing) = self
                .billing
                .find_billed_invoice_for_appointment(
                    ctx.facility_id,
                    request.patient_id,
                    appointment_id,
                )
                .await?
            {
                return Err(BillingError::DuplicateAppointmentInvoice {
                    invoice_id: existing.id,
                });
            }
        }

        let priced = price_items(&request.items, request.discount_amount, patient.currency())?;
        let invoice = Invoice::draft(
            ctx.facility_id,
            request.patient_id,
            request.appointment_id,
            priced,
            ctx.user_id,
            self.clock.now(),
        );

        self.billing.insert_invoice(&invoice).await?;
        self.log_discounts(&invoice, ctx);
        tracing::info!(
            invoice_id = %invoice.id,
            patient_id = %invoice.patient_id,
            total = %invoice.total,
            facility_id = %ctx.facility_id,
            created_by = %ctx.user_id,
            "invoice created"
        );

        Ok(invoice)
    }

    /// Replaces a Draft invoice's items and retotals it
    pub async fn update_invoice(
        &self,
        ctx: RequestContext,
        invoice_id: InvoiceId,
        request: UpdateInvoiceRequest,
    ) -> Result<Invoice, BillingError> {
        request
            .validate()
            .map_err(|e| BillingError::validation(flatten_errors(&e)))?;

        let lock = self.locks.for_invoice(invoice_id);
        let _guard = lock.lock().await;

        let mut invoice = self
            .billing
            .get_invoice(ctx.facility_id, invoice_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Invoice", invoice_id))?;

        let priced = price_items(
            &request.items,
            request.discount_amount,
            invoice.total.currency(),
        )?;
        invoice.replace_items(priced)?;
        self.billing.update_invoice(&invoice).await?;

        self.log_discounts(&invoice, ctx);
        tracing::info!(
            invoice_id = %invoice.id,
            total = %invoice.total,
            facility_id = %ctx.facility_id,
            "invoice updated"
        );

        Ok(invoice)
    }

    /// Finalizes a Draft invoice, assigning its facility-unique number
    pub async fn finalize_invoice(
        &self,
        ctx: RequestContext,
        invoice_id: InvoiceId,
    ) -> Result<Invoice, BillingError> {
        let lock = self.locks.for_invoice(invoice_id);
        let _guard = lock.lock().await;

        let mut invoice = self
            .billing
            .get_invoice(ctx.facility_id, invoice_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Invoice", invoice_id))?;

        if !invoice.status.is_draft() {
            return Err(BillingError::NotDraft {
                action: "finalized",
                status: invoice.status,
            });
        }

        // Another Draft for the same visit may have been finalized since
        // creation; billing the appointment twice must stay impossible.
        if let Some(appointment_id) = invoice.appointment_id {
            if let Some(existing) = self
                .billing
                .find_billed_invoice_for_appointment(
                    ctx.facility_id,
                    invoice.patient_id,
                    appointment_id,
                )
                .await?
            {
                return Err(BillingError::DuplicateAppointmentInvoice {
                    invoice_id: existing.id,
                });
            }
        }

        let now = self.clock.now();
        let sequence = self.billing.next_invoice_sequence(ctx.facility_id).await?;
        let number = format_invoice_number(
            ctx.facility_id,
            self.config.timezone.local_date(now),
            sequence,
        );

        invoice.finalize(number, now)?;
        self.billing.update_invoice(&invoice).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = invoice.invoice_number.as_deref().unwrap_or(""),
            facility_id = %ctx.facility_id,
            "invoice finalized"
        );

        Ok(invoice)
    }

    /// Fetches an invoice within the caller's facility
    pub async fn get_invoice(
        &self,
        ctx: RequestContext,
        invoice_id: InvoiceId,
    ) -> Result<Invoice, BillingError> {
        self.billing
            .get_invoice(ctx.facility_id, invoice_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Invoice", invoice_id))
    }

    /// Every invoice of a patient, most recently created first
    pub async fn list_invoices_for_patient(
        &self,
        ctx: RequestContext,
        patient_id: PatientId,
    ) -> Result<Vec<Invoice>, BillingError> {
        Ok(self
            .billing
            .list_invoices_for_patient(ctx.facility_id, patient_id)
            .await?)
    }

    /// Validates and applies a payment to an invoice
    ///
    /// On success the payment row, the invoice status, and the patient's
    /// wallet/intake status persist as one atomic unit. Any validation
    /// failure leaves every entity untouched.
    pub async fn process_payment(
        &self,
        ctx: RequestContext,
        request: ProcessPaymentRequest,
    ) -> Result<Payment, BillingError> {
        if request.amount <= Decimal::ZERO {
            return Err(BillingError::validation_field(
                "Payment amount must be greater than 0",
                "amount",
            ));
        }
        let method: PaymentMethod = request
            .method
            .parse()
            .map_err(|e: crate::payment::UnknownPaymentMethod| {
                BillingError::validation_field(e.to_string(), "method")
            })?;

        let lock = self.locks.for_invoice(request.invoice_id);
        let _guard = lock.lock().await;

        let mut invoice = self
            .billing
            .get_invoice(ctx.facility_id, request.invoice_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Invoice", request.invoice_id))?;

        if invoice.status.is_draft() {
            return Err(BillingError::DraftNotPayable);
        }
        if !invoice.status.accepts_payment() {
            return Err(BillingError::AlreadyPaid);
        }

        let currency = invoice.total.currency();
        let payments = self
            .billing
            .list_payments(ctx.facility_id, invoice.id)
            .await?;
        let total_paid = payments
            .iter()
            .try_fold(Money::zero(currency), |acc, p| acc.checked_add(&p.amount))?;
        let remaining = invoice.total.checked_sub(&total_paid)?;

        let amount = Money::new(request.amount, currency);
        if amount > remaining {
            return Err(BillingError::ExceedsRemainingBalance { remaining });
        }

        // Live read; the wallet may have been debited since the caller
        // last looked at it.
        let mut patient = self
            .patients
            .get_patient(ctx.facility_id, invoice.patient_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Patient", invoice.patient_id))?;

        if method.is_wallet() && !patient.has_wallet_funds(&amount) {
            return Err(BillingError::InsufficientWalletFunds {
                balance: patient.wallet_balance,
            });
        }

        let now = self.clock.now();
        if let Some(duplicate) = self.find_duplicate(&payments, &request, amount, ctx, now) {
            return Err(BillingError::DuplicatePayment {
                payment_id: duplicate,
            });
        }

        let payment = Payment::new(
            ctx.facility_id,
            invoice.id,
            amount,
            method,
            request.idempotency_key.clone(),
            ctx.user_id,
            now,
        );

        let new_total_paid = total_paid.checked_add(&amount)?;
        invoice.record_payment_total(new_total_paid)?;

        if method.is_wallet() {
            patient.debit_wallet(&amount)?;
        }
        patient.mark_awaiting_vitals();

        self.billing
            .commit_payment(&payment, &invoice, &patient)
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            invoice_id = %invoice.id,
            amount = %payment.amount,
            method = %payment.method,
            invoice_status = %invoice.status,
            facility_id = %ctx.facility_id,
            created_by = %ctx.user_id,
            "payment processed"
        );

        Ok(payment)
    }

    /// Fetches a payment within the caller's facility
    pub async fn get_payment(
        &self,
        ctx: RequestContext,
        payment_id: PaymentId,
    ) -> Result<Payment, BillingError> {
        self.billing
            .get_payment(ctx.facility_id, payment_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Payment", payment_id))
    }

    /// Payments of an invoice, ordered by creation time ascending
    pub async fn list_payments(
        &self,
        ctx: RequestContext,
        invoice_id: InvoiceId,
    ) -> Result<Vec<Payment>, BillingError> {
        self.billing
            .get_invoice(ctx.facility_id, invoice_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Invoice", invoice_id))?;

        Ok(self.billing.list_payments(ctx.facility_id, invoice_id).await?)
    }

    /// Finds an existing payment that makes this request a duplicate
    ///
    /// With an idempotency key, only a key match counts; an explicit key
    /// signals the caller is distinguishing intentional repeat payments.
    /// Without one, an identical amount from the same user inside the
    /// trailing window is assumed to be a double submit.
    fn find_duplicate(
        &self,
        payments: &[Payment],
        request: &ProcessPaymentRequest,
        amount: Money,
        ctx: RequestContext,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<PaymentId> {
        if let Some(key) = &request.idempotency_key {
            return payments
                .iter()
                .find(|p| p.idempotency_key.as_deref() == Some(key.as_str()))
                .map(|p| p.id);
        }

        let window = self.config.duplicate_window();
        payments
            .iter()
            .find(|p| {
                p.amount == amount
                    && p.created_by == ctx.user_id
                    && now.signed_duration_since(p.created_at) <= window
            })
            .map(|p| p.id)
    }

    fn log_discounts(&self, invoice: &Invoice, ctx: RequestContext) {
        if invoice.discount_amount.is_positive() {
            tracing::info!(
                invoice_id = %invoice.id,
                discount = %invoice.discount_amount,
                facility_id = %ctx.facility_id,
                created_by = %ctx.user_id,
                "invoice discount applied"
            );
        }
        for item in invoice.items.iter().filter(|i| i.discount_amount.is_positive()) {
            tracing::info!(
                invoice_id = %invoice.id,
                service_name = %item.service_name,
                discount = %item.discount_amount,
                facility_id = %ctx.facility_id,
                "line discount applied"
            );
        }
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
