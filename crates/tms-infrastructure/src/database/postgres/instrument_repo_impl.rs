//! PostgreSQL payment request / instrument repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::error;

use tms_core::domain::{
    InstrumentKind, InstrumentStatusHistory, PaymentInstrument, PaymentPurpose, PaymentRequest,
};
use tms_core::error::DomainError;
use tms_core::repositories::{
    InstrumentRepository, NewInstrument, NewPaymentRequest, NewStatusHistory,
};

pub struct PgInstrumentRepository {
    pool: PgPool,
}

impl PgInstrumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct RequestRow {
    id: i64,
    tender_id: i64,
    purpose: String,
    amount_required: Decimal,
    due_date: Option<DateTime<Utc>>,
    requested_by: Option<String>,
    status: String,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RequestRow> for PaymentRequest {
    fn from(row: RequestRow) -> Self {
        PaymentRequest {
            id: row.id,
            tender_id: row.tender_id,
            purpose: PaymentPurpose::from_str(&row.purpose).unwrap_or(PaymentPurpose::OtherPayment),
            amount_required: row.amount_required,
            due_date: row.due_date,
            requested_by: row.requested_by,
            status: row.status,
            remarks: row.remarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct InstrumentRow {
    id: i64,
    request_id: i64,
    instrument_kind: String,
    amount: Decimal,
    favouring: Option<String>,
    payable_at: Option<String>,
    issue_date: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
    status: String,
    action: i32,
    is_active: bool,
    utr: Option<String>,
    docket_no: Option<String>,
    courier_address: Option<String>,
    courier_deadline: Option<i32>,
    rejection_reason: Option<String>,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InstrumentRow> for PaymentInstrument {
    type Error = DomainError;

    fn try_from(row: InstrumentRow) -> Result<Self, Self::Error> {
        let kind = InstrumentKind::from_str(&row.instrument_kind).ok_or_else(|| {
            DomainError::InternalError(format!("unknown instrument kind {}", row.instrument_kind))
        })?;
        Ok(PaymentInstrument {
            id: row.id,
            request_id: row.request_id,
            kind,
            amount: row.amount,
            favouring: row.favouring,
            payable_at: row.payable_at,
            issue_date: row.issue_date,
            expiry_date: row.expiry_date,
            status: row.status,
            action: row.action,
            is_active: row.is_active,
            utr: row.utr,
            docket_no: row.docket_no,
            courier_address: row.courier_address,
            courier_deadline: row.courier_deadline,
            rejection_reason: row.rejection_reason,
            remarks: row.remarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: i64,
    instrument_id: i64,
    from_status: Option<String>,
    to_status: String,
    stage: Option<i32>,
    changed_by: Option<i64>,
    rejection_reason: Option<String>,
    form_data: Option<Value>,
    resubmitted_from: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<HistoryRow> for InstrumentStatusHistory {
    fn from(row: HistoryRow) -> Self {
        InstrumentStatusHistory {
            id: row.id,
            instrument_id: row.instrument_id,
            from_status: row.from_status,
            to_status: row.to_status,
            stage: row.stage,
            changed_by: row.changed_by,
            rejection_reason: row.rejection_reason,
            form_data: row.form_data,
            resubmitted_from: row.resubmitted_from,
            created_at: row.created_at,
        }
    }
}

const REQUEST_COLUMNS: &str = "id, tender_id, purpose, amount_required, due_date, requested_by, \
                               status, remarks, created_at, updated_at";
const INSTRUMENT_COLUMNS: &str = "id, request_id, instrument_kind, amount, favouring, payable_at, \
                                  issue_date, expiry_date, status, action, is_active, utr, \
                                  docket_no, courier_address, courier_deadline, rejection_reason, \
                                  remarks, created_at, updated_at";

#[async_trait]
impl InstrumentRepository for PgInstrumentRepository {
    async fn find_request(&self, id: i64) -> Result<Option<PaymentRequest>, DomainError> {
        let row: Option<RequestRow> = sqlx::query_as(&format!(
            "SELECT {REQUEST_COLUMNS} FROM payment_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("finding payment request", e))?;

        Ok(row.map(Into::into))
    }

    async fn create_request(
        &self,
        req: &NewPaymentRequest,
    ) -> Result<PaymentRequest, DomainError> {
        let row: RequestRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO payment_requests (tender_id, purpose, amount_required, due_date, requested_by, remarks)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(req.tender_id)
        .bind(req.purpose.as_str())
        .bind(req.amount_required)
        .bind(req.due_date)
        .bind(&req.requested_by)
        .bind(&req.remarks)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("creating payment request", e))?;

        Ok(row.into())
    }

    async fn list_requests_for_tender(
        &self,
        tender_id: i64,
    ) -> Result<Vec<PaymentRequest>, DomainError> {
        let rows: Vec<RequestRow> = sqlx::query_as(&format!(
            "SELECT {REQUEST_COLUMNS} FROM payment_requests WHERE tender_id = $1 ORDER BY created_at DESC"
        ))
        .bind(tender_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("listing payment requests", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_instrument(&self, id: i64) -> Result<Option<PaymentInstrument>, DomainError> {
        let row: Option<InstrumentRow> = sqlx::query_as(&format!(
            "SELECT {INSTRUMENT_COLUMNS} FROM payment_instruments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("finding instrument", e))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_instruments(
        &self,
        request_id: i64,
    ) -> Result<Vec<PaymentInstrument>, DomainError> {
        let rows: Vec<InstrumentRow> = sqlx::query_as(&format!(
            "SELECT {INSTRUMENT_COLUMNS} FROM payment_instruments WHERE request_id = $1 ORDER BY created_at"
        ))
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("listing instruments", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create_instrument(
        &self,
        instrument: &NewInstrument,
    ) -> Result<PaymentInstrument, DomainError> {
        let row: InstrumentRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO payment_instruments
                (request_id, instrument_kind, amount, favouring, payable_at, status,
                 courier_address, courier_deadline)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {INSTRUMENT_COLUMNS}
            "#
        ))
        .bind(instrument.request_id)
        .bind(instrument.kind.as_str())
        .bind(instrument.amount)
        .bind(&instrument.favouring)
        .bind(&instrument.payable_at)
        .bind(&instrument.status)
        .bind(&instrument.courier_address)
        .bind(instrument.courier_deadline)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("creating instrument", e))?;

        row.try_into()
    }

    async fn update_instrument_status(
        &self,
        id: i64,
        status: &str,
        stage: i32,
    ) -> Result<PaymentInstrument, DomainError> {
        let row: InstrumentRow = sqlx::query_as(&format!(
            r#"
            UPDATE payment_instruments
            SET status = $2, action = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {INSTRUMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(stage)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("updating instrument status", e))?;

        row.try_into()
    }

    async fn set_instrument_active(&self, id: i64, active: bool) -> Result<(), DomainError> {
        sqlx::query("UPDATE payment_instruments SET is_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("toggling instrument active flag", e))?;
        Ok(())
    }

    async fn update_detail(
        &self,
        instrument_id: i64,
        kind: InstrumentKind,
        form_data: &Value,
    ) -> Result<(), DomainError> {
        // Detail forms are patched: fields absent from the payload keep their
        // current value.
        let sql = match kind {
            InstrumentKind::Dd => {
                r#"
                UPDATE instrument_dd_details SET
                    dd_no = COALESCE($2->>'dd_no', dd_no),
                    dd_date = COALESCE(($2->>'dd_date')::date, dd_date),
                    bank_name = COALESCE($2->>'bank_name', bank_name),
                    req_no = COALESCE($2->>'req_no', req_no)
                WHERE instrument_id = $1
                "#
            }
            InstrumentKind::Fdr => {
                r#"
                UPDATE instrument_fdr_details SET
                    fdr_no = COALESCE($2->>'fdr_no', fdr_no),
                    fdr_date = COALESCE(($2->>'fdr_date')::date, fdr_date),
                    fdr_source = COALESCE($2->>'fdr_source', fdr_source),
                    roi = COALESCE(($2->>'roi')::numeric, roi),
                    margin_percent = COALESCE(($2->>'margin_percent')::numeric, margin_percent),
                    fdr_purpose = COALESCE($2->>'fdr_purpose', fdr_purpose)
                WHERE instrument_id = $1
                "#
            }
            InstrumentKind::Bg => {
                r#"
                UPDATE instrument_bg_details SET
                    bg_no = COALESCE($2->>'bg_no', bg_no),
                    bg_date = COALESCE(($2->>'bg_date')::date, bg_date),
                    validity_date = COALESCE(($2->>'validity_date')::date, validity_date),
                    claim_expiry_date = COALESCE(($2->>'claim_expiry_date')::date, claim_expiry_date),
                    beneficiary_name = COALESCE($2->>'beneficiary_name', beneficiary_name),
                    beneficiary_address = COALESCE($2->>'beneficiary_address', beneficiary_address),
                    bank_name = COALESCE($2->>'bank_name', bank_name),
                    cash_margin_percent = COALESCE(($2->>'cash_margin_percent')::numeric, cash_margin_percent),
                    fdr_margin_percent = COALESCE(($2->>'fdr_margin_percent')::numeric, fdr_margin_percent),
                    stamp_charges = COALESCE(($2->>'stamp_charges')::numeric, stamp_charges),
                    sfms_charges = COALESCE(($2->>'sfms_charges')::numeric, sfms_charges)
                WHERE instrument_id = $1
                "#
            }
            InstrumentKind::Cheque => {
                r#"
                UPDATE instrument_cheque_details SET
                    cheque_no = COALESCE($2->>'cheque_no', cheque_no),
                    cheque_date = COALESCE(($2->>'cheque_date')::date, cheque_date),
                    bank_name = COALESCE($2->>'bank_name', bank_name)
                WHERE instrument_id = $1
                "#
            }
            InstrumentKind::BankTransfer | InstrumentKind::PortalPayment => {
                r#"
                UPDATE instrument_transfer_details SET
                    portal_name = COALESCE($2->>'portal_name', portal_name),
                    account_name = COALESCE($2->>'account_name', account_name),
                    account_number = COALESCE($2->>'account_number', account_number),
                    ifsc = COALESCE($2->>'ifsc', ifsc),
                    transaction_id = COALESCE($2->>'transaction_id', transaction_id),
                    transaction_date = COALESCE(($2->>'transaction_date')::timestamptz, transaction_date),
                    payment_method = COALESCE($2->>'payment_method', payment_method)
                WHERE instrument_id = $1
                "#
            }
        };

        sqlx::query(sql)
            .bind(instrument_id)
            .bind(form_data)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("updating instrument detail", e))?;
        Ok(())
    }

    async fn create_detail(
        &self,
        instrument_id: i64,
        kind: InstrumentKind,
        form_data: &Value,
    ) -> Result<(), DomainError> {
        let sql = match kind {
            InstrumentKind::Dd => {
                r#"
                INSERT INTO instrument_dd_details (instrument_id, dd_no, dd_date, bank_name, req_no)
                VALUES ($1, $2->>'dd_no', ($2->>'dd_date')::date, $2->>'bank_name', $2->>'req_no')
                "#
            }
            InstrumentKind::Fdr => {
                r#"
                INSERT INTO instrument_fdr_details
                    (instrument_id, fdr_no, fdr_date, fdr_source, roi, margin_percent, fdr_purpose)
                VALUES ($1, $2->>'fdr_no', ($2->>'fdr_date')::date, $2->>'fdr_source',
                        ($2->>'roi')::numeric, ($2->>'margin_percent')::numeric, $2->>'fdr_purpose')
                "#
            }
            InstrumentKind::Bg => {
                r#"
                INSERT INTO instrument_bg_details
                    (instrument_id, bg_no, bg_date, validity_date, claim_expiry_date,
                     beneficiary_name, beneficiary_address, bank_name, cash_margin_percent,
                     fdr_margin_percent, stamp_charges, sfms_charges)
                VALUES ($1, $2->>'bg_no', ($2->>'bg_date')::date, ($2->>'validity_date')::date,
                        ($2->>'claim_expiry_date')::date, $2->>'beneficiary_name',
                        $2->>'beneficiary_address', $2->>'bank_name',
                        ($2->>'cash_margin_percent')::numeric, ($2->>'fdr_margin_percent')::numeric,
                        ($2->>'stamp_charges')::numeric, ($2->>'sfms_charges')::numeric)
                "#
            }
            InstrumentKind::Cheque => {
                r#"
                INSERT INTO instrument_cheque_details (instrument_id, cheque_no, cheque_date, bank_name)
                VALUES ($1, $2->>'cheque_no', ($2->>'cheque_date')::date, $2->>'bank_name')
                "#
            }
            InstrumentKind::BankTransfer | InstrumentKind::PortalPayment => {
                r#"
                INSERT INTO instrument_transfer_details
                    (instrument_id, portal_name, account_name, account_number, ifsc,
                     transaction_id, transaction_date, payment_method)
                VALUES ($1, $2->>'portal_name', $2->>'account_name', $2->>'account_number',
                        $2->>'ifsc', $2->>'transaction_id', ($2->>'transaction_date')::timestamptz,
                        $2->>'payment_method')
                "#
            }
        };

        sqlx::query(sql)
            .bind(instrument_id)
            .bind(form_data)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("creating instrument detail", e))?;
        Ok(())
    }

    async fn record_history(&self, entry: &NewStatusHistory) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO instrument_status_history
                (instrument_id, from_status, to_status, stage, changed_by, rejection_reason,
                 form_data, resubmitted_from)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.instrument_id)
        .bind(&entry.from_status)
        .bind(&entry.to_status)
        .bind(entry.stage)
        .bind(entry.changed_by)
        .bind(&entry.rejection_reason)
        .bind(&entry.form_data)
        .bind(entry.resubmitted_from)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("recording status history", e))?;
        Ok(())
    }

    async fn history(
        &self,
        instrument_id: i64,
    ) -> Result<Vec<InstrumentStatusHistory>, DomainError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, instrument_id, from_status, to_status, stage, changed_by,
                   rejection_reason, form_data, resubmitted_from, created_at
            FROM instrument_status_history
            WHERE instrument_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(instrument_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("loading status history", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
