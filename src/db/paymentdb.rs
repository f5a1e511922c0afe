// db/paymentdb.rs
use async_trait::async_trait;
use sqlx::{types::BigDecimal, Error};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::paymentmodel::{Payment, PaymentMethod, PaymentSource, PaymentStatus};

const PAYMENT_COLUMNS: &str = "id, bid_id, progress_update_id, design_submission_id, payer_id, \
     payee_id, amount, method, status, transaction_reference, transaction_date, created_at";

fn source_ids(source: PaymentSource) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
    match source {
        PaymentSource::Bid(id) => (Some(id), None, None),
        PaymentSource::ProgressUpdate(id) => (None, Some(id), None),
        PaymentSource::DesignSubmission(id) => (None, None, Some(id)),
    }
}

fn insert_payment_query() -> String {
    format!(
        r#"
        INSERT INTO payments
            (bid_id, progress_update_id, design_submission_id, payer_id, payee_id,
             amount, method, transaction_reference)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        PAYMENT_COLUMNS
    )
}

#[async_trait]
pub trait PaymentExt {
    async fn save_payment(
        &self,
        source: PaymentSource,
        payer_id: Uuid,
        payee_id: Uuid,
        amount: BigDecimal,
        method: PaymentMethod,
        transaction_reference: Option<String>,
    ) -> Result<Payment, Error>;

    async fn save_payment_tx(
        &self,
        source: PaymentSource,
        payer_id: Uuid,
        payee_id: Uuid,
        amount: BigDecimal,
        method: PaymentMethod,
        transaction_reference: Option<String>,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Payment, Error>;

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, Error>;

    async fn get_payments_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>, Error>;

    async fn advance_payment_status(
        &self,
        payment_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        transaction_reference: Option<String>,
    ) -> Result<Option<Payment>, Error>;
}

#[async_trait]
impl PaymentExt for DBClient {
    async fn save_payment(
        &self,
        source: PaymentSource,
        payer_id: Uuid,
        payee_id: Uuid,
        amount: BigDecimal,
        method: PaymentMethod,
        transaction_reference: Option<String>,
    ) -> Result<Payment, Error> {
        let (bid_id, progress_update_id, design_submission_id) = source_ids(source);

        sqlx::query_as::<_, Payment>(&insert_payment_query())
            .bind(bid_id)
            .bind(progress_update_id)
            .bind(design_submission_id)
            .bind(payer_id)
            .bind(payee_id)
            .bind(amount)
            .bind(method)
            .bind(transaction_reference)
            .fetch_one(&self.pool)
            .await
    }

    async fn save_payment_tx(
        &self,
        source: PaymentSource,
        payer_id: Uuid,
        payee_id: Uuid,
        amount: BigDecimal,
        method: PaymentMethod,
        transaction_reference: Option<String>,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Payment, Error> {
        let (bid_id, progress_update_id, design_submission_id) = source_ids(source);

        sqlx::query_as::<_, Payment>(&insert_payment_query())
            .bind(bid_id)
            .bind(progress_update_id)
            .bind(design_submission_id)
            .bind(payer_id)
            .bind(payee_id)
            .bind(amount)
            .bind(method)
            .bind(transaction_reference)
            .fetch_one(&mut **tx)
            .await
    }

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, Error> {
        let query = format!("SELECT {} FROM payments WHERE id = $1", PAYMENT_COLUMNS);

        sqlx::query_as::<_, Payment>(&query)
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_payments_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>, Error> {
        let query = format!(
            "SELECT {} FROM payments WHERE payer_id = $1 OR payee_id = $1 ORDER BY created_at DESC",
            PAYMENT_COLUMNS
        );

        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    // Compare-and-swap advance. The WHERE pins the status the caller read,
    // so two racing updates resolve to one winner. Completion stamps the
    // transaction date exactly once.
    async fn advance_payment_status(
        &self,
        payment_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        transaction_reference: Option<String>,
    ) -> Result<Option<Payment>, Error> {
        let query = format!(
            r#"
            UPDATE payments
            SET status = $3,
                transaction_reference = COALESCE($4, transaction_reference),
                transaction_date = CASE WHEN $3 = 'completed'::payment_status THEN NOW() ELSE transaction_date END
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        );

        sqlx::query_as::<_, Payment>(&query)
            .bind(payment_id)
            .bind(from)
            .bind(to)
            .bind(transaction_reference)
            .fetch_optional(&self.pool)
            .await
    }
}
