use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    // Pending may settle directly (manual bank transfers confirmed out of
    // band skip the processing leg). Failure and refund require the payment
    // to have entered processing first.
    pub fn can_transition_to(&self, to: PaymentStatus) -> bool {
        match (self, to) {
            (PaymentStatus::Pending, PaymentStatus::Processing) => true,
            (PaymentStatus::Pending, PaymentStatus::Completed) => true,
            (PaymentStatus::Processing, PaymentStatus::Completed) => true,
            (PaymentStatus::Processing, PaymentStatus::Failed) => true,
            (PaymentStatus::Processing, PaymentStatus::Refunded) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed | PaymentStatus::Failed | PaymentStatus::Refunded
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Card,
    Wallet,
}

impl PaymentMethod {
    pub fn to_str(&self) -> &str {
        match self {
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Card => "card",
            PaymentMethod::Wallet => "wallet",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub bid_id: Option<Uuid>,
    pub progress_update_id: Option<Uuid>,
    pub design_submission_id: Option<Uuid>,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: BigDecimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_reference: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
}

/// The event a payment settles. Exactly one of the three foreign keys is set,
/// mirroring the CHECK constraint on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentSource {
    Bid(Uuid),
    ProgressUpdate(Uuid),
    DesignSubmission(Uuid),
}

impl PaymentSource {
    pub fn from_ids(
        bid_id: Option<Uuid>,
        progress_update_id: Option<Uuid>,
        design_submission_id: Option<Uuid>,
    ) -> Option<PaymentSource> {
        match (bid_id, progress_update_id, design_submission_id) {
            (Some(id), None, None) => Some(PaymentSource::Bid(id)),
            (None, Some(id), None) => Some(PaymentSource::ProgressUpdate(id)),
            (None, None, Some(id)) => Some(PaymentSource::DesignSubmission(id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PaymentStatus; 5] = [
        PaymentStatus::Pending,
        PaymentStatus::Processing,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
    ];

    #[test]
    fn transition_table_is_exactly_the_allowed_set() {
        let allowed = [
            (PaymentStatus::Pending, PaymentStatus::Processing),
            (PaymentStatus::Pending, PaymentStatus::Completed),
            (PaymentStatus::Processing, PaymentStatus::Completed),
            (PaymentStatus::Processing, PaymentStatus::Failed),
            (PaymentStatus::Processing, PaymentStatus::Refunded),
        ];

        for from in ALL {
            for to in ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "transition {:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn settled_payments_are_terminal() {
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Refunded.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Processing.is_terminal());
    }

    #[test]
    fn payment_source_requires_exactly_one_reference() {
        let id = Uuid::new_v4();
        assert_eq!(
            PaymentSource::from_ids(Some(id), None, None),
            Some(PaymentSource::Bid(id))
        );
        assert_eq!(
            PaymentSource::from_ids(None, Some(id), None),
            Some(PaymentSource::ProgressUpdate(id))
        );
        assert_eq!(
            PaymentSource::from_ids(None, None, Some(id)),
            Some(PaymentSource::DesignSubmission(id))
        );
        assert_eq!(PaymentSource::from_ids(None, None, None), None);
        assert_eq!(
            PaymentSource::from_ids(Some(id), Some(Uuid::new_v4()), None),
            None
        );
        assert_eq!(
            PaymentSource::from_ids(Some(id), Some(Uuid::new_v4()), Some(Uuid::new_v4())),
            None
        );
    }
}
