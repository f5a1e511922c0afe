use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Bid {0} not found")]
    BidNotFound(Uuid),

    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),

    #[error("Material request {0} not found")]
    MaterialRequestNotFound(Uuid),

    #[error("Listing {0} is no longer accepting bids")]
    OfferNotBiddable(Uuid),

    #[error("You cannot bid on your own listing")]
    SelfBid,

    #[error("User {0} has already placed a bid on this listing")]
    DuplicateBid(Uuid),

    #[error("Bid {0} has already been responded to")]
    BidAlreadyResolved(Uuid),

    #[error("Bid {0} cannot be withdrawn after it has been responded to")]
    BidNotWithdrawable(Uuid),

    #[error("No accepted bid matches this submission")]
    NoAcceptedBid,

    #[error("Progress update {0} not found")]
    ProgressUpdateNotFound(Uuid),

    #[error("Design submission {0} not found")]
    DesignSubmissionNotFound(Uuid),

    #[error("A design has already been submitted for this project and bid")]
    DuplicateDesignSubmission,

    #[error("Submission {0} has already been reviewed")]
    AlreadyReviewed(Uuid),

    #[error("User {0} is not authorized to review submissions for project {1}")]
    NotProjectOwner(Uuid, Uuid),

    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    #[error("Invalid payment status transition: {0}")]
    InvalidPaymentTransition(String),

    #[error("Notification {0} not found")]
    NotificationNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        if let ServiceError::Database(ref db_err) = error {
            tracing::error!("Database error: {}", db_err);
            // Driver detail is only surfaced in debug builds
            if !cfg!(debug_assertions) {
                return HttpError::server_error("Something went wrong, please try again later");
            }
        }

        HttpError::new(error.to_string(), error.status_code())
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BidNotFound(_)
            | ServiceError::ProjectNotFound(_)
            | ServiceError::MaterialRequestNotFound(_)
            | ServiceError::NoAcceptedBid
            | ServiceError::ProgressUpdateNotFound(_)
            | ServiceError::DesignSubmissionNotFound(_)
            | ServiceError::PaymentNotFound(_)
            | ServiceError::NotificationNotFound(_)
            | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::OfferNotBiddable(_)
            | ServiceError::DuplicateBid(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::SelfBid | ServiceError::NotProjectOwner(_, _) => StatusCode::FORBIDDEN,

            ServiceError::BidAlreadyResolved(_)
            | ServiceError::BidNotWithdrawable(_)
            | ServiceError::DuplicateDesignSubmission
            | ServiceError::AlreadyReviewed(_)
            | ServiceError::InvalidPaymentTransition(_) => StatusCode::CONFLICT,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_family_maps_to_409() {
        let id = Uuid::new_v4();
        assert_eq!(
            ServiceError::BidAlreadyResolved(id).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::AlreadyReviewed(id).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::DuplicateDesignSubmission.status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn authorization_family_maps_to_403() {
        assert_eq!(ServiceError::SelfBid.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ServiceError::NotProjectOwner(Uuid::new_v4(), Uuid::new_v4()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn duplicate_bid_is_a_bad_request_not_a_conflict() {
        assert_eq!(
            ServiceError::DuplicateBid(Uuid::new_v4()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn http_error_keeps_the_status_mapping() {
        let err: HttpError = ServiceError::NoAcceptedBid.into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: HttpError = ServiceError::Validation("bad input".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
