use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "material_request_status", rename_all = "snake_case")]
pub enum MaterialRequestStatus {
    Active,
    Awarded,
    Completed,
    Cancelled,
}

impl MaterialRequestStatus {
    pub fn to_str(&self) -> &str {
        match self {
            MaterialRequestStatus::Active => "active",
            MaterialRequestStatus::Awarded => "awarded",
            MaterialRequestStatus::Completed => "completed",
            MaterialRequestStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: Option<ProjectStatus>, // Rows imported from the legacy system carry NULL
    pub awarded_bid_id: Option<Uuid>,
    pub overall_progress: i32,
    pub created_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn is_biddable(&self) -> bool {
        matches!(self.status, None | Some(ProjectStatus::Active))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MaterialRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: Option<MaterialRequestStatus>, // NULL on legacy rows, treated as open
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MaterialRequest {
    pub fn is_biddable(&self) -> bool {
        matches!(self.status, None | Some(MaterialRequestStatus::Active))
    }
}

/// Identifies the listing a bid targets. A bid references exactly one of a
/// project or a material request, never both and never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferRef {
    Project(Uuid),
    MaterialRequest(Uuid),
}

impl OfferRef {
    pub fn from_ids(project_id: Option<Uuid>, material_request_id: Option<Uuid>) -> Option<OfferRef> {
        match (project_id, material_request_id) {
            (Some(id), None) => Some(OfferRef::Project(id)),
            (None, Some(id)) => Some(OfferRef::MaterialRequest(id)),
            _ => None,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            OfferRef::Project(id) => *id,
            OfferRef::MaterialRequest(id) => *id,
        }
    }
}

/// A loaded offer row, either side of the XOR.
#[derive(Debug, Clone)]
pub enum Offer {
    Project(Project),
    MaterialRequest(MaterialRequest),
}

impl Offer {
    pub fn owner_id(&self) -> Uuid {
        match self {
            Offer::Project(p) => p.user_id,
            Offer::MaterialRequest(m) => m.user_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Offer::Project(p) => &p.title,
            Offer::MaterialRequest(m) => &m.title,
        }
    }

    pub fn is_biddable(&self) -> bool {
        match self {
            Offer::Project(p) => p.is_biddable(),
            Offer::MaterialRequest(m) => m.is_biddable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with_status(status: Option<ProjectStatus>) -> Project {
        Project {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "3 bedroom duplex".to_string(),
            description: "Full build from foundation".to_string(),
            status,
            awarded_bid_id: None,
            overall_progress: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn offer_ref_requires_exactly_one_id() {
        let id = Uuid::new_v4();
        assert_eq!(OfferRef::from_ids(Some(id), None), Some(OfferRef::Project(id)));
        assert_eq!(
            OfferRef::from_ids(None, Some(id)),
            Some(OfferRef::MaterialRequest(id))
        );
        assert_eq!(OfferRef::from_ids(None, None), None);
        assert_eq!(OfferRef::from_ids(Some(id), Some(Uuid::new_v4())), None);
    }

    #[test]
    fn legacy_null_status_counts_as_biddable() {
        assert!(project_with_status(None).is_biddable());
        assert!(project_with_status(Some(ProjectStatus::Active)).is_biddable());
    }

    #[test]
    fn awarded_or_closed_projects_are_not_biddable() {
        assert!(!project_with_status(Some(ProjectStatus::InProgress)).is_biddable());
        assert!(!project_with_status(Some(ProjectStatus::Completed)).is_biddable());
        assert!(!project_with_status(Some(ProjectStatus::Cancelled)).is_biddable());
    }
}
