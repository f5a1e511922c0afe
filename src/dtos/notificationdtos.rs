use serde::{Deserialize, Serialize};

//Notification DTOs
#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationQueryDto {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub unread_only: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountDto {
    pub unread_count: i64,
}
