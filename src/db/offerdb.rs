// db/offerdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::offermodel::{MaterialRequest, Offer, OfferRef, Project};

const PROJECT_COLUMNS: &str =
    "id, user_id, title, description, status, awarded_bid_id, overall_progress, created_at, updated_at";

const MATERIAL_REQUEST_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at";

#[async_trait]
pub trait OfferExt {
    async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, Error>;

    async fn get_material_request(&self, request_id: Uuid) -> Result<Option<MaterialRequest>, Error>;

    async fn get_offer(&self, offer: OfferRef) -> Result<Option<Offer>, Error>;

    async fn award_project_tx(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<Project>, Error>;

    async fn award_material_request_tx(
        &self,
        request_id: Uuid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<MaterialRequest>, Error>;

    async fn get_project_for_update_tx(
        &self,
        project_id: Uuid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<Project>, Error>;

    async fn set_project_progress_tx(
        &self,
        project_id: Uuid,
        overall_progress: i32,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), Error>;
}

#[async_trait]
impl OfferExt for DBClient {
    async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, Error> {
        let query = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);

        sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_material_request(&self, request_id: Uuid) -> Result<Option<MaterialRequest>, Error> {
        let query = format!(
            "SELECT {} FROM material_requests WHERE id = $1",
            MATERIAL_REQUEST_COLUMNS
        );

        sqlx::query_as::<_, MaterialRequest>(&query)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_offer(&self, offer: OfferRef) -> Result<Option<Offer>, Error> {
        match offer {
            OfferRef::Project(id) => Ok(self.get_project(id).await?.map(Offer::Project)),
            OfferRef::MaterialRequest(id) => Ok(self
                .get_material_request(id)
                .await?
                .map(Offer::MaterialRequest)),
        }
    }

    // Compare-and-swap award. The status guard admits legacy NULL rows and
    // active rows only, so a second concurrent accept comes back empty.
    async fn award_project_tx(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<Project>, Error> {
        let query = format!(
            r#"
            UPDATE projects
            SET status = 'in_progress', awarded_bid_id = $2, updated_at = NOW()
            WHERE id = $1 AND (status IS NULL OR status = 'active')
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .bind(bid_id)
            .fetch_optional(&mut **tx)
            .await
    }

    async fn award_material_request_tx(
        &self,
        request_id: Uuid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<MaterialRequest>, Error> {
        let query = format!(
            r#"
            UPDATE material_requests
            SET status = 'awarded', updated_at = NOW()
            WHERE id = $1 AND (status IS NULL OR status = 'active')
            RETURNING {}
            "#,
            MATERIAL_REQUEST_COLUMNS
        );

        sqlx::query_as::<_, MaterialRequest>(&query)
            .bind(request_id)
            .fetch_optional(&mut **tx)
            .await
    }

    // Row lock for the progress accumulation read-modify-write.
    async fn get_project_for_update_tx(
        &self,
        project_id: Uuid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<Project>, Error> {
        let query = format!(
            "SELECT {} FROM projects WHERE id = $1 FOR UPDATE",
            PROJECT_COLUMNS
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .fetch_optional(&mut **tx)
            .await
    }

    async fn set_project_progress_tx(
        &self,
        project_id: Uuid,
        overall_progress: i32,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE projects SET overall_progress = $2, updated_at = NOW() WHERE id = $1")
            .bind(project_id)
            .bind(overall_progress)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
