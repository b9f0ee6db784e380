use crate::entities::{matricules, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matricule {
    pub id: i32,
    pub series: String,
    pub location: String,
    pub registration_number: String,
    pub created_at: String,
}

impl From<matricules::Model> for Matricule {
    fn from(m: matricules::Model) -> Self {
        Self {
            id: m.id,
            series: m.series,
            location: m.location,
            registration_number: m.registration_number,
            created_at: m.created_at,
        }
    }
}

/// Repository for matricule records
pub struct MatriculeRepository {
    conn: DatabaseConnection,
}

impl MatriculeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        series: &str,
        location: &str,
        registration_number: &str,
    ) -> Result<Matricule> {
        let active_model = matricules::ActiveModel {
            series: Set(series.to_string()),
            location: Set(location.to_string()),
            registration_number: Set(registration_number.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert matricule")?;

        info!(
            "Added matricule {} {} {} (id {})",
            model.series, model.location, model.registration_number, model.id
        );
        Ok(Matricule::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Matricule>> {
        let row = Matricules::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query matricule by ID")?;

        Ok(row.map(Matricule::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Matricule>> {
        let rows = Matricules::find()
            .order_by_asc(matricules::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list matricules")?;

        Ok(rows.into_iter().map(Matricule::from).collect())
    }
}
