//! `SeaORM` implementation of the `MatriculeService` trait.

use crate::db::{Matricule, Store};
use crate::services::matricule_service::{MatriculeError, MatriculeParts, MatriculeService};
use async_trait::async_trait;

pub struct SeaOrmMatriculeService {
    store: Store,
}

impl SeaOrmMatriculeService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MatriculeService for SeaOrmMatriculeService {
    async fn add_matricule(&self, parts: &MatriculeParts) -> Result<Matricule, MatriculeError> {
        let valid = parts.validate()?;

        let matricule = self
            .store
            .add_matricule(valid.series, valid.location, valid.registration_number)
            .await
            .map_err(|e| MatriculeError::CreateFailed(format!("{e:#}")))?;

        Ok(matricule)
    }

    async fn list_matricules(&self) -> Result<Vec<Matricule>, MatriculeError> {
        Ok(self.store.list_matricules().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> (SeaOrmMatriculeService, Store) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        (SeaOrmMatriculeService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn added_matricule_is_retrievable() {
        let (svc, store) = service().await;

        let parts = MatriculeParts {
            series: Some("210".to_string()),
            location: Some("TUN".to_string()),
            registration_number: Some("4521".to_string()),
        };
        let created = svc.add_matricule(&parts).await.unwrap();

        let fetched = store.get_matricule(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.series, "210");
        assert_eq!(fetched.location, "TUN");
        assert_eq!(fetched.registration_number, "4521");
    }

    #[tokio::test]
    async fn invalid_parts_persist_nothing() {
        let (svc, _) = service().await;

        let parts = MatriculeParts {
            series: Some(String::new()),
            location: Some("LOC".to_string()),
            registration_number: Some("123".to_string()),
        };
        assert!(matches!(
            svc.add_matricule(&parts).await,
            Err(MatriculeError::MissingParts)
        ));
        assert!(svc.list_matricules().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicates_are_allowed() {
        let (svc, _) = service().await;
        let parts = MatriculeParts {
            series: Some("1".to_string()),
            location: Some("A".to_string()),
            registration_number: Some("2".to_string()),
        };

        svc.add_matricule(&parts).await.unwrap();
        svc.add_matricule(&parts).await.unwrap();
        assert_eq!(svc.list_matricules().await.unwrap().len(), 2);
    }
}
