use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, MatriculeService, SeaOrmAuthService, SeaOrmMatriculeService, TokenIssuer,
};

/// Process-wide dependencies, built once at startup and shared by every
/// request handler.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub matricule_service: Arc<dyn MatriculeService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let token_issuer = Arc::new(TokenIssuer::new(&config.security));

        let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            token_issuer,
            config.security.clone(),
        ));

        let matricule_service: Arc<dyn MatriculeService> =
            Arc::new(SeaOrmMatriculeService::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            matricule_service,
        }
    }
}
