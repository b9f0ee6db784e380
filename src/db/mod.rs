use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::users::Role;

pub mod migrator;
pub mod repositories;

pub use repositories::matricule::Matricule;
pub use repositories::user::{User, is_unique_violation};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        // Every sqlite in-memory connection is its own database, so the pool
        // must hold exactly one connection for the lifetime of the store.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);
        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn matricule_repo(&self) -> repositories::matricule::MatriculeRepository {
        repositories::matricule::MatriculeRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        config: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password, role, config)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        self.user_repo().update_profile(id, username, email).await
    }

    pub async fn set_user_role(&self, id: i32, role: Role) -> Result<bool> {
        self.user_repo().set_role(id, role).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn verify_user_password(
        &self,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<bool> {
        self.user_repo()
            .verify_password(email, password, config)
            .await
    }

    // ========================================================================
    // Matricules
    // ========================================================================

    pub async fn add_matricule(
        &self,
        series: &str,
        location: &str,
        registration_number: &str,
    ) -> Result<Matricule> {
        self.matricule_repo()
            .add(series, location, registration_number)
            .await
    }

    pub async fn get_matricule(&self, id: i32) -> Result<Option<Matricule>> {
        self.matricule_repo().get(id).await
    }

    pub async fn list_matricules(&self) -> Result<Vec<Matricule>> {
        self.matricule_repo().list_all().await
    }
}
