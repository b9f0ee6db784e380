pub use super::matricules::Entity as Matricules;
pub use super::users::Entity as Users;
