pub mod token;
pub use token::{Claims, TokenError, TokenIssuer};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, AuthenticationResponse};
pub use auth_service_impl::SeaOrmAuthService;

pub mod matricule_service;
pub mod matricule_service_impl;
pub use matricule_service::{MatriculeError, MatriculeParts, MatriculeService};
pub use matricule_service_impl::SeaOrmMatriculeService;
