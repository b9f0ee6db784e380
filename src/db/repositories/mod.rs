pub mod matricule;
pub mod user;
