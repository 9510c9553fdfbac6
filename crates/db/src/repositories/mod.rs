pub mod integration_repo;

pub use integration_repo::IntegrationRepo;
