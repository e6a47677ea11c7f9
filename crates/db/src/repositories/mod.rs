//! Repository layer.
//!
//! Each repository is a zero-sized type providing async operations that
//! accept `&dyn DocumentStore` as the first argument.

pub mod article_repo;
pub mod contractor_repo;
pub mod dashboard_repo;
pub mod project_repo;
pub mod registry;
pub mod user_repo;

pub use article_repo::ArticleRepo;
pub use contractor_repo::ContractorRepo;
pub use dashboard_repo::DashboardRepo;
pub use project_repo::ProjectRepo;
pub use registry::{Entity, Input, Record, Registry, SelectOption, Validated};
pub use user_repo::UserRepo;
