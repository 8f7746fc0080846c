pub(crate) mod catalog;
mod fetch_pool;
mod http_client;
mod movie;
mod scheduler;

pub use catalog::{CatalogSource, DoubanCatalog};
pub use fetch_pool::FetchPool;
pub use http_client::build_http_client;
pub use movie::{MovieError, MovieService, Reconciliation, SyncReport};
pub use scheduler::{JobResult, MovieSyncJob, SchedulerJob, SchedulerService};
