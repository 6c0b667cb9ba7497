mod memory;
mod postgres;
mod subscriptions;

pub use memory::InMemorySubscriptionRepo;
pub use postgres::PgSubscriptionRepo;
pub use subscriptions::{overlaps, CostFilter, SubscriptionRepo, SubscriptionStore};
