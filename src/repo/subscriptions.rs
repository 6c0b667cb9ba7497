use uuid::Uuid;

use crate::domain::CalendarMonth;
use crate::error::Result;
use crate::model::{NewSubscription, Subscription};

/// Optional equality filters applied to cost queries.
/// Filters are independent, and both may be present at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

impl CostFilter {
    pub fn matches(&self, subscription: &Subscription) -> bool {
        self.user_id.map_or(true, |id| subscription.user_id == id)
            && self
                .service_name
                .as_deref()
                .map_or(true, |name| subscription.service_name == name)
    }
}

/// Whether a subscription's active range touches `[period_start, period_end]`.
/// A missing end date never excludes a subscription.
pub fn overlaps(
    subscription: &Subscription,
    period_start: CalendarMonth,
    period_end: CalendarMonth,
) -> bool {
    subscription.start_date <= period_end
        && subscription
            .end_date
            .map_or(true, |end| end >= period_start)
}

/// Read capability needed by the cost aggregator.
/// NOTE: Intended to facilitate easier testing/mocking
/// TODO: Swap async-trait for std async traits once they support `dyn` dispatch
#[async_trait::async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Fetch every subscription overlapping the period and passing the filter, in any order
    async fn find_overlapping(
        &self,
        period_start: CalendarMonth,
        period_end: CalendarMonth,
        filter: &CostFilter,
    ) -> Result<Vec<Subscription>>;
}

/// Full CRUD access to stored subscriptions
#[async_trait::async_trait]
pub trait SubscriptionRepo: SubscriptionStore {
    /// Insert a new subscription, returning its assigned ID
    async fn insert(&self, new_subscription: &NewSubscription) -> Result<i32>;

    /// Fetch every stored subscription, ordered by ID
    async fn fetch_all(&self) -> Result<Vec<Subscription>>;

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Subscription>>;

    /// Replace every mutable field of a subscription.
    /// Returns `false` if no subscription has that ID.
    async fn update(&self, id: i32, subscription: &NewSubscription) -> Result<bool>;

    /// Returns `false` if no subscription has that ID
    async fn delete(&self, id: i32) -> Result<bool>;
}
