use std::collections::BTreeMap;

use chrono::Utc;

use tokio::sync::RwLock;

use crate::domain::CalendarMonth;
use crate::error::Result;
use crate::model::{NewSubscription, Subscription};

use super::{overlaps, CostFilter, SubscriptionRepo, SubscriptionStore};

/// In-memory subscription repository, used in place of Postgres by tests
#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepo {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i32,
    rows: BTreeMap<i32, Subscription>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for InMemorySubscriptionRepo {
    #[tracing::instrument(name = "Fetch subscriptions overlapping a period", skip(self))]
    async fn find_overlapping(
        &self,
        period_start: CalendarMonth,
        period_end: CalendarMonth,
        filter: &CostFilter,
    ) -> Result<Vec<Subscription>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .filter(|s| overlaps(s, period_start, period_end) && filter.matches(s))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    #[tracing::instrument(name = "Insert subscription", skip(self))]
    async fn insert(&self, new_subscription: &NewSubscription) -> Result<i32> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let id = state.last_id;
        let now = Utc::now();
        state.rows.insert(
            id,
            Subscription {
                id,
                service_name: new_subscription.service_name.to_string(),
                price: new_subscription.price.value(),
                user_id: new_subscription.user_id,
                start_date: new_subscription.start_date,
                end_date: new_subscription.end_date,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id)
    }

    #[tracing::instrument(name = "Fetch all subscriptions", skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Subscription>> {
        let state = self.state.read().await;
        Ok(state.rows.values().cloned().collect())
    }

    #[tracing::instrument(name = "Fetch a subscription by id", skip(self))]
    async fn fetch_by_id(&self, id: i32) -> Result<Option<Subscription>> {
        let state = self.state.read().await;
        Ok(state.rows.get(&id).cloned())
    }

    #[tracing::instrument(name = "Update a subscription by id", skip(self))]
    async fn update(&self, id: i32, subscription: &NewSubscription) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(row) = state.rows.get_mut(&id) else {
            return Ok(false);
        };

        row.service_name = subscription.service_name.to_string();
        row.price = subscription.price.value();
        row.user_id = subscription.user_id;
        row.start_date = subscription.start_date;
        row.end_date = subscription.end_date;
        row.updated_at = Utc::now();

        Ok(true)
    }

    #[tracing::instrument(name = "Delete a subscription by id", skip(self))]
    async fn delete(&self, id: i32) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.rows.remove(&id).is_some())
    }
}
