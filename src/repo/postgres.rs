use sqlx::PgPool;

use crate::domain::CalendarMonth;
use crate::error::Result;
use crate::model::{NewSubscription, Subscription};

use super::{CostFilter, SubscriptionRepo, SubscriptionStore};

/// Postgres Subscription Repository
#[derive(Debug, Clone)]
pub struct PgSubscriptionRepo {
    pool: PgPool,
}

impl PgSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for PgSubscriptionRepo {
    #[tracing::instrument(name = "Fetch subscriptions overlapping a period", skip(self))]
    async fn find_overlapping(
        &self,
        period_start: CalendarMonth,
        period_end: CalendarMonth,
        filter: &CostFilter,
    ) -> Result<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
            select id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            from subscriptions
            where start_date <= $1
              and (end_date is null or end_date >= $2)
              and ($3::uuid is null or user_id = $3)
              and ($4::text is null or service_name = $4)
            "#,
        )
        .bind(period_end)
        .bind(period_start)
        .bind(filter.user_id)
        .bind(filter.service_name.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }
}

#[async_trait::async_trait]
impl SubscriptionRepo for PgSubscriptionRepo {
    #[tracing::instrument(name = "Insert subscription", skip(self))]
    async fn insert(&self, new_subscription: &NewSubscription) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            insert into subscriptions(service_name, price, user_id, start_date, end_date)
            values ($1, $2, $3, $4, $5)
            returning id
            "#,
        )
        .bind(new_subscription.service_name.as_ref())
        .bind(new_subscription.price.value())
        .bind(new_subscription.user_id)
        .bind(new_subscription.start_date)
        .bind(new_subscription.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(name = "Fetch all subscriptions", skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
            select id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            from subscriptions
            order by id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Fetch a subscription by id", skip(self))]
    async fn fetch_by_id(&self, id: i32) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            select id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            from subscriptions
            where id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    #[tracing::instrument(name = "Update a subscription by id", skip(self))]
    async fn update(&self, id: i32, subscription: &NewSubscription) -> Result<bool> {
        let result = sqlx::query(
            r#"
            update subscriptions
            set service_name=$2, price=$3, user_id=$4, start_date=$5, end_date=$6, updated_at=now()
            where id=$1
            "#,
        )
        .bind(id)
        .bind(subscription.service_name.as_ref())
        .bind(subscription.price.value())
        .bind(subscription.user_id)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Delete a subscription by id", skip(self))]
    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("delete from subscriptions where id=$1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
