use uuid::Uuid;

use chrono::{DateTime, Utc};

use serde::Serialize;

use utoipa::ToSchema;

use crate::domain::{CalendarMonth, Price, ServiceName};
use crate::error::{Error, Result};

/// Validated subscription write request, used for both inserts and full replacements
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub service_name: ServiceName,
    pub price: Price,
    pub user_id: Uuid,
    pub start_date: CalendarMonth,
    /// `None` for an open-ended subscription
    pub end_date: Option<CalendarMonth>,
}

impl NewSubscription {
    pub fn new(
        service_name: ServiceName,
        price: Price,
        user_id: Uuid,
        start_date: CalendarMonth,
        end_date: Option<CalendarMonth>,
    ) -> Result<Self> {
        if matches!(end_date, Some(end) if end < start_date) {
            return Err(Error::ParsingError(
                "end_date cannot be before start_date".into(),
            ));
        }

        Ok(Self {
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        })
    }
}

/// Stored Subscription record
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema, sqlx::FromRow)]
pub struct Subscription {
    /// ID of the subscription, assigned on insert
    pub id: i32,
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400)]
    pub price: i32,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "2025-07")]
    pub start_date: CalendarMonth,
    #[schema(value_type = Option<String>, example = "2025-12")]
    pub end_date: Option<CalendarMonth>,
    /// Creation and update timestamps
    /// NOTE: Set by the store, not used for billing
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Merge a partial update onto this record, revalidating the result
    pub fn apply(&self, patch: SubscriptionPatch) -> Result<NewSubscription> {
        let service_name = match patch.service_name {
            Patch::Set(name) => name,
            Patch::Unset => self.service_name.parse()?,
        };
        let price = match patch.price {
            Patch::Set(price) => price,
            Patch::Unset => Price::try_from(self.price)?,
        };

        NewSubscription::new(
            service_name,
            price,
            patch.user_id.unwrap_or(self.user_id),
            patch.start_date.unwrap_or(self.start_date),
            patch.end_date.unwrap_or(self.end_date),
        )
    }
}

/// A single field of a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Unset,
    Set(T),
}

impl<T> Patch<T> {
    /// The patched value, or `current` if the field was left unset
    pub fn unwrap_or(self, current: T) -> T {
        match self {
            Self::Set(value) => value,
            Self::Unset => current,
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

/// Partial subscription update request
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPatch {
    pub service_name: Patch<ServiceName>,
    pub price: Patch<Price>,
    pub user_id: Patch<Uuid>,
    pub start_date: Patch<CalendarMonth>,
    /// `Set(None)` clears the end date
    pub end_date: Patch<Option<CalendarMonth>>,
}
