use crate::domain::CalendarMonth;
use crate::error::Result;
use crate::model::Subscription;
use crate::repo::{CostFilter, SubscriptionStore};

/// A subscription's active range clipped to a query period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRange {
    pub start: CalendarMonth,
    pub end: CalendarMonth,
}

impl EffectiveRange {
    /// Whole months covered, counting both endpoint months. Inverted ranges count as zero.
    pub fn months(&self) -> i64 {
        months_inclusive(self.start, self.end)
    }
}

/// Clip a subscription to `[period_start, period_end]`.
/// An open-ended subscription runs through the end of the period.
pub fn effective_range(
    subscription: &Subscription,
    period_start: CalendarMonth,
    period_end: CalendarMonth,
) -> EffectiveRange {
    let start = subscription.start_date.max(period_start);
    let end = match subscription.end_date {
        Some(end) => end.min(period_end),
        None => period_end,
    };

    EffectiveRange {
        start: CalendarMonth::normalize(start.as_date()),
        end: CalendarMonth::normalize(end.as_date()),
    }
}

/// Inclusive month count between two calendar months, clamped at zero
pub fn months_inclusive(start: CalendarMonth, end: CalendarMonth) -> i64 {
    let years = i64::from(end.year()) - i64::from(start.year());
    let months = i64::from(end.month()) - i64::from(start.month());

    (years * 12 + months + 1).max(0)
}

/// Cost contributed by one subscription to a period: price times active months
pub fn prorated_cost(
    subscription: &Subscription,
    period_start: CalendarMonth,
    period_end: CalendarMonth,
) -> i64 {
    let range = effective_range(subscription, period_start, period_end);
    i64::from(subscription.price) * range.months()
}

/// Total cost of every subscription active during `[period_start, period_end]`.
///
/// Both bounds must already be normalized calendar months. The order of the bounds is not
/// checked: an inverted period selects nothing billable and sums to zero. Store failures are
/// returned unchanged, and no partial totals are produced.
#[tracing::instrument(name = "Sum subscription cost for a period", skip(store))]
pub async fn sum_cost<S>(
    store: &S,
    period_start: CalendarMonth,
    period_end: CalendarMonth,
    filter: &CostFilter,
) -> Result<i64>
where
    S: SubscriptionStore + ?Sized,
{
    let subscriptions = store
        .find_overlapping(period_start, period_end, filter)
        .await?;

    let total: i64 = subscriptions
        .iter()
        .map(|subscription| prorated_cost(subscription, period_start, period_end))
        .sum();

    tracing::debug!(matched = subscriptions.len(), total, "Summed subscription cost");

    Ok(total)
}
