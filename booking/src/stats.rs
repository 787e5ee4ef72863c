//! Read-side stats over the booking collection.
//!
//! A pure, stateless aggregation: the caller hands in one consistent
//! snapshot of the bookings (see `BookingEngine::snapshot`) and gets counts,
//! revenue, and popularity back. Nothing here mutates or caches — reads
//! taken at different times are never mixed, so revenue is not double
//! counted across concurrent mutation.

use crate::catalog::{ServiceCategory, ServiceDirectory};
use crate::types::{Booking, BookingStatus, Money, ServiceId};
use chrono::Datelike;
use std::collections::{BTreeMap, HashMap};

/// Aggregated metrics over one snapshot of the booking collection.
#[derive(Clone, Debug, Default)]
pub struct BookingStats {
    /// Total number of bookings, any status
    pub total_bookings: usize,
    /// Number of bookings per lifecycle status
    pub status_counts: HashMap<BookingStatus, usize>,
    /// Sum of prices of paid, confirmed-or-completed bookings
    pub total_revenue: Money,
    /// Revenue bucketed by service-date `(year, month)`
    pub monthly_revenue: BTreeMap<(i32, u32), Money>,
    /// The most-booked services, by booking count, descending
    pub top_services: Vec<(ServiceId, usize)>,
    /// Revenue per service category
    pub revenue_by_category: HashMap<ServiceCategory, Money>,
}

impl BookingStats {
    /// Number of bookings currently in the given status
    #[must_use]
    pub fn count(&self, status: BookingStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Computes stats over one snapshot of the booking collection.
    ///
    /// Revenue counts a booking when it is `Confirmed` or `Completed` with
    /// payment received. `top_n` bounds the popularity list.
    #[must_use]
    pub fn compute(
        bookings: &[Booking],
        services: &dyn ServiceDirectory,
        top_n: usize,
    ) -> Self {
        let mut stats = Self {
            total_bookings: bookings.len(),
            ..Self::default()
        };
        let mut bookings_per_service: HashMap<ServiceId, usize> = HashMap::new();

        for booking in bookings {
            *stats.status_counts.entry(booking.status).or_insert(0) += 1;
            *bookings_per_service.entry(booking.service_id).or_insert(0) += 1;

            let earns_revenue = matches!(
                booking.status,
                BookingStatus::Confirmed | BookingStatus::Completed
            ) && booking.is_paid();
            if !earns_revenue {
                continue;
            }

            stats.total_revenue = stats
                .total_revenue
                .checked_add(booking.price)
                .unwrap_or(stats.total_revenue);

            let bucket = (booking.date.year(), booking.date.month());
            let monthly = stats
                .monthly_revenue
                .entry(bucket)
                .or_insert_with(|| Money::from_cents(0));
            *monthly = monthly.checked_add(booking.price).unwrap_or(*monthly);

            if let Some(service) = services.service(booking.service_id) {
                let per_category = stats
                    .revenue_by_category
                    .entry(service.category)
                    .or_insert_with(|| Money::from_cents(0));
                *per_category = per_category
                    .checked_add(booking.price)
                    .unwrap_or(*per_category);
            }
        }

        let mut ranked: Vec<(ServiceId, usize)> = bookings_per_service.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_uuid().cmp(b.0.as_uuid())));
        ranked.truncate(top_n);
        stats.top_services = ranked;

        stats
    }
}
