//! Read-side view of the service catalog.
//!
//! Catalog CRUD lives in an external collaborator; the engine only needs a
//! lookup from [`ServiceId`] to the offering's partner, price, and category.
//! That lookup is injected through the [`ServiceDirectory`] trait so the
//! engine stays testable without any catalog service running.

use crate::types::{Money, PartnerId, ServiceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category of an event service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    /// Food and drink
    Catering,
    /// Venue and stage decoration
    Decoration,
    /// Photo and video coverage
    Photography,
    /// Music, hosts, performers
    Entertainment,
    /// Transport and logistics
    Logistics,
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Catering => "catering",
            Self::Decoration => "decoration",
            Self::Photography => "photography",
            Self::Entertainment => "entertainment",
            Self::Logistics => "logistics",
        };
        write!(f, "{label}")
    }
}

/// A bookable service as the engine sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    /// Unique service identifier
    pub id: ServiceId,
    /// The partner fulfilling this service
    pub partner_id: PartnerId,
    /// Display name
    pub name: String,
    /// Service category
    pub category: ServiceCategory,
    /// List price
    pub price: Money,
    /// Current discount in percent (0 = none)
    pub discount_percent: u32,
    /// Nominal duration in hours
    pub duration_hours: u8,
}

impl ServiceOffering {
    /// The effective price after the current discount.
    ///
    /// Falls back to the list price if the discount is malformed.
    #[must_use]
    pub fn discounted_price(&self) -> Money {
        self.price
            .checked_apply_discount(self.discount_percent)
            .unwrap_or(self.price)
    }
}

/// Lookup into the externally owned service catalog.
pub trait ServiceDirectory: Send + Sync {
    /// Resolve a service offering by ID
    fn service(&self, id: ServiceId) -> Option<ServiceOffering>;
}

/// In-memory directory, built once at startup (or per test).
#[derive(Clone, Debug, Default)]
pub struct InMemoryServiceDirectory {
    services: HashMap<ServiceId, ServiceOffering>,
}

impl InMemoryServiceDirectory {
    /// Creates an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Adds an offering, builder-style
    #[must_use]
    pub fn with_service(mut self, offering: ServiceOffering) -> Self {
        self.services.insert(offering.id, offering);
        self
    }
}

impl ServiceDirectory for InMemoryServiceDirectory {
    fn service(&self, id: ServiceId) -> Option<ServiceOffering> {
        self.services.get(&id).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn discounted_price_applies_current_discount() {
        let offering = ServiceOffering {
            id: ServiceId::new(),
            partner_id: PartnerId::new(),
            name: "Wedding photography".to_string(),
            category: ServiceCategory::Photography,
            price: Money::from_units(500),
            discount_percent: 10,
            duration_hours: 2,
        };
        assert_eq!(offering.discounted_price(), Money::from_units(450));
    }

    #[test]
    fn directory_resolves_registered_services_only() {
        let offering = ServiceOffering {
            id: ServiceId::new(),
            partner_id: PartnerId::new(),
            name: "Catering for 50".to_string(),
            category: ServiceCategory::Catering,
            price: Money::from_units(1200),
            discount_percent: 0,
            duration_hours: 4,
        };
        let directory = InMemoryServiceDirectory::new().with_service(offering.clone());

        assert_eq!(directory.service(offering.id), Some(offering));
        assert_eq!(directory.service(ServiceId::new()), None);
    }
}
