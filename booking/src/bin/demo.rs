//! Booking System Demo
//!
//! Interactive demonstration of the booking coordination core showing:
//! - Booking creation with atomic slot acquisition
//! - The approval workflow (admin triage → partner accept → payment)
//! - A losing race for an occupied slot
//! - Reschedule negotiation
//! - Cancellation with automatic refund initiation
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use booking::{
    BookingAction, BookingEngine, BookingEnvironment, Config, InMemoryServiceDirectory,
    ServiceCategory, ServiceOffering, TracingNotifier,
    types::{Actor, BookingId, Money, PartnerId, ServiceId, TimeSlot},
};
use slotbook_core::environment::SystemClock;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    let default_filter = format!("{},booking=debug", config.server.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n📅 ============================================");
    println!("   Booking Coordination - Live Demo");
    println!("============================================\n");

    // Catalog as the engine sees it (CRUD lives upstream)
    let partner_user = Uuid::new_v4();
    let service = ServiceOffering {
        id: ServiceId::new(),
        partner_id: PartnerId::from_uuid(partner_user),
        name: "Premium wedding catering".to_string(),
        category: ServiceCategory::Catering,
        price: Money::from_units(1500),
        discount_percent: 10,
        duration_hours: 2,
    };
    let directory = InMemoryServiceDirectory::new().with_service(service.clone());

    let env = BookingEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(directory),
        Arc::new(TracingNotifier),
    );
    let engine = BookingEngine::with_config(env, &config.engine);

    println!("📋 Demo Scenario: {}", service.name);
    println!("   List price: {} (10% off)\n", service.price);

    let customer = Uuid::new_v4();
    let admin = Actor::admin(Uuid::new_v4());
    let partner = Actor::partner(partner_user);
    let booking_id = BookingId::new();
    let service_date = chrono::Utc::now().date_naive() + chrono::Days::new(30);

    // Step 1: customer books a slot
    println!("1️⃣  Customer booking {service_date} 10:00-12:00...");
    let booking = engine
        .dispatch(BookingAction::CreateBooking {
            actor: Actor::customer(customer),
            booking_id,
            service_id: service.id,
            contact_name: "Jordan Reyes".to_string(),
            contact_mobile: "+1 555 0123".to_string(),
            date: service_date,
            slot: TimeSlot::TenToTwelve,
        })
        .await?;
    println!("   ✓ Created: {} ({})\n", booking.id, booking.status);

    // Step 2: a second customer races for the same slot and loses
    println!("2️⃣  Second customer racing for the same slot...");
    let conflict = engine
        .dispatch(BookingAction::CreateBooking {
            actor: Actor::customer(Uuid::new_v4()),
            booking_id: BookingId::new(),
            service_id: service.id,
            contact_name: "Sam Okafor".to_string(),
            contact_mobile: "+1 555 0199".to_string(),
            date: service_date,
            slot: TimeSlot::TenToTwelve,
        })
        .await;
    match conflict {
        Err(error) => println!("   ✓ Rejected as expected: {error}\n"),
        Ok(_) => println!("   ✗ Unexpectedly succeeded\n"),
    }

    // Step 3: approval chain
    println!("3️⃣  Admin assigns, partner accepts, customer pays...");
    engine
        .dispatch(BookingAction::Assign {
            actor: admin,
            booking_id,
        })
        .await?;
    engine
        .dispatch(BookingAction::AcceptAssignment {
            actor: partner,
            booking_id,
        })
        .await?;
    engine
        .dispatch(BookingAction::MarkPaid {
            actor: Actor::customer(customer),
            booking_id,
        })
        .await?;
    let confirmed = engine
        .dispatch(BookingAction::VerifyPayment {
            actor: admin,
            booking_id,
        })
        .await?;
    println!("   ✓ Status: {}\n", confirmed.status);

    // Step 4: reschedule negotiation
    println!("4️⃣  Partner proposes moving to 14:00-16:00, customer accepts...");
    engine
        .dispatch(BookingAction::ProposeReschedule {
            actor: partner,
            booking_id,
            proposed_date: service_date,
            proposed_slot: TimeSlot::FourteenToSixteen,
            reason: "morning crew unavailable".to_string(),
        })
        .await?;
    let moved = engine
        .dispatch(BookingAction::RespondToReschedule {
            actor: Actor::customer(customer),
            booking_id,
            accept: true,
        })
        .await?;
    println!("   ✓ Now at {} {}\n", moved.date, moved.slot);

    // Step 5: partner cancels; refund opens automatically
    println!("5️⃣  Partner cancels the paid booking...");
    let cancelled = engine
        .dispatch(BookingAction::Cancel {
            actor: partner,
            booking_id,
            refund_amount: None,
        })
        .await?;
    if let Some(refund) = &cancelled.refund {
        println!("   ✓ Refund of {} is {:?}\n", refund.amount, refund.status);
    }
    engine
        .dispatch(BookingAction::BeginRefund {
            actor: admin,
            booking_id,
        })
        .await?;
    let refunded = engine
        .dispatch(BookingAction::ProcessRefund {
            actor: admin,
            booking_id,
            amount: None,
        })
        .await?;

    println!("📊 Final booking record:");
    println!("{}\n", serde_json::to_string_pretty(&refunded)?);

    let stats = engine.stats().await;
    println!("📈 Stats: {} bookings, revenue {}", stats.total_bookings, stats.total_revenue);

    Ok(())
}
