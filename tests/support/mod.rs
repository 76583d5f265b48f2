//! Shared test utilities.

use std::time::Duration;

use boathouse::{BoatRecord, ReviewRecord};

/// Upper bound on how long a step waits for a panel to settle.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds a boat of the given type and price.
pub fn boat(id: &str, name: &str, boat_type: &str, price: f64) -> BoatRecord {
    BoatRecord {
        id: id.into(),
        name: name.to_owned(),
        price: Some(price),
        boat_type_id: Some(boat_type.into()),
        ..BoatRecord::default()
    }
}

/// Builds `count` boats; odd ones are sailboats, even ones powerboats.
pub fn fleet(count: usize) -> Vec<BoatRecord> {
    (1..=count)
        .map(|index| {
            let boat_type = if index.is_multiple_of(2) { "Powerboat" } else { "Sailboat" };
            let price = f64::from(u32::try_from(index.saturating_mul(100)).unwrap_or(u32::MAX));
            boat(&format!("b{index}"), &format!("Boat {index}"), boat_type, price)
        })
        .collect()
}

/// Builds a review of `boat_id` written by a fixed reviewer.
pub fn review(id: &str, boat_id: &str, title: &str) -> ReviewRecord {
    ReviewRecord {
        id: id.into(),
        boat_id: boat_id.into(),
        reviewer_id: "005reviewer".into(),
        title: Some(title.to_owned()),
        rating: Some(4),
        ..ReviewRecord::default()
    }
}
