//! Zone lifecycle: placement policy and the once-per-turn resolution pass.
//!
//! None of these operations fail. Placement returns what happened to the
//! request (created, merged, refused by a void, or converted into unstable
//! resonance) and resolution returns a report.
mod placement;
mod resolve;

pub use placement::{ZonePlacement, create_zone};
pub use resolve::{ZoneResolution, resolve_turn, tick_voids};
