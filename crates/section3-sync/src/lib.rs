//! Sync layer: submission of Section 3 contract data to HUD reporting systems.
//!
//! Only the port and a simulated backend live here; a networked client for
//! SPEARS or IDIS would implement [`HudReporting`] alongside [`SimulatedHud`].

pub mod hud;

pub use hud::{HudReporting, HudSystem, SimulatedHud, SubmissionReceipt, SyncError};
