//! In-memory state mirrored from the archive API.

pub mod locations;
pub mod selection;
pub mod villagers;

pub use locations::{LocationStore, Marker};
pub use selection::{RecordSelection, SelectionTicket};
pub use villagers::VillagerIdCache;
