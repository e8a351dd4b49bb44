//! Core data models for the village map archive.

pub mod envelope;
pub mod location;
pub mod record;
pub mod villager;

pub use envelope::{Envelope, ErrorBody};
pub use location::{Location, LocationPayload, PayloadError};
pub use record::{
    DraftError, Participant, RecordChanges, RecordCreate, RecordDraft, RecordWire, VisitRecord,
};
pub use villager::{Villager, VillagerWire};
