#![deny(missing_docs)]
#![doc = "Shared error types and deterministic seeding for the NSIM experiment toolkit."]

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, NsimError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
