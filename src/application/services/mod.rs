//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Surface)
//! but are themselves concrete structs, not traits.

mod document;
mod map;
mod renderer;

pub use document::{DocumentReport, DocumentService, MapStats};
pub use map::{MapService, PlacedConcept, RenderedMap};
pub use renderer::{BlankReason, ConceptMapRenderer, RenderOutcome};
