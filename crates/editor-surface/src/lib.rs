//! The live editing layer between the widgets and the buffer store.
//!
//! [`surface::EditableSurface`] owns the transient text and decoration
//! state of one bound slot; [`slots::SurfaceSlots`] enforces the
//! one-surface-per-slot invariant and the bus subscription lifecycle;
//! [`search::SearchController`] drives queries and publishes highlight
//! commands.

pub mod search;
pub mod slots;
pub mod surface;
