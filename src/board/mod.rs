//! Board representation.
//!
//! Contains the field/owner data model, coordinates, and the connectivity
//! oracle that counts areas.

pub mod connectivity;
pub mod grid;
pub mod position;

pub use connectivity::{count_adjacent_regions, count_regions, same_region};
pub use grid::{Field, Grid, Hypothetical, OwnerLookup, OwnerRecord, UNOWNED};
pub use position::{Direction, Position, NEIGHBORHOOD};
