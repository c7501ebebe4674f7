//! Non-uniform 1-D axis meshing.
//!
//! Each axis of the domain is meshed independently: the geometry expander
//! supplies "control" coordinates (cell edges that must appear in the grid)
//! and a growth rule per interval between them, and [`mesher::Mesher`]
//! fills in the remaining cell edges.  Duplicate control coordinates yield
//! zero-thickness cells at flux interfaces.

pub mod interval;
pub mod mesher;
pub mod ranges;

pub use interval::{GrowthDir, Interval};
pub use mesher::{MeshData, Mesher};
pub use ranges::{Range, Ranges, ZoneKind};
