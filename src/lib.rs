pub mod domain;
pub mod expand;
pub mod foundation;
pub mod geom;
pub mod mesh;

// Prelude
pub use domain::{CellType, Domain};
pub use expand::{expand, Block, BlockKind, FoundationGeometry, Surface, SurfaceKind};
pub use foundation::{Foundation, Layer, Material, Wall};
pub use geom::point::Point;
pub use geom::polygon::Polygon;
pub use mesh::mesher::Mesher;
