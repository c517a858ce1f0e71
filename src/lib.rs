//!
//! flat_broadphase is a uniform grid broad phase, meant to be rebuilt every frame of a simulation
//! and queried many times in between.
//!
//! Both DenseGrid and SparseGrid partition the space using square cells of user defined width.
//! DenseGrid uses a fixed Vec of cells over a bounded map and SparseGrid a HashMap of pooled cells
//! (so the world is unbounded).
//!
//! Queries first gather the records of the cells covered by the query's bounding box, then run
//! an exact intersection test on each of them.
//!

pub mod cell;
pub mod entity;
pub mod error;
pub mod grid;
pub mod shape;
pub mod storage;

pub use entity::{EntityId, EntityRecord, EntityType, QueryResult, QueryResults};
pub use error::GridError;
pub use grid::{Grid, GridConfig, GridStats};
pub use shape::{Circle, Intersect, Shape, AABB};
use storage::DenseStorage;
use storage::SparseStorage;

pub type DenseGrid = Grid<DenseStorage>;
pub type SparseGrid = Grid<SparseStorage>;
