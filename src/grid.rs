use crate::entity::{EntityId, EntityRecord, EntityType, QueryResult, QueryResults};
use crate::error::{GridError, Result};
use crate::shape::{Circle, Intersect, Shape};
use crate::storage::{CellRange, DenseStorage, SparseStorage, Storage};
use mint::Point2;

/// Construction parameters of a grid.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Side of a cell in world units.
    pub grid_size: f32,
    /// Side of the map in cells, only used by dense grids.
    pub map_size: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 2.0,
            map_size: 256,
        }
    }
}

/// Occupancy snapshot, mostly useful for tuning the cell size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    pub occupied_cells: usize,
    /// Records across all cells, a shape spanning several cells is counted once per cell.
    pub records: usize,
    pub pooled_cells: usize,
}

/// Grid is a shape-based broad phase that uses a generic storage of cells which acts as a
/// grid instead of a tree.
///
/// ## Fast queries
/// In theory, Grid should be faster than a quadtree/r-tree because it has no log costs
/// (calculating the cells around a shape is trivial).
/// However, it only works if the cell size is adapted to the problem, much like how a tree has to
/// be balanced to be efficient.
///
/// ## Per-frame rebuild
/// There is no removal or position update. The grid is meant to be built once and reused every
/// frame: `clear`, then `add_shape` for every live entity, then any number of `query`.
/// Clearing keeps every allocation around, so once the working set is stable a frame
/// doesn't allocate at all.
///
/// Entity ids are opaque, the grid only hands them back.
///
/// ## Examples
/// ```rust
/// use flat_broadphase::{EntityType, QueryResults, Shape, SparseGrid};
///
/// let mut g = SparseGrid::new(2.0).unwrap(); // Creates a new grid with cells of 2x2 world units
/// let mut out = QueryResults::new(); // Reused for every query
///
/// g.clear(); // Start of the frame
/// g.add_shape(Shape::circle([5.0, 5.0], 1.0), EntityType::Enemy, 7);
/// g.add_shape(Shape::circle([5.0, 5.0], 1.0), EntityType::Player, 1);
///
/// g.query(Shape::circle([6.0, 5.0], 0.5), Some(EntityType::Enemy), &mut out);
/// assert_eq!(out.len(), 1);
/// assert_eq!(out.as_slice()[0].entity_id, 7);
///
/// g.query(Shape::circle([6.0, 5.0], 0.5), None, &mut out); // out is cleared first
/// assert_eq!(out.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Grid<ST: Storage = SparseStorage> {
    grid_size: f32,
    storage: ST,
    records: usize,
}

fn check_grid_size(grid_size: f32) -> Result<()> {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return Err(GridError::InvalidGridSize(grid_size));
    }
    Ok(())
}

impl Grid<SparseStorage> {
    /// Creates an empty unbounded grid.
    /// The cell size should be about the same magnitude as your queries size.
    pub fn new(grid_size: f32) -> Result<Self> {
        Self::with_storage(grid_size, SparseStorage::new())
    }

    /// `map_size` is ignored, a sparse grid has no bounds.
    pub fn from_config(config: GridConfig) -> Result<Self> {
        Self::new(config.grid_size)
    }
}

impl Grid<DenseStorage> {
    /// Creates an empty grid backed by a fixed array of `map_size` x `map_size` cells
    /// centered on zero.
    /// Shapes outside of it are clamped to the border cells, see [`DenseStorage`].
    ///
    /// Note that the map size is counted in cells and not in absolute units (!)
    pub fn new_centered(grid_size: f32, map_size: i32) -> Result<Self> {
        check_grid_size(grid_size)?;
        Self::with_storage(grid_size, DenseStorage::new_centered(map_size)?)
    }

    pub fn from_config(config: GridConfig) -> Result<Self> {
        Self::new_centered(config.grid_size, config.map_size)
    }
}

impl<ST: Storage> Grid<ST> {
    /// Creates an empty grid on top of a custom storage.
    pub fn with_storage(grid_size: f32, storage: ST) -> Result<Self> {
        check_grid_size(grid_size)?;
        tracing::debug!(grid_size, "creating grid");
        Ok(Self {
            grid_size,
            storage,
            records: 0,
        })
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// The underlying storage
    pub fn storage(&self) -> &ST {
        &self.storage
    }

    /// The cells a shape is stored in, and looked for in.
    pub fn cell_range(&self, shape: &Shape) -> CellRange {
        self.storage
            .bound(CellRange::from_aabb(&shape.bbox(), self.grid_size))
    }

    /// Empties the grid, to be called once at the start of every frame.
    /// Runs in O(C) where C is the number of occupied cells. No memory is freed.
    pub fn clear(&mut self) {
        let cells = self.storage.clear();
        tracing::trace!(cells, records = self.records, "cleared grid");
        self.records = 0;
    }

    /// Inserts a shape in every cell its bounding box touches.
    ///
    /// # Example
    /// ```rust
    /// use flat_broadphase::{EntityType, Shape, SparseGrid};
    /// let mut g = SparseGrid::new(10.0).unwrap();
    /// g.add_shape(Shape::circle([2.0, 2.0], 3.0), EntityType::Player, 0);
    /// ```
    pub fn add_shape(&mut self, shape: Shape, entity_type: EntityType, entity_id: EntityId) {
        let record = EntityRecord {
            shape,
            entity_type,
            entity_id,
        };
        for (x, y) in self.cell_range(&shape) {
            self.storage.insert(x, y, record);
            self.records += 1;
        }
    }

    /// Finds the entities whose shape intersects the given shape, optionally only of one type.
    ///
    /// `out` is cleared first, then filled with every matching entity once, even if its shape spans
    /// several of the visited cells. Does not allocate once `out` has grown enough.
    ///
    /// # Example
    /// ```rust
    /// use flat_broadphase::{EntityType, QueryResults, Shape, SparseGrid};
    ///
    /// let mut g = SparseGrid::new(10.0).unwrap();
    /// g.add_shape(Shape::circle([2.0, 2.0], 3.0), EntityType::Enemy, 0);
    /// g.add_shape(Shape::circle([5.0, 2.0], 3.0), EntityType::Enemy, 1);
    ///
    /// let mut out = QueryResults::new();
    /// g.query(Shape::aabb([-10.0, -10.0], [10.0, 10.0]), None, &mut out);
    /// assert_eq!(out.len(), 2);
    /// ```
    pub fn query(&self, shape: Shape, filter: Option<EntityType>, out: &mut QueryResults) {
        out.clear();

        for (x, y) in self.cell_range(&shape) {
            let cell = match self.storage.cell(x, y) {
                Some(cell) => cell,
                None => continue,
            };
            for rec in cell.iter() {
                if filter.map_or(false, |t| t != rec.entity_type) {
                    continue;
                }
                if rec.shape.intersects(shape) {
                    out.insert(QueryResult {
                        entity_type: rec.entity_type,
                        entity_id: rec.entity_id,
                    });
                }
            }
        }
    }

    /// Queries for entities around a point, same as querying a circle at pos with a given radius.
    pub fn query_around(
        &self,
        pos: impl Into<Point2<f32>>,
        radius: f32,
        filter: Option<EntityType>,
        out: &mut QueryResults,
    ) {
        self.query(Shape::Circle(Circle::new(pos, radius)), filter, out)
    }

    /// Number of stored records, counting a shape once per cell it is in.
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    pub fn stats(&self) -> GridStats {
        GridStats {
            occupied_cells: self.storage.occupied(),
            records: self.records,
            pooled_cells: self.storage.pooled(),
        }
    }
}


#[cfg(test)]
mod testssparse {
    use crate::entity::{EntityType, QueryResults};
    use crate::shape::{Intersect, Shape};
    use crate::storage::Storage;
    use crate::SparseGrid;

    fn ids(out: &QueryResults) -> Vec<u64> {
        let mut v: Vec<_> = out.iter().map(|r| r.entity_id).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_insert_then_find() {
        let mut g = SparseGrid::new(2.0).unwrap();
        let mut out = QueryResults::new();
        g.add_shape(Shape::circle([5.0, 5.0], 1.0), EntityType::Enemy, 7);

        g.query(Shape::circle([5.0, 5.0], 1.0), Some(EntityType::Enemy), &mut out);
        assert_eq!(ids(&out), vec![7]);

        g.query(Shape::circle([100.0, 100.0], 1.0), Some(EntityType::Enemy), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_rounded_touch_consistent() {
        let mut g = SparseGrid::new(1.0).unwrap();
        let mut out = QueryResults::new();
        let a = Shape::circle([0.0, 0.0], 0.99999994);
        let b = Shape::circle([4.0, 0.0], 3.0);
        g.add_shape(a, EntityType::Enemy, 0);
        g.add_shape(Shape::aabb([1.0, -1.0], [2.0, 1.0]), EntityType::Enemy, 1);

        g.query(b, None, &mut out);
        assert_eq!(ids(&out), vec![1]);

        g.query(a, None, &mut out);
        assert_eq!(ids(&out), vec![0]);
        assert!(!a.intersects(b));
    }

    #[test]
    fn test_negative_coordinates() {
        let mut g = SparseGrid::new(2.0).unwrap();
        let mut out = QueryResults::new();
        g.add_shape(Shape::circle([-0.5, -0.5], 1.0), EntityType::Player, 1);
        g.add_shape(Shape::circle([-1000.0, 999.0], 1.0), EntityType::Player, 2);

        g.query_around([0.25, 0.25], 0.1, None, &mut out);
        assert_eq!(ids(&out), vec![1]);

        g.query_around([-1000.0, 1000.5], 0.6, None, &mut out);
        assert_eq!(ids(&out), vec![2]);
    }

    #[test]
    fn test_no_duplicates() {
        let mut g = SparseGrid::new(2.0).unwrap();
        let mut out = QueryResults::new();
        g.add_shape(Shape::circle([4.0, 4.0], 1.0), EntityType::Enemy, 3);
        assert_eq!(g.stats().occupied_cells, 4);

        g.query_around([4.0, 4.0], 3.0, Some(EntityType::Enemy), &mut out);
        assert_eq!(ids(&out), vec![3]);
    }

    #[test]
    fn test_clear_recycles_cells() {
        let mut g = SparseGrid::new(2.0).unwrap();
        let mut out = QueryResults::new();

        for frame in 0..5 {
            g.clear();
            for i in 0..100 {
                let x = (i % 10) as f32 * 2.0 + 1.0;
                let y = (i / 10) as f32 * 2.0 + 1.0;
                g.add_shape(Shape::circle([x, y], 0.5), EntityType::Enemy, i);
            }
            assert_eq!(g.stats().occupied_cells, 100);
            assert_eq!(g.stats().pooled_cells, 0);
            assert_eq!(g.storage().pool().allocated(), 100, "frame {}", frame);
        }

        g.clear();
        assert_eq!(g.stats().pooled_cells, 100);
        g.query(Shape::aabb([-50.0, -50.0], [50.0, 50.0]), None, &mut out);
        assert!(out.is_empty());
        assert!(g.storage().cell(0, 0).is_none());
    }

    #[test]
    fn test_cross_check() {
        let mut g = SparseGrid::new(2.0).unwrap();
        let mut out = QueryResults::new();

        fastrand::seed(1);
        for frame in 0..3 {
            let shapes: Vec<Shape> = (0..1000)
                .map(|i| {
                    let center = [fastrand::f32() * 20.0, fastrand::f32() * 20.0];
                    if i % 4 == 0 {
                        let w = fastrand::f32() * 3.0;
                        Shape::aabb(center, [center[0] + w, center[1] - w])
                    } else {
                        Shape::circle(center, fastrand::f32() * 2.0)
                    }
                })
                .collect();

            g.clear();
            for (i, s) in shapes.iter().enumerate() {
                let t = if i % 3 == 0 {
                    EntityType::Player
                } else {
                    EntityType::Enemy
                };
                g.add_shape(*s, t, i as u64);
            }

            for _ in 0..300 {
                let center = [fastrand::f32() * 24.0 - 2.0, fastrand::f32() * 24.0 - 2.0];
                let q = Shape::circle(center, 2.0);
                g.query(q, Some(EntityType::Enemy), &mut out);

                let expected: Vec<u64> = shapes
                    .iter()
                    .enumerate()
                    .filter(|&(i, s)| i % 3 != 0 && s.intersects(q))
                    .map(|(i, _)| i as u64)
                    .collect();
                assert_eq!(ids(&out), expected, "frame {}", frame);
            }
        }
    }
}
