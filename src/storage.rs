use crate::cell::{CellPool, GridCell, INITIAL_CELL_CAPACITY};
use crate::entity::EntityRecord;
use crate::error::{GridError, Result};
use crate::shape::AABB;
use fnv::FnvHashMap;

/// Largest side, in cells, a DenseStorage accepts.
pub const MAX_MAP_SIZE: i32 = 1 << 15;

/// Identifier of a single cell, packing its integer coordinates into one word.
///
/// x lives in the high half and y in the low half, so every (i32, i32) pair gets its own key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u64);

impl CellKey {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        CellKey(((x as u32 as u64) << 32) | (y as u32 as u64))
    }

    #[inline]
    pub fn x(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    #[inline]
    pub fn y(self) -> i32 {
        self.0 as u32 as i32
    }
}

/// Half-open rectangle of cell coordinates: x0 <= x < x1, y0 <= y < y1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl CellRange {
    /// Cells touched by a box, boundaries included.
    ///
    /// Runs from floor(ll / cell_size) up to floor(ur / cell_size) + 1 (excluded) on each axis.
    /// A point lying exactly on a cell edge belongs to the cells on both sides, which is what keeps
    /// two touching shapes sharing at least one cell. The range is never empty.
    pub fn from_aabb(bbox: &AABB, cell_size: f32) -> Self {
        let cell = |v: f32| (v / cell_size).floor() as i32;
        CellRange {
            x0: cell(bbox.ll.x),
            y0: cell(bbox.ll.y),
            x1: cell(bbox.ur.x).saturating_add(1),
            y1: cell(bbox.ur.y).saturating_add(1),
        }
    }

    pub fn width(&self) -> usize {
        (self.x1 as i64 - self.x0 as i64).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.y1 as i64 - self.y0 as i64).max(0) as usize
    }

    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> XYRange {
        XYRange {
            range: *self,
            x: self.x0,
            // an empty row means nothing to visit at all
            y: if self.x0 < self.x1 { self.y0 } else { self.y1 },
        }
    }
}

impl IntoIterator for CellRange {
    type Item = (i32, i32);
    type IntoIter = XYRange;

    fn into_iter(self) -> XYRange {
        self.iter()
    }
}

/// Row-major iterator over the coordinates of a CellRange.
/// Stops before `x1` and `y1`, matching the half-open range.
pub struct XYRange {
    range: CellRange,
    x: i32,
    y: i32,
}

impl Iterator for XYRange {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.range.y1 {
            return None;
        }

        let cur = (self.x, self.y);
        if self.x + 1 < self.range.x1 {
            self.x += 1;
        } else {
            self.x = self.range.x0;
            self.y += 1;
        }

        Some(cur)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.y >= self.range.y1 {
            return (0, Some(0));
        }
        let rows_after = (self.range.y1 as i64 - self.y as i64 - 1) as usize;
        let n = rows_after * self.range.width() + (self.range.x1 as i64 - self.x as i64) as usize;
        (n, Some(n))
    }
}

/// The storage trait, implement this if you want a custom cell storage for the Grid.
pub trait Storage {
    /// Restricts a range to the cells this storage can address.
    /// Must be used identically by insertions and queries.
    fn bound(&self, range: CellRange) -> CellRange {
        range
    }

    /// Appends a record to the cell at (x, y), which must be inside `bound`'s output.
    fn insert(&mut self, x: i32, y: i32, record: EntityRecord);

    fn cell(&self, x: i32, y: i32) -> Option<&GridCell>;

    /// Empties every occupied cell, returning how many there were.
    fn clear(&mut self) -> usize;

    /// Number of cells holding at least one record.
    fn occupied(&self) -> usize;

    /// Number of emptied cells kept around for reuse.
    fn pooled(&self) -> usize {
        0
    }
}

/// SparseStorage stores cells in a HashMap to be used in a Grid.
/// It is Sparse because only touched cells exist, the world is unbounded.
/// Cells are taken from a pool on first touch and handed back on clear.
#[derive(Clone, Debug, Default)]
pub struct SparseStorage {
    cells: FnvHashMap<CellKey, GridCell>,
    pool: CellPool,
}

impl SparseStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &FnvHashMap<CellKey, GridCell> {
        &self.cells
    }

    pub fn pool(&self) -> &CellPool {
        &self.pool
    }
}

impl Storage for SparseStorage {
    fn insert(&mut self, x: i32, y: i32, record: EntityRecord) {
        let Self { cells, pool } = self;
        cells
            .entry(CellKey::new(x, y))
            .or_insert_with(|| pool.get())
            .push(record);
    }

    fn cell(&self, x: i32, y: i32) -> Option<&GridCell> {
        self.cells.get(&CellKey::new(x, y))
    }

    fn clear(&mut self) -> usize {
        let Self { cells, pool } = self;
        let n = cells.len();
        for (_, cell) in cells.drain() {
            pool.release(cell);
        }
        n
    }

    fn occupied(&self) -> usize {
        self.cells.len()
    }

    fn pooled(&self) -> usize {
        self.pool.available()
    }
}

/// DenseStorage stores cells in a Vec to be used for a Grid.
///
/// The Vec covers a square of `map_size` cells per side centered on zero:
/// cell (x, y) lives at index (y + map_size / 2) * map_size + (x + map_size / 2).
/// All cells are allocated once at construction and never freed, clearing only resets their counts.
///
/// Coordinates outside the square are clamped to the nearest border cell, both when inserting and
/// when querying. Shapes out there pile up in the border cells but are still found by queries.
#[derive(Clone, Debug)]
pub struct DenseStorage {
    map_size: i32,
    half: i32,
    cells: Vec<GridCell>,
    // indices of non-empty cells, so clear doesn't walk the whole map
    occupied: Vec<usize>,
}

impl DenseStorage {
    /// Creates a new cell grid centered on zero, `map_size` cells wide and high.
    ///
    /// Note that the size is counted in cells and not in absolute units (!)
    pub fn new_centered(map_size: i32) -> Result<Self> {
        if map_size <= 0 || map_size > MAX_MAP_SIZE {
            return Err(GridError::InvalidMapSize(map_size));
        }
        let n = map_size as usize * map_size as usize;
        Ok(Self {
            map_size,
            half: map_size / 2,
            cells: (0..n)
                .map(|_| GridCell::with_capacity(INITIAL_CELL_CAPACITY))
                .collect(),
            occupied: vec![],
        })
    }

    pub fn map_size(&self) -> i32 {
        self.map_size
    }

    pub fn cells(&self) -> &Vec<GridCell> {
        &self.cells
    }

    /// Index of a cell coordinate, None if outside the map.
    pub fn cell_id(&self, x: i32, y: i32) -> Option<usize> {
        let ix = x as i64 + self.half as i64;
        let iy = y as i64 + self.half as i64;
        let size = self.map_size as i64;
        if ix < 0 || iy < 0 || ix >= size || iy >= size {
            return None;
        }
        Some((iy * size + ix) as usize)
    }
}

impl Storage for DenseStorage {
    fn bound(&self, r: CellRange) -> CellRange {
        // in map-space, min stays in [0, size - 1] and max in [min + 1, size]
        let size = self.map_size as i64;
        let h = self.half as i64;
        let axis = |lo: i32, hi: i32| {
            let lo = (lo as i64 + h).clamp(0, size - 1);
            let hi = (hi as i64 + h).clamp(lo + 1, size);
            ((lo - h) as i32, (hi - h) as i32)
        };
        let (x0, x1) = axis(r.x0, r.x1);
        let (y0, y1) = axis(r.y0, r.y1);
        CellRange { x0, y0, x1, y1 }
    }

    fn insert(&mut self, x: i32, y: i32, record: EntityRecord) {
        let id = match self.cell_id(x, y) {
            Some(id) => id,
            None => panic!("Cell ({}, {}) is outside the dense map, bound the range first", x, y),
        };
        let cell = &mut self.cells[id];
        if cell.is_empty() {
            self.occupied.push(id);
        }
        cell.push(record);
    }

    fn cell(&self, x: i32, y: i32) -> Option<&GridCell> {
        self.cells.get(self.cell_id(x, y)?)
    }

    fn clear(&mut self) -> usize {
        let Self {
            cells, occupied, ..
        } = self;
        let n = occupied.len();
        for id in occupied.drain(..) {
            cells[id].clear();
        }
        n
    }

    fn occupied(&self) -> usize {
        self.occupied.len()
    }
}
