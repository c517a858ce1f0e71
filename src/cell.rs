use crate::entity::EntityRecord;
use std::ops::Index;

/// Records a fresh cell can hold before growing.
pub const INITIAL_CELL_CAPACITY: usize = 4;

/// A single cell of the grid, can be empty.
///
/// Holds the records inserted this frame in insertion order.
/// Emptying a cell keeps its capacity so a stable working set stops allocating after a few frames.
#[derive(Clone, Debug, Default)]
pub struct GridCell {
    objs: Vec<EntityRecord>,
}

impl GridCell {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objs: Vec::with_capacity(capacity),
        }
    }

    /// Appends a record, capacity doubles when full.
    #[inline]
    pub fn push(&mut self, record: EntityRecord) {
        self.objs.push(record);
    }

    /// Sets the record count to zero without freeing anything.
    #[inline]
    pub fn clear(&mut self) {
        self.objs.clear();
    }

    pub fn len(&self) -> usize {
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.objs.capacity()
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.objs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityRecord> {
        self.objs.iter()
    }
}

/// Bounds-checked against the record count, panics past it.
impl Index<usize> for GridCell {
    type Output = EntityRecord;

    fn index(&self, i: usize) -> &EntityRecord {
        assert!(
            i < self.objs.len(),
            "Record index ({}) out of bounds for a cell of {} records",
            i,
            self.objs.len()
        );
        &self.objs[i]
    }
}

/// Free-list of emptied cells, reused across frames.
#[derive(Clone, Debug, Default)]
pub struct CellPool {
    free: Vec<GridCell>,
    allocated: usize,
}

impl CellPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops a recycled cell, or allocates a new one if none are available.
    pub fn get(&mut self) -> GridCell {
        match self.free.pop() {
            Some(cell) => cell,
            None => {
                self.allocated += 1;
                tracing::debug!(allocated = self.allocated, "allocating new grid cell");
                GridCell::with_capacity(INITIAL_CELL_CAPACITY)
            }
        }
    }

    /// Empties the cell and pushes it onto the free-list.
    pub fn release(&mut self, mut cell: GridCell) {
        cell.clear();
        self.free.push(cell);
    }

    /// Number of cells waiting to be reused.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Number of cells this pool ever allocated.
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}
