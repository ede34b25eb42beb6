use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Board position as `(row, col)`.
pub type Position = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Size of a grid as `(rows, columns)`.
pub fn grid_size<T>(grid: &Array2<T>) -> Position {
    let (rows, columns) = grid.dim();
    (
        rows.try_into().unwrap_or(Coord::MAX),
        columns.try_into().unwrap_or(Coord::MAX),
    )
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Position) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Position) -> NeighborIter {
        NeighborIter::new(center, grid_size(self))
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only when it remains inside `bounds`.
fn apply_delta(pos: Position, delta: (i8, i8), bounds: Position) -> Option<Position> {
    let (row, col) = pos;
    let (d_row, d_col) = delta;
    let (rows, columns) = bounds;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= rows {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= columns {
        return None;
    }

    Some((next_row, next_col))
}

/// The up to eight positions surrounding a cell, clipped to the grid.
///
/// Every rule that needs adjacency (mine counting, flood fill, chording,
/// flagging) goes through this iterator.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Position,
    bounds: Position,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Position, bounds: Position) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
