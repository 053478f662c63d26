use serde::{Deserialize, Serialize};

use crate::array::Array2D;
use crate::dims::Dims;
use crate::maze::cell::Cell;

/// Side of the board the exit opens through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitSide {
    Top,
    Right,
    Bottom,
    Left,
}

/// The single boundary opening of a finished maze.
///
/// `pos` is `(col, row)`. For [`ExitSide::Bottom`] the row equals the board
/// height and for [`ExitSide::Right`] the column equals the board width;
/// those coordinates address the outer seam, not a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub side: ExitSide,
    pub pos: Dims,
}

impl Exit {
    pub fn col(&self) -> i32 {
        self.pos.0
    }

    pub fn row(&self) -> i32 {
        self.pos.1
    }
}

/// Rectangular board of [`Cell`]s plus the chosen exit.
///
/// A maze is built once, row by row, by the generator in
/// [`crate::algorithms`] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Maze {
    pub(crate) cells: Array2D<Cell>,
    pub(crate) exit: Option<Exit>,
}

impl Maze {
    pub(crate) fn new(size: Dims) -> Self {
        Maze {
            cells: Array2D::new(Cell::unfilled(), size.0 as usize, size.1 as usize),
            exit: None,
        }
    }

    pub fn size(&self) -> Dims {
        self.cells.size()
    }

    pub fn width(&self) -> i32 {
        self.size().0
    }

    pub fn height(&self) -> i32 {
        self.size().1
    }

    pub fn is_in_bounds(&self, pos: Dims) -> bool {
        0 <= pos.0 && pos.0 < self.width() && 0 <= pos.1 && pos.1 < self.height()
    }

    pub fn get_cell(&self, pos: Dims) -> Option<&Cell> {
        self.cells.get(pos)
    }

    /// `None` while a generation is still in flight.
    pub fn exit(&self) -> Option<Exit> {
        self.exit
    }

    /// Projects the board onto a `(2h+1) x (2w+1)` matrix of wall flags,
    /// `true` meaning blocked.
    ///
    /// Odd/odd positions are cell interiors and always open; even-indexed
    /// rows and columns are the seams between cells. A seam is open exactly
    /// when the owning cell has that wall cleared, or when it is the exit
    /// seam. Rows not yet filled by an in-flight generation project as
    /// fully walled.
    pub fn wall_matrix(&self) -> Array2D<bool> {
        let Dims(width, height) = self.size();
        let mut walls = Array2D::new(
            true,
            (2 * width + 1) as usize,
            (2 * height + 1) as usize,
        );

        for pos in self.cells.iter_pos() {
            let cell = &self.cells[pos];
            let Dims(col, row) = pos;

            walls[Dims(2 * col + 1, 2 * row + 1)] = false;
            if !cell.wall_above {
                walls[Dims(2 * col + 1, 2 * row)] = false;
            }
            if !cell.wall_left {
                walls[Dims(2 * col, 2 * row + 1)] = false;
            }
        }

        if let Some(exit) = self.exit {
            let Dims(col, row) = exit.pos;
            match exit.side {
                ExitSide::Top | ExitSide::Bottom => walls[Dims(2 * col + 1, 2 * row)] = false,
                ExitSide::Left | ExitSide::Right => walls[Dims(2 * col, 2 * row + 1)] = false,
            }
        }

        walls
    }
}
