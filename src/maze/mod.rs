pub mod cell;
pub use cell::{Cell, SetId};

pub mod maze;
pub use maze::{Exit, ExitSide, Maze};
