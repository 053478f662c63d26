//! Perfect rectangular mazes, generated row by row with Eller's
//! algorithm.
//!
//! The generator builds the board in a single forward pass: each row is
//! filled with fresh region labels, probabilistically merged with its
//! left neighbors, and connected downward so that every region of the
//! previous row stays reachable. The finished [`maze::Maze`] carries one
//! boundary [`maze::Exit`] and projects onto a wall matrix for rendering.
//!
//! ```
//! use emaze::algorithms::EllerGenerator;
//! use emaze::dims::Dims;
//!
//! let maze = EllerGenerator::default()
//!     .generate(Dims(15, 15), Some(42))
//!     .unwrap();
//! let walls = maze.wall_matrix();
//! assert_eq!(walls.size(), Dims(31, 31));
//! ```
//!
//! Consumers that want to watch the construction use
//! [`algorithms::EllerGenerator::snapshots`] and pull one step at a time.

pub mod algorithms;
pub mod array;
pub mod dims;
pub mod maze;
