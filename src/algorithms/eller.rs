use rand::{thread_rng, Rng as _, SeedableRng as _};

use crate::dims::Dims;
use crate::maze::{Exit, ExitSide, Maze, SetId};

use super::{EllerConfig, GenerationError, Random};

/// Row-by-row perfect maze generator (Eller's algorithm).
///
/// Every row is filled with fresh region labels, probabilistically merged
/// with its left neighbors, and connected downward so that no region of
/// the previous row is left behind. The last row is merged
/// deterministically, which leaves the whole board a single region, and a
/// boundary exit is chosen at the end.
#[derive(Debug, Clone, Default)]
pub struct EllerGenerator {
    config: EllerConfig,
}

impl EllerGenerator {
    pub fn new(config: EllerConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EllerConfig {
        &self.config
    }

    /// Generates a complete maze in one call.
    ///
    /// With `seed` of `None` the seed is drawn from the thread rng; pass
    /// an explicit seed for a reproducible board.
    pub fn generate(&self, size: Dims, seed: Option<u64>) -> Result<Maze, GenerationError> {
        Ok(self.snapshots(size, seed)?.finish())
    }

    /// Starts an incremental generation.
    ///
    /// The returned [`Generation`] performs one construction step per
    /// [`Generation::advance`] call and hands back a snapshot view after
    /// each one, for consumers that want to watch the maze grow. Dropping
    /// it early simply abandons the generation; a fresh call starts an
    /// independent one.
    pub fn snapshots(&self, size: Dims, seed: Option<u64>) -> Result<Generation, GenerationError> {
        if !size.all_positive() {
            return Err(GenerationError::InvalidSize(size));
        }

        let seed = seed.unwrap_or_else(|| thread_rng().gen());
        log::debug!("generating {}x{} maze, seed {}", size.0, size.1, seed);

        Ok(Generation {
            maze: Maze::new(size),
            rng: Random::seed_from_u64(seed),
            config: self.config,
            next_set: 1,
            step: Step::Fill(0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Fill(i32),
    Connect(i32),
    Join(i32),
    CloseLastRow,
    PickExit,
    Done,
}

/// An in-flight maze generation.
///
/// Single-threaded and pull-based: nothing happens between
/// [`advance`](Self::advance) calls, and the caller observes the board
/// exactly at the construction-step boundaries.
#[derive(Debug)]
pub struct Generation {
    maze: Maze,
    rng: Random,
    config: EllerConfig,
    next_set: u32,
    step: Step,
}

/// View of the board after one construction step.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub maze: &'a Maze,
    /// Row the step worked on.
    pub current_row: i32,
    /// Set by the very last step only.
    pub exit: Option<Exit>,
}

impl Generation {
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn is_done(&self) -> bool {
        self.step == Step::Done
    }

    /// Performs the next construction step, or returns `None` once the
    /// exit has been placed.
    pub fn advance(&mut self) -> Option<Snapshot<'_>> {
        let height = self.maze.height();

        let current_row = match self.step {
            Step::Fill(row) => {
                self.next_set = fill_row(&mut self.maze, row, self.next_set);
                self.step = if height == 1 {
                    Step::CloseLastRow
                } else if row == 0 {
                    Step::Join(0)
                } else {
                    Step::Connect(row)
                };
                row
            }
            Step::Connect(row) => {
                connect_row(&mut self.maze, row, self.config.connect_probability, &mut self.rng);
                self.step = if row == height - 1 {
                    Step::CloseLastRow
                } else {
                    Step::Join(row)
                };
                row
            }
            Step::Join(row) => {
                join_cells(&mut self.maze, row, self.config.join_probability, &mut self.rng);
                if row == 0 {
                    // The top-left cell always opens upward, the maze's
                    // canonical entrance seam.
                    self.maze.cells[Dims(0, 0)].wall_above = false;
                }
                self.step = Step::Fill(row + 1);
                row
            }
            Step::CloseLastRow => {
                join_last_row(&mut self.maze, height - 1);
                self.step = Step::PickExit;
                height - 1
            }
            Step::PickExit => {
                self.maze.exit = Some(exit_point(self.maze.size(), &mut self.rng));
                self.step = Step::Done;
                height - 1
            }
            Step::Done => return None,
        };

        Some(Snapshot {
            maze: &self.maze,
            current_row,
            exit: self.maze.exit(),
        })
    }

    /// Runs the remaining steps and returns the finished maze.
    pub fn finish(mut self) -> Maze {
        while self.advance().is_some() {}
        self.maze
    }
}

fn decision(rng: &mut Random, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

/// Fills a row with fresh labels and raises both of its walls. Returns
/// the label counter for the next row.
fn fill_row(maze: &mut Maze, row: i32, first_set: u32) -> u32 {
    let mut set = first_set;
    for col in 0..maze.width() {
        let cell = &mut maze.cells[Dims(col, row)];
        cell.set_id = Some(SetId(set));
        cell.wall_above = true;
        cell.wall_left = true;
        set += 1;
    }

    set
}

fn relabel_row(maze: &mut Maze, row: i32, from: Option<SetId>, to: Option<SetId>) {
    for col in 0..maze.width() {
        let cell = &mut maze.cells[Dims(col, row)];
        if cell.set_id == from {
            cell.set_id = to;
        }
    }
}

/// Merges adjacent differing regions of a row left to right, each with
/// one Bernoulli trial. Merges take effect immediately, so later pairs
/// see the labels left behind by earlier ones.
fn join_cells(maze: &mut Maze, row: i32, probability: f64, rng: &mut Random) {
    for col in 1..maze.width() {
        let left = maze.cells[Dims(col - 1, row)].set_id;
        let right = maze.cells[Dims(col, row)].set_id;
        if left != right && decision(rng, probability) {
            relabel_row(maze, row, right, left);
            maze.cells[Dims(col, row)].wall_left = false;
        }
    }
}

/// Connects every region of row `row - 1` downward into `row`.
///
/// For each label of the previous row, columns carrying it are scanned
/// left to right with one trial per column; the whole pass repeats until
/// the label has dropped at least one connection, so no region is
/// orphaned. Columns that stay unselected keep the fresh label `fill_row`
/// gave them.
fn connect_row(maze: &mut Maze, row: i32, probability: f64, rng: &mut Random) {
    let above = row - 1;

    let mut labels = Vec::new();
    for col in 0..maze.width() {
        let label = maze.cells[Dims(col, above)].set_id;
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    for label in labels {
        let mut connected = false;
        while !connected {
            for col in 0..maze.width() {
                if maze.cells[Dims(col, above)].set_id == label && decision(rng, probability) {
                    let cell = &mut maze.cells[Dims(col, row)];
                    cell.set_id = label;
                    cell.wall_above = false;
                    connected = true;
                }
            }
        }
    }
}

/// Merges every adjacent differing pair of the last row unconditionally,
/// leaving the row a single region.
fn join_last_row(maze: &mut Maze, row: i32) {
    for col in 1..maze.width() {
        let left = maze.cells[Dims(col - 1, row)].set_id;
        let right = maze.cells[Dims(col, row)].set_id;
        if left != right {
            relabel_row(maze, row, right, left);
            maze.cells[Dims(col, row)].wall_left = false;
        }
    }
}

/// Chooses the boundary exit.
///
/// Top exits draw their column from the right half of the width and left
/// exits their row from the bottom half of the height, while bottom and
/// right exits draw from the full range. The asymmetry is deliberate and
/// fixed.
fn exit_point(size: Dims, rng: &mut Random) -> Exit {
    let Dims(width, height) = size;

    match rng.gen_range(0..4) {
        0 => Exit {
            side: ExitSide::Top,
            pos: Dims(rng.gen_range(width / 2..width), 0),
        },
        1 => Exit {
            side: ExitSide::Right,
            pos: Dims(width, rng.gen_range(0..height)),
        },
        2 => Exit {
            side: ExitSide::Bottom,
            pos: Dims(rng.gen_range(0..width), height),
        },
        _ => Exit {
            side: ExitSide::Left,
            pos: Dims(0, rng.gen_range(height / 2..height)),
        },
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    fn rng(seed: u64) -> Random {
        Random::seed_from_u64(seed)
    }

    fn labels_of_row(maze: &Maze, row: i32) -> Vec<Option<SetId>> {
        (0..maze.width())
            .map(|col| maze.cells[Dims(col, row)].set_id)
            .collect()
    }

    /// Cells reachable from (0, 0) through cleared walls.
    fn reachable_cells(maze: &Maze) -> usize {
        let size = maze.size();
        let mut visited = vec![false; size.product() as usize];
        let mut stack = vec![Dims(0, 0)];
        let mut count = 0;

        while let Some(pos) = stack.pop() {
            let idx = (pos.1 * size.0 + pos.0) as usize;
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            count += 1;

            let cell = &maze.cells[pos];
            if !cell.wall_left && pos.0 > 0 {
                stack.push(pos - Dims(1, 0));
            }
            if !cell.wall_above && pos.1 > 0 {
                stack.push(pos - Dims(0, 1));
            }
            if let Some(right) = maze.get_cell(pos + Dims(1, 0)) {
                if !right.wall_left {
                    stack.push(pos + Dims(1, 0));
                }
            }
            if let Some(below) = maze.get_cell(pos + Dims(0, 1)) {
                if !below.wall_above {
                    stack.push(pos + Dims(0, 1));
                }
            }
        }

        count
    }

    fn cleared_internal_walls(maze: &Maze) -> usize {
        maze.cells
            .iter_pos()
            .map(|pos| {
                let cell = &maze.cells[pos];
                let horizontal = pos.0 > 0 && !cell.wall_left;
                let vertical = pos.1 > 0 && !cell.wall_above;
                horizontal as usize + vertical as usize
            })
            .sum()
    }

    #[test]
    fn fill_row_assigns_fresh_distinct_labels() {
        let mut maze = Maze::new(Dims(5, 2));

        let next = fill_row(&mut maze, 0, 1);
        assert_eq!(next, 6);
        assert_eq!(
            labels_of_row(&maze, 0),
            (1..=5).map(|id| Some(SetId(id))).collect::<Vec<_>>()
        );
        for col in 0..5 {
            let cell = maze.get_cell(Dims(col, 0)).unwrap();
            assert!(cell.wall_above() && cell.wall_left());
        }

        assert_eq!(fill_row(&mut maze, 1, next), 11);
        assert!(labels_of_row(&maze, 1)
            .iter()
            .all(|label| label.map(|SetId(id)| id >= 6) == Some(true)));
    }

    #[test]
    fn join_cells_with_certain_probability_merges_whole_row() {
        let mut maze = Maze::new(Dims(6, 1));
        fill_row(&mut maze, 0, 1);

        join_cells(&mut maze, 0, 1.0, &mut rng(1));

        assert!(labels_of_row(&maze, 0)
            .iter()
            .all(|&label| label == Some(SetId(1))));
        for col in 1..6 {
            assert!(!maze.get_cell(Dims(col, 0)).unwrap().wall_left());
        }
    }

    #[test]
    fn join_cells_with_zero_probability_changes_nothing() {
        let mut maze = Maze::new(Dims(6, 1));
        fill_row(&mut maze, 0, 1);

        join_cells(&mut maze, 0, 0.0, &mut rng(1));

        assert_eq!(
            labels_of_row(&maze, 0),
            (1..=6).map(|id| Some(SetId(id))).collect::<Vec<_>>()
        );
    }

    #[test]
    fn connect_row_reaches_every_region_of_the_previous_row() {
        for seed in 0..20 {
            let mut maze = Maze::new(Dims(8, 2));
            let mut rng = rng(seed);

            let next = fill_row(&mut maze, 0, 1);
            join_cells(&mut maze, 0, 0.5, &mut rng);
            fill_row(&mut maze, 1, next);
            connect_row(&mut maze, 1, 0.2, &mut rng);

            for label in labels_of_row(&maze, 0) {
                let connected = (0..8).any(|col| {
                    maze.cells[Dims(col, 0)].set_id == label
                        && !maze.cells[Dims(col, 1)].wall_above
                        && maze.cells[Dims(col, 1)].set_id == label
                });
                assert!(connected, "region {:?} left behind (seed {})", label, seed);
            }
        }
    }

    #[test]
    fn join_last_row_leaves_single_region() {
        let mut maze = Maze::new(Dims(7, 1));
        fill_row(&mut maze, 0, 1);

        join_last_row(&mut maze, 0);

        let labels = labels_of_row(&maze, 0);
        assert!(labels.iter().all(|&label| label == labels[0]));
    }

    #[test]
    fn exit_point_respects_side_ranges() {
        let size = Dims(8, 6);
        let mut seen = [false; 4];

        for seed in 0..200 {
            let exit = exit_point(size, &mut rng(seed));
            match exit.side {
                ExitSide::Top => {
                    seen[0] = true;
                    assert_eq!(exit.row(), 0);
                    assert!((4..8).contains(&exit.col()));
                }
                ExitSide::Right => {
                    seen[1] = true;
                    assert_eq!(exit.col(), 8);
                    assert!((0..6).contains(&exit.row()));
                }
                ExitSide::Bottom => {
                    seen[2] = true;
                    assert_eq!(exit.row(), 6);
                    assert!((0..8).contains(&exit.col()));
                }
                ExitSide::Left => {
                    seen[3] = true;
                    assert_eq!(exit.col(), 0);
                    assert!((3..6).contains(&exit.row()));
                }
            }
        }

        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn generated_mazes_are_perfect() {
        let generator = EllerGenerator::default();

        for (size, seed) in [
            (Dims(1, 1), 3),
            (Dims(1, 7), 4),
            (Dims(7, 1), 5),
            (Dims(2, 2), 6),
            (Dims(9, 4), 7),
            (Dims(15, 15), 8),
            (Dims(4, 30), 9),
        ] {
            let maze = generator.generate(size, Some(seed)).unwrap();
            let cells = size.product() as usize;

            assert_eq!(reachable_cells(&maze), cells, "size {:?}", size);
            assert_eq!(cleared_internal_walls(&maze), cells - 1, "size {:?}", size);
            assert!(maze.exit().is_some());
        }
    }

    #[test]
    fn every_region_row_connects_downward() {
        let maze = EllerGenerator::default()
            .generate(Dims(12, 10), Some(21))
            .unwrap();

        for row in 1..maze.height() {
            let mut labels = Vec::new();
            for col in 0..maze.width() {
                let label = maze.cells[Dims(col, row - 1)].set_id;
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }

            for label in labels {
                let connected = (0..maze.width()).any(|col| {
                    maze.cells[Dims(col, row - 1)].set_id == label
                        && !maze.cells[Dims(col, row)].wall_above
                });
                assert!(connected, "row {} region {:?}", row, label);
            }
        }
    }

    #[test]
    fn last_row_is_one_region() {
        let maze = EllerGenerator::default()
            .generate(Dims(10, 6), Some(13))
            .unwrap();

        let labels = labels_of_row(&maze, 5);
        assert!(labels.iter().all(|&label| label == labels[0]));
    }

    #[test]
    fn top_left_entrance_seam_is_open() {
        let maze = EllerGenerator::default()
            .generate(Dims(5, 5), Some(2))
            .unwrap();

        assert!(!maze.get_cell(Dims(0, 0)).unwrap().wall_above());
    }

    #[test]
    fn one_by_one_maze() {
        let maze = EllerGenerator::default().generate(Dims(1, 1), Some(11)).unwrap();

        let cell = maze.get_cell(Dims(0, 0)).unwrap();
        assert!(cell.wall_above() && cell.wall_left());
        assert!(maze.exit().is_some());

        let walls = maze.wall_matrix();
        assert_eq!(walls.size(), Dims(3, 3));
        assert!(!walls[Dims(1, 1)]);

        let open_seams = walls
            .iter_pos()
            .filter(|&pos| !walls[pos] && pos != Dims(1, 1))
            .count();
        assert_eq!(open_seams, 1);
    }

    #[test]
    fn same_seed_reproduces_the_maze() {
        let generator = EllerGenerator::default();

        let first = generator.generate(Dims(11, 9), Some(77)).unwrap();
        let second = generator.generate(Dims(11, 9), Some(77)).unwrap();

        assert_eq!(first.exit(), second.exit());
        assert_eq!(first.wall_matrix(), second.wall_matrix());
    }

    #[test]
    fn snapshot_sequence_shape() {
        for size in [Dims(1, 1), Dims(4, 1), Dims(3, 5)] {
            let mut generation = EllerGenerator::default().snapshots(size, Some(5)).unwrap();

            let mut steps = 0;
            let mut last_row = 0;
            let mut exit_seen = 0;
            while let Some(snapshot) = generation.advance() {
                assert!(snapshot.current_row >= last_row);
                last_row = snapshot.current_row;
                if snapshot.exit.is_some() {
                    exit_seen += 1;
                }
                steps += 1;
            }

            assert_eq!(steps, 3 * size.1, "size {:?}", size);
            assert_eq!(exit_seen, 1, "only the final snapshot carries the exit");
            assert!(generation.is_done());
            assert!(generation.advance().is_none());
        }
    }

    #[test]
    fn snapshots_match_batch_generation() {
        let generator = EllerGenerator::default();
        let size = Dims(6, 8);

        let batch = generator.generate(size, Some(99)).unwrap();
        let stepped = generator.snapshots(size, Some(99)).unwrap().finish();

        assert_eq!(batch.exit(), stepped.exit());
        assert_eq!(batch.wall_matrix(), stepped.wall_matrix());
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let generator = EllerGenerator::default();

        assert_eq!(
            generator.generate(Dims(0, 4), Some(1)).unwrap_err(),
            GenerationError::InvalidSize(Dims(0, 4))
        );
        assert!(generator.generate(Dims(3, -1), Some(1)).is_err());

        let config = EllerConfig {
            connect_probability: 0.0,
            ..EllerConfig::default()
        };
        assert!(EllerGenerator::new(config).is_err());
    }
}
