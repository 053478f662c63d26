use std::env;
use std::io::{self, Write as _};
use std::thread;
use std::time::Duration;

use emaze::algorithms::EllerGenerator;
use emaze::dims::Dims;
use emaze::maze::Maze;

const STEP_DELAY: Duration = Duration::from_millis(120);

fn main() {
    let args = env::args()
        .skip(1)
        .take(3)
        .map(|s| s.parse())
        .collect::<Result<Vec<i64>, _>>()
        .expect("Expected integer arguments");

    assert!(
        args.len() == 2 || args.len() == 3,
        "Usage: steps <width> <height> [seed]"
    );

    let size = Dims(args[0] as i32, args[1] as i32);
    let seed = args.get(2).copied().map(|seed| seed as u64);

    let mut generation = EllerGenerator::default()
        .snapshots(size, seed)
        .expect("generation failed");

    let mut frame = 0;
    while let Some(snapshot) = generation.advance() {
        // Repaint from the top-left so the maze grows in place.
        print!("\x1b[2J\x1b[H");
        println!("step {} (row {})", frame, snapshot.current_row);
        draw(snapshot.maze);
        io::stdout().flush().unwrap();

        frame += 1;
        thread::sleep(STEP_DELAY);
    }

    let maze = generation.maze();
    if let Some(exit) = maze.exit() {
        println!("exit: {:?} at col {}, row {}", exit.side, exit.col(), exit.row());
    }
}

fn draw(maze: &Maze) {
    let walls = maze.wall_matrix();
    for y in 0..walls.size().1 {
        for x in 0..walls.size().0 {
            if walls[Dims(x, y)] {
                print!("██");
            } else {
                print!("  ");
            }
        }
        println!();
    }
}
