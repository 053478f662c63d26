use std::env;

use emaze::algorithms::EllerGenerator;
use emaze::dims::Dims;

const BLOCK: &str = "██";
const SPACE: &str = "  ";

fn main() {
    let args = env::args()
        .skip(1)
        .take(3)
        .map(|s| s.parse())
        .collect::<Result<Vec<i64>, _>>()
        .expect("Expected integer arguments");

    assert!(
        args.len() == 2 || args.len() == 3,
        "Usage: print <width> <height> [seed]"
    );

    let size = Dims(args[0] as i32, args[1] as i32);
    let seed = args.get(2).copied().map(|seed| seed as u64);

    let maze = EllerGenerator::default()
        .generate(size, seed)
        .expect("generation failed");

    let walls = maze.wall_matrix();
    for y in 0..walls.size().1 {
        for x in 0..walls.size().0 {
            if walls[Dims(x, y)] {
                print!("{}", BLOCK);
            } else {
                print!("{}", SPACE);
            }
        }
        println!();
    }

    if let Some(exit) = maze.exit() {
        println!("exit: {:?} at col {}, row {}", exit.side, exit.col(), exit.row());
    }
}
