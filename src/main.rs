//! Skills 3D: runs the gauntlet app configured from the environment.

use bevy::prelude::*;
use gauntlet::prelude::*;

fn main() -> AppExit {
    let _ = dotenvy::dotenv();
    run_from_env()
}
