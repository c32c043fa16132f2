mod autopilot;
mod cell;
mod cycle;
mod error;
mod grid;
mod pathfinding;
mod scoring;
mod simulate;
mod tuning;

pub use autopilot::{Autopilot, DebugStats};
pub use cell::{Cell, Direction};
pub use cycle::HamiltonianCycle;
pub use error::GridError;
pub use grid::GridBounds;
pub use pathfinding::{find_path, flood_fill, open_neighbor_count};
pub use simulate::simulate;
pub use tuning::Tuning;
