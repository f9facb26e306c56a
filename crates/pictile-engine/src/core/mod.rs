pub use self::{board::*, grid_size::*, tile::*};

pub(crate) mod board;
pub(crate) mod grid_size;
pub(crate) mod tile;
