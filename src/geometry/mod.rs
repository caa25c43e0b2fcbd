//! Movement geometry: positions, compass directions and the play area

pub mod direction;
pub mod position;

pub use direction::Direction;
pub use position::{Position, CHARGE_RADIUS, MOVE_RANGE, STEP_LENGTH};
