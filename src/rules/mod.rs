//! Game rules for Connect6
//!
//! Black starts with a single stone on the center, then the players
//! alternate placing two stones per turn starting with White. Six or more
//! stones of one color in a row wins. There are no captures and no
//! forbidden moves, and an overline counts as a win.
//!
//! The search never calls into this module: it reads wins off the line
//! index. These literal board scans are the reference the index is
//! checked against, and what the self-play driver uses to report results.

pub mod win;

pub use win::{check_winner, find_six_positions, has_six_at, has_six_in_row};
