//! Chess board piece placement representations.
mod mailbox;
mod piece_sets;

pub use mailbox::Mailbox;
pub use piece_sets::PieceSets;
