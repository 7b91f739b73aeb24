mod split_chord;

pub use split_chord::SplitAtChord;
