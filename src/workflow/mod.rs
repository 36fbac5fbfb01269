pub mod controller;
pub mod events;

pub use controller::{NavDirection, QuizSessionController};
pub use events::EditorEvent;
