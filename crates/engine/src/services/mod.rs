pub mod interview;
pub mod journal;
pub mod progression;
pub mod quest_generator;
