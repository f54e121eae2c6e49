pub mod character;

pub use character::Character;
