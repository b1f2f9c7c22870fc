pub mod chord;
pub mod chord_definition;
pub mod directive;
pub mod entry;
pub mod segment;
pub mod token;
