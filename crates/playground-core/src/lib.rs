pub mod assemble;
pub mod buffer;
pub mod clipboard;
pub mod errors;
pub mod language;
pub mod sandbox;
pub mod search;
