//! Core library for the GBS picross grid editor.
//! Maps a square boolean grid onto the flag events of a GB Studio `.gbsres`
//! script, computes nonogram hints, and writes edits back without touching
//! unrelated events or ids.

pub mod codec;
pub mod document;
pub mod error;
pub mod grid;
mod gui;
pub mod hints;
pub mod lens;
pub mod session;
pub mod statics;
mod value;

pub use codec::{IdGenerator, decode, encode};
pub use document::{LoadedDocument, SourceText};
pub use error::{DecodeError, EncodeError, GridError, LoadError};
pub use grid::{GRID_CAPACITY, GridSize, GridState};
pub use gui::run_gui;
pub use hints::{GridHints, compute_hints};
pub use session::{LoadOutcome, LoadTicket, Session};
pub use value::{ResNumber, ResValue};
