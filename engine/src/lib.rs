//! Cable-tray routing and section engine (spec §1–§4): no I/O, no async,
//! stateless between calls. `server` is the only caller in this workspace;
//! `testing_utils` builds fixtures against the public types below for both
//! this crate's and `server`'s test suites.

pub mod assign;
pub mod cancel;
pub mod cost;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod model;
pub mod network;
pub mod output;
pub mod pathfind;
pub mod sections;
pub mod steiner;

pub use cancel::CancellationToken;
pub use engine::{optimize_paths, update_cable_length};
pub use error::EngineError;
pub use model::{OptimizeRequest, OptimizeResponse, UpdateCableLengthRequest};
