//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the views, the search
//! state, the selected track and the play intent the engine follows.

mod model;

pub use model::*;
