// src/client/mod.rs — Client state: session store, pane, sidebar, streaming, dispatch

pub mod context;
pub mod decoder;
pub mod dispatch;
pub mod pane;
pub mod sidebar;
pub mod store;
pub mod stream;

pub use context::{SessionContext, StreamStep};
pub use dispatch::{dispatch, Action, Focus, Key, SessionAction, UiAction, UiEvent, ViewState};
pub use store::SessionStore;
