//! The map screen: explicit state, pure transitions, derived rendering and
//! the controller that runs service requests.

pub mod controller;
pub mod event;
pub mod reducer;
pub mod render;
pub mod state;
pub mod tokens;
