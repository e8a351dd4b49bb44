//! Presentation selection: which detail surface a layout uses and the
//! layout state sibling widgets coordinate through.

pub mod layout;
pub mod surface;

pub use layout::{LayoutMode, ViewState, MOBILE_MAX_WIDTH};
pub use surface::{surface_for, BottomCard, DetailContext, DetailSurface, SidePanel};
