use serde::{Deserialize, Serialize};

/// Widths at or below this use the mobile layout
pub const MOBILE_MAX_WIDTH: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Desktop,
    Mobile,
}

impl LayoutMode {
    pub fn for_width(width: u32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            LayoutMode::Mobile
        } else {
            LayoutMode::Desktop
        }
    }
}

/// Layout state shared by sibling widgets, owned by their common parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub layout: LayoutMode,
    /// An informational page covers the map
    pub fullscreen_content: bool,
    pub menu_open: bool,
    pub search_active: bool,
}

impl ViewState {
    pub fn for_width(width: u32) -> Self {
        Self {
            layout: LayoutMode::for_width(width),
            ..Default::default()
        }
    }

    /// Search box, map and locate button
    pub fn shows_map_chrome(&self) -> bool {
        !self.fullscreen_content
    }

    pub fn tag_filter_visible(&self) -> bool {
        !self.fullscreen_content
    }

    /// The filter bar moves aside for the open side menu on wide screens.
    pub fn tag_filter_shifted(&self) -> bool {
        self.menu_open && self.layout == LayoutMode::Desktop
    }

    /// Map clicks and searches select nothing while a page is open.
    pub fn accepts_selection(&self) -> bool {
        !self.fullscreen_content
    }

    pub fn open_page(&mut self) {
        self.fullscreen_content = true;
    }

    pub fn back_to_map(&mut self) {
        self.fullscreen_content = false;
    }
}
