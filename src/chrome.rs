use serde::Serialize;

pub const SOUNDS_ON_LABEL: &str = "Включены";
pub const SOUNDS_OFF_LABEL: &str = "Выключены";

/// Visibility flags of the interface chrome around the page container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chrome {
    pub sidebar_open: bool,
    pub settings_open: bool,
    pub overlay_active: bool,
    pub interface_hidden: bool,
    pub progress_bar_hidden: bool,
    pub sounds_enabled: bool,
}

impl Chrome {
    pub fn new(sounds_enabled: bool) -> Self {
        Self {
            sidebar_open: false,
            settings_open: false,
            overlay_active: false,
            interface_hidden: false,
            progress_bar_hidden: false,
            sounds_enabled,
        }
    }

    /// Burger button. The sidebar and the settings panel share one overlay, so
    /// opening one closes the other.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
        self.settings_open = false;
        self.sync_overlay();
    }

    pub fn toggle_settings(&mut self) {
        self.settings_open = !self.settings_open;
        self.sidebar_open = false;
        self.sync_overlay();
    }

    pub fn close_panels(&mut self) {
        self.sidebar_open = false;
        self.settings_open = false;
        self.overlay_active = false;
    }

    /// Hiding also closes every panel; showing again only brings the icons back.
    pub fn toggle_interface(&mut self) -> bool {
        self.interface_hidden = !self.interface_hidden;
        if self.interface_hidden {
            self.close_panels();
        }
        self.interface_hidden
    }

    pub fn toggle_sounds(&mut self) -> bool {
        self.sounds_enabled = !self.sounds_enabled;
        self.sounds_enabled
    }

    pub fn sound_label(&self) -> &'static str {
        if self.sounds_enabled {
            SOUNDS_ON_LABEL
        } else {
            SOUNDS_OFF_LABEL
        }
    }

    pub fn toggle_progress_bar(&mut self) -> bool {
        self.progress_bar_hidden = !self.progress_bar_hidden;
        self.progress_bar_hidden
    }

    /// A chapter link was followed from the sidebar.
    pub fn chapter_chosen(&mut self) {
        self.sidebar_open = false;
        self.sync_overlay();
    }

    fn sync_overlay(&mut self) {
        self.overlay_active = self.sidebar_open || self.settings_open;
    }
}
