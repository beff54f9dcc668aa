use serde::Serialize;

pub const DEFAULT_TO_TOP_THRESHOLD: f64 = 300.0;

/// Geometry of the scrollable page container, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// An empty container: nothing to scroll.
    pub fn empty(client_height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            scroll_height: client_height,
            client_height,
        }
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn scroll_to(&mut self, top: f64) {
        let top = if top.is_finite() { top } else { 0.0 };
        self.scroll_top = top.clamp(0.0, self.max_scroll_top());
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll_top + delta);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_top = self.max_scroll_top();
    }

    pub fn at_end(&self) -> bool {
        self.scroll_top >= self.max_scroll_top()
    }

    /// Applies a host layout report, keeping the scroll position inside the
    /// new bounds.
    pub fn set_layout(&mut self, scroll_height: f64, client_height: f64) {
        self.client_height = client_height.max(0.0);
        self.scroll_height = scroll_height.max(self.client_height);
        self.scroll_to(self.scroll_top);
    }
}

/// Scroll progress in percent, within `[0, 100]`. Content that fits the
/// viewport counts as fully read.
pub fn scroll_percent(metrics: &ScrollMetrics) -> f64 {
    let scrollable = metrics.scroll_height - metrics.client_height;
    if scrollable <= 0.0 {
        return 100.0;
    }
    (metrics.scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub percent: f64,
    pub fill_width: String,
    pub label: String,
    pub to_top_visible: bool,
}

impl ProgressView {
    pub fn from_metrics(metrics: &ScrollMetrics, to_top_threshold: f64) -> Self {
        let percent = scroll_percent(metrics);
        Self {
            percent,
            fill_width: format!("{percent}%"),
            label: format!("Прокручено: {}%", percent.round()),
            to_top_visible: metrics.scroll_top > to_top_threshold,
        }
    }
}
