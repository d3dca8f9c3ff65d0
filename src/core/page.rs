use std::time::Duration;

pub const HERO_ROTATION_INTERVAL: Duration = Duration::from_secs(5);
pub const HEADER_SCROLL_THRESHOLD: f64 = 100.0;

/// Cross-fading hero images; exactly one is opaque at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSlider {
    count: usize,
    current: usize,
    paused: bool,
}

impl HeroSlider {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            current: 0,
            paused: false,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Called every rotation interval.
    pub fn tick(&mut self) -> usize {
        if !self.paused && self.count > 0 {
            self.current = (self.current + 1) % self.count;
        }
        self.current
    }

    /// Rotation stops while the page is hidden.
    pub fn set_page_hidden(&mut self, hidden: bool) {
        self.paused = hidden;
    }

    pub fn opacities(&self) -> Vec<f32> {
        (0..self.count)
            .map(|i| if i == self.current { 1.0 } else { 0.0 })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn link_clicked(&mut self) {
        self.open = false;
    }

    pub fn clicked_outside(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    /// The body must not scroll behind an open menu.
    pub fn body_scroll_locked(&self) -> bool {
        self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPosition {
    Shown,
    Hidden,
}

/// Hides the header while scrolling down past the threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderScroll {
    last: f64,
}

impl HeaderScroll {
    pub fn on_scroll(&mut self, offset: f64) -> HeaderPosition {
        let position = if offset > HEADER_SCROLL_THRESHOLD && offset > self.last {
            HeaderPosition::Hidden
        } else {
            HeaderPosition::Shown
        };
        self.last = offset;
        position
    }
}

/// Element id an in-page link scrolls to. Bare `#` and `#!` go nowhere.
pub fn anchor_target(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        None | Some("") | Some("!") => None,
        Some(id) => Some(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_wraps_and_pauses() {
        let mut slider = HeroSlider::new(3);
        assert_eq!(slider.opacities(), vec![1.0, 0.0, 0.0]);
        assert_eq!(slider.tick(), 1);
        assert_eq!(slider.tick(), 2);
        assert_eq!(slider.tick(), 0);

        slider.set_page_hidden(true);
        assert_eq!(slider.tick(), 0);
        slider.set_page_hidden(false);
        assert_eq!(slider.tick(), 1);
        assert_eq!(slider.opacities(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_slider_without_images() {
        let mut slider = HeroSlider::new(0);
        assert_eq!(slider.tick(), 0);
        assert!(slider.opacities().is_empty());
    }

    #[test]
    fn test_menu_open_close() {
        let mut menu = MobileMenu::default();
        assert!(menu.toggle());
        assert_eq!(menu.aria_expanded(), "true");
        assert!(menu.body_scroll_locked());

        menu.link_clicked();
        assert!(!menu.is_open());
        assert!(!menu.body_scroll_locked());

        menu.toggle();
        menu.clicked_outside();
        assert_eq!(menu.aria_expanded(), "false");
    }

    #[test]
    fn test_header_scroll() {
        let mut header = HeaderScroll::default();
        assert_eq!(header.on_scroll(50.0), HeaderPosition::Shown);
        assert_eq!(header.on_scroll(150.0), HeaderPosition::Hidden);
        assert_eq!(header.on_scroll(300.0), HeaderPosition::Hidden);
        assert_eq!(header.on_scroll(250.0), HeaderPosition::Shown);
        assert_eq!(header.on_scroll(400.0), HeaderPosition::Hidden);
        assert_eq!(header.on_scroll(90.0), HeaderPosition::Shown);
    }

    #[test]
    fn test_anchor_target() {
        assert_eq!(anchor_target("#servicios"), Some("servicios"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("#!"), None);
        assert_eq!(anchor_target("https://example.com"), None);
    }
}
