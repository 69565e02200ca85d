//! Page-wide behaviors that are not tied to one component: smooth
//! scrolling for in-page anchors and reveal-on-scroll animations. The
//! carousel, video and logo strip helpers live here too so their geometry
//! can be tested without a browser.

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, HtmlElement, ScrollBehavior, ScrollToOptions};

pub const ANCHOR_OFFSET_PX: f64 = 100.0;
pub const REVEAL_MARGIN_PX: f64 = 50.0;
pub const REVEAL_SELECTOR: &str = ".animate-on-scroll";
pub const REVEALED_CLASS: &str = "animated";
pub const CAROUSEL_MIN_ITEMS: usize = 4;
pub const CAROUSEL_WINDOW_PX: f64 = 600.0;
pub const DESKTOP_MIN_WIDTH_PX: f64 = 890.0;
pub const VIDEO_VISIBLE_THRESHOLD: f64 = 0.9;
pub const TICKER_SPEED_PX_PER_S: f64 = 50.0;

/// Selector of the in-page target for `href`, if it is a real anchor link.
pub fn anchor_target(href: &str) -> Option<&str> {
    if href.starts_with('#') && href != "#" {
        Some(href)
    } else {
        None
    }
}

pub fn anchor_scroll_top(offset_top: f64) -> f64 {
    offset_top - ANCHOR_OFFSET_PX
}

pub fn should_reveal(element_top: f64, window_height: f64) -> bool {
    element_top < window_height - REVEAL_MARGIN_PX
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBox {
    pub left: f64,
    pub width: f64,
}

/// Distance to scroll right: the width of the first item starting inside
/// the carousel window.
pub fn next_scroll_delta(items: &[ItemBox], container_left: f64) -> Option<f64> {
    items
        .iter()
        .find(|item| item.left <= container_left + CAROUSEL_WINDOW_PX)
        .map(|item| item.width)
}

/// Distance to scroll left: the width of the item just before the first
/// one (from the second on) starting inside the window.
pub fn prev_scroll_delta(items: &[ItemBox], container_left: f64) -> Option<f64> {
    (1..items.len())
        .find(|&i| items[i].left < container_left + CAROUSEL_WINDOW_PX)
        .map(|i| -items[i - 1].width)
}

pub fn carousel_has_controls(item_count: usize) -> bool {
    item_count >= CAROUSEL_MIN_ITEMS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoMode {
    /// Wide screens play on hover.
    Hover,
    /// Narrow screens play whenever the video is on screen.
    Autoplay,
}

pub fn video_mode(viewport_width: f64) -> VideoMode {
    if viewport_width > DESKTOP_MIN_WIDTH_PX {
        VideoMode::Hover
    } else {
        VideoMode::Autoplay
    }
}

pub fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

/// Seconds one full pass of a duplicated logo strip should take.
pub fn ticker_duration_secs(doubled_scroll_width: f64) -> f64 {
    (doubled_scroll_width / 2.0) / TICKER_SPEED_PX_PER_S
}

fn reveal_visible_elements() {
    let Some(window) = window() else { return };
    let Some(document) = window.document() else { return };
    let window_height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);

    if let Ok(elements) = document.query_selector_all(REVEAL_SELECTOR) {
        for i in 0..elements.length() {
            if let Some(element) = elements.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let top = element.get_bounding_client_rect().top();
                if should_reveal(top, window_height) {
                    let _ = element.class_list().add_1(REVEALED_CLASS);
                }
            }
        }
    }
}

fn scroll_to_anchor(event: &Event) {
    let Some(link) = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("a[href^='#']").ok().flatten())
    else {
        return;
    };
    let href = link.get_attribute("href").unwrap_or_default();
    let Some(selector) = anchor_target(&href) else { return };

    event.prevent_default();
    let Some(window) = window() else { return };
    let target = window
        .document()
        .and_then(|d| d.query_selector(selector).ok().flatten())
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());

    if let Some(target) = target {
        let options = ScrollToOptions::new();
        options.set_top(anchor_scroll_top(target.offset_top() as f64));
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    } else {
        debug!("No element for anchor {}", selector);
    }
}

/// Listeners installed once for the lifetime of the app. The host owns the
/// value and with it the "already installed" flag.
#[derive(Default)]
pub struct PageBehaviors {
    installed: bool,
    on_scroll: Option<Closure<dyn FnMut()>>,
    on_click: Option<Closure<dyn FnMut(Event)>>,
}

impl PageBehaviors {
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Returns false when already installed.
    pub fn install(&mut self) -> bool {
        if self.installed {
            return false;
        }
        let Some(window) = window() else {
            warn!("No window, page behaviors not installed");
            return false;
        };
        let Some(document) = window.document() else {
            return false;
        };

        let on_scroll = Closure::wrap(Box::new(reveal_visible_elements) as Box<dyn FnMut()>);
        let on_click = Closure::wrap(Box::new(move |e: Event| scroll_to_anchor(&e)) as Box<dyn FnMut(Event)>);

        if let Err(e) = window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref()) {
            warn!("Could not listen for scroll: {:?}", e);
        }
        if let Err(e) = document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()) {
            warn!("Could not listen for anchor clicks: {:?}", e);
        }

        // Elements already in view on load.
        reveal_visible_elements();

        self.on_scroll = Some(on_scroll);
        self.on_click = Some(on_click);
        self.installed = true;
        true
    }

    pub fn uninstall(&mut self) {
        if !self.installed {
            return;
        }
        if let Some(window) = window() {
            if let Some(on_scroll) = self.on_scroll.take() {
                let _ = window.remove_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref());
            }
            if let (Some(document), Some(on_click)) = (window.document(), self.on_click.take()) {
                let _ = document.remove_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            }
        }
        self.installed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ItemBox> {
        vec![
            ItemBox { left: -300.0, width: 300.0 },
            ItemBox { left: 0.0, width: 320.0 },
            ItemBox { left: 320.0, width: 340.0 },
            ItemBox { left: 660.0, width: 300.0 },
        ]
    }

    #[test]
    fn only_real_anchors_scroll() {
        assert_eq!(anchor_target("#quiz"), Some("#quiz"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/pages/quiz"), None);
        assert_eq!(anchor_scroll_top(740.0), 640.0);
    }

    #[test]
    fn reveal_margin() {
        assert!(should_reveal(600.0, 700.0));
        assert!(!should_reveal(650.0, 700.0));
    }

    #[test]
    fn carousel_scroll_steps() {
        let items = items();
        assert_eq!(next_scroll_delta(&items, 0.0), Some(300.0));
        assert_eq!(prev_scroll_delta(&items, 0.0), Some(-300.0));
        assert_eq!(prev_scroll_delta(&items[..1], 0.0), None);
        assert_eq!(next_scroll_delta(&[], 0.0), None);
    }

    #[test]
    fn carousel_controls_need_four_items() {
        assert!(!carousel_has_controls(3));
        assert!(carousel_has_controls(4));
    }

    #[test]
    fn video_mode_by_width() {
        assert_eq!(video_mode(1280.0), VideoMode::Hover);
        assert_eq!(video_mode(890.0), VideoMode::Autoplay);
    }

    #[test]
    fn ticker_speed() {
        assert_eq!(ticker_duration_secs(2000.0), 20.0);
    }

    #[test]
    fn fresh_behaviors_are_not_installed() {
        let mut behaviors = PageBehaviors::default();
        assert!(!behaviors.is_installed());
        behaviors.uninstall();
        assert!(!behaviors.is_installed());
    }
}
