use chrono::{SecondsFormat, Utc};
use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Function, Object, Reflect};
use web_sys::window;

pub const EVENT_CATEGORY: &str = "Quiz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Internal quiz lifecycle, data layer only.
    Lifecycle,
    /// Markup-configured tags, also forwarded to gtag and the pixel.
    Tagged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    pub name: String,
    pub kind: EventKind,
    pub fields: Map<String, Value>,
}

impl AnalyticsEvent {
    pub fn lifecycle(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: EventKind::Lifecycle,
            fields: Map::new(),
        }
    }

    pub fn tagged(name: &str) -> Self {
        Self {
            kind: EventKind::Tagged,
            ..Self::lifecycle(name)
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Event name carrying the page identifier, as the pixel expects.
    pub fn suffixed_name(&self, page: &str) -> String {
        format!("{}__{}", self.name, page)
    }

    /// Flat object pushed onto the data layer.
    pub fn data_layer_entry(&self, slide_index: usize) -> Value {
        let mut entry = Map::new();
        entry.insert("event".to_string(), Value::from(self.name.clone()));
        entry.insert("event_category".to_string(), Value::from(EVENT_CATEGORY));
        entry.insert(
            "timestamp".to_string(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        entry.insert("slideIndex".to_string(), Value::from(slide_index));
        for (key, value) in &self.fields {
            entry.insert(key.clone(), value.clone());
        }
        Value::Object(entry)
    }
}

/// Page identifier: the document title without any whitespace.
pub fn sanitize_page_name(title: &str) -> String {
    title.chars().filter(|c| !c.is_whitespace()).collect()
}

pub trait Analytics {
    fn track(&self, event: &AnalyticsEvent, slide_index: usize);
}

/// Pushes events to `window.dataLayer`, `gtag` and `TriplePixel` when the
/// page has them loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrowserAnalytics {
    page: String,
}

impl BrowserAnalytics {
    pub fn new() -> Self {
        let title = window()
            .and_then(|w| w.document())
            .map(|d| d.title())
            .unwrap_or_default();
        Self {
            page: sanitize_page_name(&title),
        }
    }

    fn push_data_layer(&self, entry: &JsValue) -> Result<(), JsValue> {
        let window = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let key = JsValue::from_str("dataLayer");
        let mut layer = Reflect::get(&window, &key)?;
        if layer.is_undefined() || layer.is_null() {
            layer = Array::new().into();
            Reflect::set(&window, &key, &layer)?;
        }
        let push: Function = Reflect::get(&layer, &JsValue::from_str("push"))?.dyn_into()?;
        push.call1(&layer, entry)?;
        Ok(())
    }

    fn global_function(name: &str) -> Option<Function> {
        let window = window()?;
        Reflect::get(&window, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }

    fn forward_tagged(&self, event: &AnalyticsEvent, data: &JsValue) -> Result<(), JsValue> {
        if let Some(gtag) = Self::global_function("gtag") {
            gtag.call3(
                &JsValue::NULL,
                &JsValue::from_str("event"),
                &JsValue::from_str(&event.name),
                data,
            )?;
        }
        if let Some(pixel) = Self::global_function("TriplePixel") {
            let details = Object::new();
            Reflect::set(
                &details,
                &JsValue::from_str("productId"),
                &JsValue::from_str(&self.page),
            )?;
            pixel.call3(
                &JsValue::NULL,
                &JsValue::from_str("custom"),
                &JsValue::from_str(&event.suffixed_name(&self.page)),
                &details,
            )?;
        }
        Ok(())
    }
}

impl Analytics for BrowserAnalytics {
    fn track(&self, event: &AnalyticsEvent, slide_index: usize) {
        let entry = event.data_layer_entry(slide_index);
        debug!("analytics: {}", entry);

        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let js_entry = match entry.serialize(&serializer) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not convert analytics event {}: {}", event.name, e);
                return;
            }
        };

        if let Err(e) = self.push_data_layer(&js_entry) {
            warn!("dataLayer push failed for {}: {:?}", event.name, e);
        }
        if event.kind == EventKind::Tagged {
            if let Err(e) = self.forward_tagged(event, &js_entry) {
                warn!("Tracking call failed for {}: {:?}", event.name, e);
            }
        }
    }
}

#[cfg(test)]
pub use recording::RecordingAnalytics;

#[cfg(test)]
mod recording {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{Analytics, AnalyticsEvent};

    #[derive(Clone, Default)]
    pub struct RecordingAnalytics {
        events: Rc<RefCell<Vec<(AnalyticsEvent, usize)>>>,
    }

    impl RecordingAnalytics {
        pub fn names(&self) -> Vec<String> {
            self.events.borrow().iter().map(|(e, _)| e.name.clone()).collect()
        }

        pub fn last(&self, name: &str) -> Option<AnalyticsEvent> {
            self.events
                .borrow()
                .iter()
                .rev()
                .find(|(e, _)| e.name == name)
                .map(|(e, _)| e.clone())
        }

        pub fn events(&self) -> Vec<AnalyticsEvent> {
            self.events.borrow().iter().map(|(e, _)| e.clone()).collect()
        }

        pub fn clear(&self) {
            self.events.borrow_mut().clear();
        }
    }

    impl Analytics for RecordingAnalytics {
        fn track(&self, event: &AnalyticsEvent, slide_index: usize) {
            self.events.borrow_mut().push((event.clone(), slide_index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_name_drops_all_whitespace() {
        assert_eq!(sanitize_page_name("Dog Quiz \t| Paws\n"), "DogQuiz|Paws");
        assert_eq!(
            AnalyticsEvent::tagged("quiz_view").suffixed_name("DogQuiz"),
            "quiz_view__DogQuiz"
        );
    }

    #[test]
    fn data_layer_entry_is_flat() {
        let event = AnalyticsEvent::lifecycle("answer_selected")
            .with("question", "weight")
            .with("answer", "small");

        let entry = event.data_layer_entry(3);
        assert_eq!(entry["event"], "answer_selected");
        assert_eq!(entry["event_category"], "Quiz");
        assert_eq!(entry["slideIndex"], 3);
        assert_eq!(entry["question"], "weight");
        assert!(entry["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
