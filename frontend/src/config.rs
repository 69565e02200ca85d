use log::{warn, Level};
use web_sys::window;

use crate::quiz::QuizConfig;

pub const ANSWERS_STORAGE_KEY: &str = "dogQuizAnswers";
pub const BREED_LIST_URL: &str = "https://dog.ceo/api/breeds/list/all";
pub const QUIZ_CONFIG_ELEMENT_ID: &str = "quiz-config";

pub fn get_webhook_url() -> &'static str {
    "https://hook.eu1.make.com/41wz8kcbi55l58kainny1r65aut5pjfu"
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose analytics traces while developing
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Quiz definition embedded by the host page as
/// `<script type="application/json" id="quiz-config">`, or the built-in
/// dog quiz when the page has none.
pub fn load_quiz_config() -> QuizConfig {
    let embedded = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(QUIZ_CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());

    match embedded {
        Some(raw) => QuizConfig::from_json(&raw).unwrap_or_else(|e| {
            warn!("Ignoring embedded quiz config: {}", e);
            QuizConfig::dog_quiz()
        }),
        None => QuizConfig::dog_quiz(),
    }
}
