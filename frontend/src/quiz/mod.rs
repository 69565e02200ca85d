//! DOM-free core of the quiz wizard: answers, persistence, validation,
//! progress and the step controller. The Yew components in
//! `components::quiz` drive it from browser events.

pub mod analytics;
pub mod answers;
pub mod breeds;
pub mod controller;
pub mod definition;
pub mod error;
pub mod progress;
pub mod redirect;
pub mod storage;
pub mod validate;
pub mod webhook;

pub use analytics::{AnalyticsEvent, BrowserAnalytics};
pub use controller::{ControlInput, Direction, Phase, QuizController, Transition};
pub use definition::{ControlKind, ControlSpec, QuizConfig, StepSpec};
pub use error::{NetworkError, QuizError};
pub use storage::LocalAnswerStore;
