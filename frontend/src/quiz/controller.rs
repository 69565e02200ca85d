use std::collections::BTreeMap;
use std::rc::Rc;

use log::{info, warn};
use serde_json::{Map, Value};

use super::analytics::{Analytics, AnalyticsEvent};
use super::answers::AnswerMap;
use super::definition::{ControlKind, QuizConfig, StepSpec};
use super::error::{ConfigError, NetworkError, QuizError, ValidationError};
use super::progress::ProgressTable;
use super::redirect::RedirectPlan;
use super::storage::AnswerStore;
use super::validate::validate_step;

/// Time the outgoing step stays on screen while the progress bar moves.
pub const TRANSITION_DELAY_MS: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Submitting,
    Confirmed,
}

/// A pending visibility swap between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlInput {
    Text { key: String, value: String },
    Radio { key: String, value: String },
    Checkbox { key: String, value: String, checked: bool },
}

impl ControlInput {
    pub fn text(key: &str, value: &str) -> Self {
        ControlInput::Text {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn radio(key: &str, value: &str) -> Self {
        ControlInput::Radio {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn checkbox(key: &str, value: &str, checked: bool) -> Self {
        ControlInput::Checkbox {
            key: key.to_string(),
            value: value.to_string(),
            checked,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            ControlInput::Text { key, .. }
            | ControlInput::Radio { key, .. }
            | ControlInput::Checkbox { key, .. } => key,
        }
    }
}

/// Everything the webhook receives.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub payload: Map<String, Value>,
}

pub struct QuizController<S, A> {
    config: Rc<QuizConfig>,
    progress: ProgressTable,
    current: usize,
    visible: usize,
    answers: AnswerMap,
    /// Typed text not yet committed: the email address and the breed search
    /// term. Never persisted or tracked.
    drafts: BTreeMap<String, String>,
    phase: Phase,
    initialized: bool,
    settled: bool,
    store: S,
    analytics: A,
}

impl<S: AnswerStore, A: Analytics> QuizController<S, A> {
    pub fn new(config: Rc<QuizConfig>, store: S, analytics: A) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            progress: ProgressTable::new(config.len()),
            config,
            current: 0,
            visible: 0,
            answers: AnswerMap::new(),
            drafts: BTreeMap::new(),
            phase: Phase::Active,
            initialized: false,
            settled: false,
            store,
            analytics,
        })
    }

    /// Shows the first step, restores saved answers and returns the
    /// initial progress percentage.
    pub fn initialize(&mut self) -> u8 {
        if self.initialized {
            return self.progress();
        }
        self.initialized = true;
        self.current = 0;
        self.visible = 0;
        self.answers = self.store.load();
        info!(
            "Quiz started with {} steps, {} saved answers",
            self.config.len(),
            self.answers.len()
        );
        self.track(AnalyticsEvent::lifecycle("quiz_started").with("totalSlides", self.config.len()));
        self.progress()
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// The one step that is on screen right now.
    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_step(&self) -> &StepSpec {
        &self.config.steps[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.config.len()
    }

    pub fn progress(&self) -> u8 {
        self.progress.end_for(self.current)
    }

    pub fn track(&self, event: AnalyticsEvent) {
        self.analytics.track(&event, self.current);
    }

    fn step_of(&self, key: &str) -> Option<usize> {
        self.config
            .steps
            .iter()
            .position(|s| s.controls.iter().any(|c| c.key == key))
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.answers) {
            warn!("Could not save quiz answers: {}", e);
        }
    }

    /// Text typed into an email or breed control that is not an answer yet.
    pub fn draft(&self, key: &str) -> Option<&str> {
        self.drafts.get(key).map(String::as_str)
    }

    /// Keeps typed text for an email or breed control without saving or
    /// tracking it.
    pub fn edit_draft(&mut self, key: &str, text: &str) -> Result<(), QuizError> {
        if self.phase != Phase::Active {
            return Err(QuizError::AlreadySubmitted);
        }
        let control = self
            .config
            .control(key)
            .ok_or_else(|| QuizError::UnknownControl(key.to_string()))?;
        match control.kind {
            ControlKind::Email { .. } | ControlKind::Breed => {
                self.drafts.insert(key.to_string(), text.to_string());
                Ok(())
            }
            _ => Err(QuizError::WrongInput(key.to_string())),
        }
    }

    /// Answers with drafts layered on top, as seen by validation.
    fn answers_with_drafts(&self) -> AnswerMap {
        let mut answers = self.answers.clone();
        for (key, text) in &self.drafts {
            if let Err(e) = answers.set_single(key, text) {
                warn!("Draft for {} ignored: {}", key, e);
            }
        }
        answers
    }

    /// Records a control change. Radio groups that advance on selection
    /// return the resulting transition.
    pub fn capture(&mut self, input: ControlInput) -> Result<Option<Transition>, QuizError> {
        if self.phase != Phase::Active {
            return Err(QuizError::AlreadySubmitted);
        }
        let config = Rc::clone(&self.config);
        let key = input.key().to_string();
        let control = config
            .control(&key)
            .ok_or_else(|| QuizError::UnknownControl(key.clone()))?;

        let mut advance = false;
        match (&input, &control.kind) {
            // The address only reaches the payload through submit().
            (ControlInput::Text { value, .. }, ControlKind::Email { .. }) => {
                self.drafts.insert(key, value.clone());
                return Ok(None);
            }
            (ControlInput::Text { value, .. }, ControlKind::Breed) => {
                self.answers.set_single(&key, value)?;
                self.drafts.remove(&key);
            }
            (
                ControlInput::Text { value, .. },
                ControlKind::Text { .. } | ControlKind::Select { .. },
            ) => {
                self.answers.set_single(&key, value)?;
            }
            (ControlInput::Radio { value, .. }, ControlKind::Radio { advance: a, .. }) => {
                self.answers.set_single(&key, value)?;
                advance = *a;
            }
            (
                ControlInput::Checkbox { value, checked, .. },
                ControlKind::Checkbox { options, exclusive },
            ) => {
                let exclusive = exclusive.as_deref();
                if *checked && exclusive == Some(value.as_str()) {
                    for option in options.iter().filter(|o| &o.value != value) {
                        self.answers.toggle(&key, &option.value, false);
                    }
                } else if *checked {
                    if let Some(exclusive) = exclusive {
                        self.answers.toggle(&key, exclusive, false);
                    }
                }
                self.answers.toggle(&key, value, *checked);
            }
            _ => return Err(QuizError::WrongInput(key)),
        }

        self.persist();

        let answer = self
            .answers
            .get(&key)
            .map(|a| a.to_json())
            .unwrap_or(Value::Null);
        self.track(
            AnalyticsEvent::lifecycle("answer_selected")
                .with("question", key.as_str())
                .with("answer", answer.clone()),
        );

        if let ControlInput::Radio { .. } = input {
            let group = self
                .step_of(&key)
                .map(|i| config.steps[i].id.clone())
                .unwrap_or_default();
            self.track(
                AnalyticsEvent::lifecycle("radio_selected")
                    .with("question", key.as_str())
                    .with("answer", answer)
                    .with("group", group),
            );
        }

        if advance && self.step_of(&key) == Some(self.current) {
            // Auto-advance is best effort; other required controls may still be empty.
            return Ok(self.navigate(Direction::Next).ok().flatten());
        }
        Ok(None)
    }

    pub fn validate_current_step(&self) -> Result<(), ValidationError> {
        validate_step(self.current_step(), &self.answers_with_drafts())
    }

    /// Enabled state of the next button.
    pub fn can_advance(&self) -> bool {
        self.current_step().free_pass || self.validate_current_step().is_ok()
    }

    /// Moves one step. Bounds are a silent no-op; moving forward needs a
    /// valid step unless the step is a free pass.
    pub fn navigate(&mut self, direction: Direction) -> Result<Option<Transition>, ValidationError> {
        if self.phase != Phase::Active {
            return Ok(None);
        }
        let from = self.current;
        let to = match direction {
            Direction::Next if from + 1 < self.config.len() => from + 1,
            Direction::Prev if from > 0 => from - 1,
            _ => return Ok(None),
        };

        if direction == Direction::Next && !self.current_step().free_pass {
            self.validate_current_step()?;
        }

        let event = match &self.current_step().ga_event {
            Some(tag) => AnalyticsEvent::tagged(tag),
            None => AnalyticsEvent::lifecycle("slide_change"),
        };
        self.track(
            event
                .with("direction", direction.as_str())
                .with("fromSlide", from)
                .with("toSlide", to),
        );

        self.current = to;
        Ok(Some(Transition {
            from,
            to,
            delay_ms: TRANSITION_DELAY_MS,
        }))
    }

    /// Swaps visibility once the transition delay has passed. Stale
    /// transitions from an earlier move are ignored.
    pub fn complete_transition(&mut self, transition: Transition) -> bool {
        if transition.to != self.current || self.visible == self.current {
            return false;
        }
        self.visible = transition.to;
        true
    }

    /// Validates the final step and freezes the answers into a webhook payload.
    pub fn submit(&mut self, email: &str) -> Result<Submission, QuizError> {
        if self.phase != Phase::Active {
            return Err(QuizError::AlreadySubmitted);
        }
        if !self.is_last() {
            return Err(QuizError::NotOnLastStep);
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail.into());
        }

        let mut checked = self.answers_with_drafts();
        if let Some(control) = self.current_step().email_control() {
            checked.set_single(&control.key, email)?;
        }
        validate_step(self.current_step(), &checked)?;

        self.phase = Phase::Submitting;
        info!("Submitting quiz with {} answers", self.answers.len());
        Ok(Submission {
            payload: self.answers.submission_payload(email),
        })
    }

    /// Enters the confirmation view; never waits on the webhook.
    pub fn confirm(&mut self) -> Option<RedirectPlan> {
        if self.phase != Phase::Submitting {
            return None;
        }
        self.phase = Phase::Confirmed;
        let thank_you = &self.config.thank_you;
        Some(RedirectPlan::new(
            &thank_you.redirect_url,
            self.answers.text(&thank_you.problem_key),
            thank_you.redirect_delay_ms,
        ))
    }

    /// Outcome of the webhook POST. Only a delivered submission clears the
    /// saved answers.
    pub fn submission_settled(&mut self, result: Result<(), NetworkError>) {
        if self.phase == Phase::Active || self.settled {
            return;
        }
        self.settled = true;
        match result {
            Ok(()) => {
                self.store.remove();
                let problem = self
                    .answers
                    .text(&self.config.thank_you.problem_key)
                    .unwrap_or("unknown")
                    .to_string();
                if let Some(tag) = self.current_step().ga_event.clone() {
                    self.track(AnalyticsEvent::tagged(&tag));
                }
                self.track(AnalyticsEvent::lifecycle("form_submitted").with("problem", problem));
            }
            Err(e) => warn!("Quiz submission failed, answers kept locally: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::analytics::RecordingAnalytics;
    use crate::quiz::definition::{ChoiceOption, ControlSpec};
    use crate::quiz::storage::MemoryAnswerStore;

    type Controller = QuizController<MemoryAnswerStore, RecordingAnalytics>;

    fn config() -> Rc<QuizConfig> {
        let mut config = QuizConfig::dog_quiz();
        config.steps = vec![
            StepSpec::new("problem", "Problem").tagged("step_problem").control(ControlSpec::new(
                "problem",
                "",
                ControlKind::Radio {
                    options: vec![
                        ChoiceOption::new("itching", "Itching"),
                        ChoiceOption::new("joints", "Joints"),
                    ],
                    advance: true,
                },
            )),
            StepSpec::new("name", "Name").control(ControlSpec::new(
                "dogName",
                "Name",
                ControlKind::Text {
                    placeholder: String::new(),
                },
            )),
            StepSpec::new("dental", "Dental").control(ControlSpec::new(
                "dental",
                "",
                ControlKind::Checkbox {
                    options: vec![
                        ChoiceOption::new("tartar", "Tartar"),
                        ChoiceOption::new("red_gums", "Red gums"),
                        ChoiceOption::new("none", "None"),
                    ],
                    exclusive: Some("none".into()),
                },
            )),
            StepSpec::new("insight", "Insight").free_pass(),
            StepSpec::new("email", "Email").tagged("quiz_submit").control(ControlSpec::new(
                "email",
                "Email",
                ControlKind::Email {
                    placeholder: String::new(),
                },
            )),
        ];
        Rc::new(config)
    }

    fn started() -> (Controller, MemoryAnswerStore, RecordingAnalytics) {
        let store = MemoryAnswerStore::new();
        let analytics = RecordingAnalytics::default();
        let mut quiz = QuizController::new(config(), store.clone(), analytics.clone()).unwrap();
        quiz.initialize();
        (quiz, store, analytics)
    }

    fn advance(quiz: &mut Controller) {
        let transition = quiz.navigate(Direction::Next).unwrap().unwrap();
        quiz.complete_transition(transition);
    }

    fn walk_to_last(quiz: &mut Controller) {
        let t = quiz.capture(ControlInput::radio("problem", "itching")).unwrap().unwrap();
        quiz.complete_transition(t);
        quiz.capture(ControlInput::text("dogName", "Rex")).unwrap();
        advance(quiz);
        quiz.capture(ControlInput::checkbox("dental", "tartar", true)).unwrap();
        advance(quiz);
        advance(quiz);
        assert!(quiz.is_last());
    }

    #[test]
    fn initialize_shows_first_step_once() {
        let (mut quiz, _, analytics) = started();
        assert_eq!(quiz.current(), 0);
        assert_eq!(quiz.visible(), 0);
        assert_eq!(quiz.progress(), 20);

        quiz.initialize();
        assert_eq!(analytics.names(), vec!["quiz_started".to_string()]);
        assert_eq!(
            analytics.last("quiz_started").unwrap().field("totalSlides"),
            Some(&Value::from(5))
        );
    }

    #[test]
    fn initialize_restores_saved_answers() {
        let store = MemoryAnswerStore::with_raw(r#"{"dogName":"Bella","dental":["tartar"]}"#);
        let mut quiz =
            QuizController::new(config(), store, RecordingAnalytics::default()).unwrap();
        quiz.initialize();

        assert_eq!(quiz.answers().text("dogName"), Some("Bella"));
        assert!(quiz.answers().is_selected("dental", "tartar"));
    }

    #[test]
    fn navigation_bounds_are_no_ops() {
        let (mut quiz, _, analytics) = started();
        assert_eq!(quiz.navigate(Direction::Prev), Ok(None));
        assert_eq!(quiz.current(), 0);

        walk_to_last(&mut quiz);
        analytics.clear();
        assert_eq!(quiz.navigate(Direction::Next), Ok(None));
        assert_eq!(quiz.current(), 4);
        assert!(analytics.names().is_empty());
    }

    #[test]
    fn next_is_gated_by_validation() {
        let (mut quiz, _, analytics) = started();
        let err = quiz.navigate(Direction::Next).unwrap_err();
        assert_eq!(err.focus_key(), Some("problem"));
        assert_eq!(quiz.current(), 0);
        assert!(!quiz.can_advance());
        assert!(analytics.last("step_problem").is_none());
    }

    #[test]
    fn radio_selection_advances_and_tags_the_move() {
        let (mut quiz, store, analytics) = started();
        let transition = quiz
            .capture(ControlInput::radio("problem", "joints"))
            .unwrap()
            .unwrap();

        assert_eq!(transition, Transition { from: 0, to: 1, delay_ms: 400 });
        assert_eq!(quiz.current(), 1);
        assert_eq!(quiz.visible(), 0);
        assert_eq!(quiz.progress(), 40);
        assert!(quiz.complete_transition(transition));
        assert_eq!(quiz.visible(), 1);

        let tag = analytics.last("step_problem").unwrap();
        assert_eq!(tag.field("direction"), Some(&Value::from("next")));
        assert_eq!(tag.field("fromSlide"), Some(&Value::from(0)));
        assert_eq!(tag.field("toSlide"), Some(&Value::from(1)));
        assert!(analytics.last("radio_selected").is_some());
        assert!(store.load().is_selected("problem", "joints"));
    }

    #[test]
    fn stale_transition_does_not_swap_visibility() {
        let (mut quiz, _, _) = started();
        let first = quiz.capture(ControlInput::radio("problem", "itching")).unwrap().unwrap();
        quiz.capture(ControlInput::text("dogName", "Rex")).unwrap();
        let second = quiz.navigate(Direction::Next).unwrap().unwrap();

        assert!(!quiz.complete_transition(first));
        assert_eq!(quiz.visible(), 0);
        assert!(quiz.complete_transition(second));
        assert_eq!(quiz.visible(), 2);
    }

    #[test]
    fn back_is_always_allowed() {
        let (mut quiz, _, _) = started();
        let t = quiz.capture(ControlInput::radio("problem", "itching")).unwrap().unwrap();
        quiz.complete_transition(t);

        let back = quiz.navigate(Direction::Prev).unwrap().unwrap();
        assert_eq!((back.from, back.to), (1, 0));
        assert_eq!(quiz.progress(), 20);
    }

    #[test]
    fn free_pass_step_skips_validation() {
        let (mut quiz, _, _) = started();
        let t = quiz.capture(ControlInput::radio("problem", "itching")).unwrap().unwrap();
        quiz.complete_transition(t);
        quiz.capture(ControlInput::text("dogName", "Rex")).unwrap();
        advance(&mut quiz);
        quiz.capture(ControlInput::checkbox("dental", "red_gums", true)).unwrap();
        advance(&mut quiz);

        assert_eq!(quiz.current(), 3);
        assert!(quiz.can_advance());
        assert!(quiz.navigate(Direction::Next).unwrap().is_some());
    }

    #[test]
    fn exclusive_option_clears_siblings_and_back() {
        let (mut quiz, _, _) = started();
        quiz.capture(ControlInput::checkbox("dental", "tartar", true)).unwrap();
        quiz.capture(ControlInput::checkbox("dental", "red_gums", true)).unwrap();

        quiz.capture(ControlInput::checkbox("dental", "none", true)).unwrap();
        let answers = quiz.answers();
        assert!(answers.is_selected("dental", "none"));
        assert!(!answers.is_selected("dental", "tartar"));
        assert!(!answers.is_selected("dental", "red_gums"));

        quiz.capture(ControlInput::checkbox("dental", "tartar", true)).unwrap();
        assert!(quiz.answers().is_selected("dental", "tartar"));
        assert!(!quiz.answers().is_selected("dental", "none"));
    }

    #[test]
    fn checkbox_toggle_round_trip() {
        let (mut quiz, _, _) = started();
        quiz.capture(ControlInput::checkbox("dental", "tartar", true)).unwrap();
        let before = quiz.answers().clone();

        quiz.capture(ControlInput::checkbox("dental", "red_gums", true)).unwrap();
        quiz.capture(ControlInput::checkbox("dental", "red_gums", false)).unwrap();
        assert_eq!(quiz.answers(), &before);
    }

    #[test]
    fn rejects_unknown_and_mismatched_input() {
        let (mut quiz, _, _) = started();
        assert_eq!(
            quiz.capture(ControlInput::text("colour", "brown")),
            Err(QuizError::UnknownControl("colour".into()))
        );
        assert_eq!(
            quiz.capture(ControlInput::text("dental", "tartar")),
            Err(QuizError::WrongInput("dental".into()))
        );
    }

    #[test]
    fn blank_email_is_rejected_before_submitting() {
        let (mut quiz, store, _) = started();
        walk_to_last(&mut quiz);

        assert_eq!(
            quiz.submit("   "),
            Err(QuizError::Validation(ValidationError::MissingEmail))
        );
        assert_eq!(quiz.phase(), Phase::Active);
        assert!(!store.load().is_empty());
    }

    #[test]
    fn typed_email_stays_out_of_storage_and_analytics() {
        let (mut quiz, store, analytics) = started();
        walk_to_last(&mut quiz);
        analytics.clear();

        assert_eq!(quiz.capture(ControlInput::text("email", "owner@example.com")), Ok(None));
        assert_eq!(quiz.draft("email"), Some("owner@example.com"));
        assert!(quiz.answers().get("email").is_none());
        assert!(store.load().get("email").is_none());
        assert!(analytics.names().is_empty());

        let submission = quiz.submit("owner@example.com").unwrap();
        assert_eq!(submission.payload["email"], "owner@example.com");
        assert!(store.load().get("email").is_none());
        assert!(analytics.events().iter().all(|e| !e
            .data_layer_entry(4)
            .to_string()
            .contains("owner@example.com")));
    }

    #[test]
    fn breed_search_term_is_not_an_answer() {
        let mut config = (*config()).clone();
        config.steps[1] = config.steps[1].clone().control(ControlSpec::new(
            "breed",
            "Breed",
            ControlKind::Breed,
        ));
        let store = MemoryAnswerStore::new();
        let analytics = RecordingAnalytics::default();
        let mut quiz =
            QuizController::new(Rc::new(config), store.clone(), analytics.clone()).unwrap();
        quiz.initialize();
        let t = quiz.capture(ControlInput::radio("problem", "itching")).unwrap().unwrap();
        quiz.complete_transition(t);
        quiz.capture(ControlInput::text("dogName", "Rex")).unwrap();
        let saved = store.load();
        analytics.clear();

        quiz.edit_draft("breed", "lab").unwrap();
        assert_eq!(quiz.draft("breed"), Some("lab"));
        assert!(quiz.answers().get("breed").is_none());
        assert_eq!(store.load(), saved);
        assert!(analytics.names().is_empty());
        // The typed term is enough to leave the step.
        assert!(quiz.can_advance());

        quiz.capture(ControlInput::text("breed", "labrador")).unwrap();
        assert_eq!(quiz.answers().text("breed"), Some("labrador"));
        assert_eq!(quiz.draft("breed"), None);
        assert_eq!(store.load().text("breed"), Some("labrador"));
        assert_eq!(
            quiz.edit_draft("dogName", "Max"),
            Err(QuizError::WrongInput("dogName".into()))
        );
    }

    #[test]
    fn submit_only_from_last_step() {
        let (mut quiz, _, _) = started();
        assert_eq!(quiz.submit("a@b.c"), Err(QuizError::NotOnLastStep));
    }

    #[test]
    fn successful_submission_clears_saved_answers() {
        let (mut quiz, store, analytics) = started();
        walk_to_last(&mut quiz);

        let submission = quiz.submit(" owner@example.com ").unwrap();
        assert_eq!(submission.payload["email"], "owner@example.com");
        assert_eq!(submission.payload["problem"], "itching");
        assert_eq!(submission.payload["dental"], serde_json::json!(["tartar"]));
        assert_eq!(quiz.phase(), Phase::Submitting);
        assert_eq!(quiz.submit("owner@example.com"), Err(QuizError::AlreadySubmitted));

        let plan = quiz.confirm().unwrap();
        assert_eq!(plan.url, "/pages/quiz?problem=itching");
        assert_eq!(quiz.phase(), Phase::Confirmed);
        assert_eq!(quiz.confirm(), None);

        quiz.submission_settled(Ok(()));
        assert!(store.is_empty());
        assert!(store.load().is_empty());
        assert!(analytics.last("quiz_submit").is_some());
        assert_eq!(
            analytics.last("form_submitted").unwrap().field("problem"),
            Some(&Value::from("itching"))
        );
    }

    #[test]
    fn failed_submission_still_confirms_and_keeps_answers() {
        let (mut quiz, store, analytics) = started();
        walk_to_last(&mut quiz);

        quiz.submit("owner@example.com").unwrap();
        assert!(quiz.confirm().is_some());
        quiz.submission_settled(Err(NetworkError::Request("offline".into())));

        assert_eq!(quiz.phase(), Phase::Confirmed);
        assert_eq!(store.load().text("problem"), Some("itching"));
        assert_eq!(store.load().text("email"), None);
        assert!(analytics.last("form_submitted").is_none());
        assert_eq!(
            quiz.capture(ControlInput::text("dogName", "Max")),
            Err(QuizError::AlreadySubmitted)
        );
    }
}
