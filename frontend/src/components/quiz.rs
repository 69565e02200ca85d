use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use log::{error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::breed_select::BreedSelect;
use crate::components::progress_bar::ProgressBar;
use crate::components::thank_you::ThankYou;
use crate::config;
use crate::quiz::breeds::{fetch_breeds, BreedCatalog};
use crate::quiz::definition::{personalize, BREED_KEY};
use crate::quiz::redirect::{RedirectCountdown, RedirectPlan, COUNTDOWN_START_DELAY_MS};
use crate::quiz::webhook::post_submission;
use crate::quiz::{
    AnalyticsEvent, BrowserAnalytics, ControlInput, ControlKind, ControlSpec, Direction,
    LocalAnswerStore, NetworkError, Phase, QuizConfig, QuizController, QuizError, StepSpec,
    Transition,
};

const ERROR_DISMISS_MS: u32 = 3000;
const REVEAL_DELAY_MS: u32 = 250;

#[derive(Properties, PartialEq)]
pub struct QuizProps {
    pub config: Rc<QuizConfig>,
}

pub enum QuizMsg {
    Capture(ControlInput),
    Next,
    Back,
    TransitionDone(Transition),
    DismissError(u32),
    Submit,
    SubmissionSettled(Result<(), NetworkError>),
    StartCountdown,
    CountdownTick,
    Reveal,
    BreedsLoaded(Result<Vec<String>, NetworkError>),
    BreedFocus,
    BreedSearch(String),
    BreedSelect(String),
    BreedClose,
}

pub struct Quiz {
    controller: Option<QuizController<LocalAnswerStore, BrowserAnalytics>>,
    progress: u8,
    error: Option<(u32, String)>,
    error_seq: u32,
    breeds: BreedCatalog,
    redirect: Option<RedirectPlan>,
    countdown: RedirectCountdown,
    ticker: Option<Interval>,
    shown: bool,
}

fn focus_element(id: &str) {
    if let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let _ = element.focus();
    }
}

impl Quiz {
    fn show_error(&mut self, ctx: &Context<Self>, message: String, focus: Option<&str>) {
        self.error_seq += 1;
        let seq = self.error_seq;
        self.error = Some((seq, message));

        if let (Some(key), Some(controller)) = (focus, self.controller.as_ref()) {
            if let Some(control) = controller.config().control(key) {
                focus_element(&control.dom_id());
            }
        }

        let link = ctx.link().clone();
        Timeout::new(ERROR_DISMISS_MS, move || {
            link.send_message(QuizMsg::DismissError(seq));
        })
        .forget();
    }

    fn begin_transition(&mut self, ctx: &Context<Self>, transition: Transition) {
        if let Some(controller) = self.controller.as_ref() {
            self.progress = controller.progress();
        }
        let link = ctx.link().clone();
        Timeout::new(transition.delay_ms, move || {
            link.send_message(QuizMsg::TransitionDone(transition));
        })
        .forget();
    }

    fn capture(&mut self, ctx: &Context<Self>, input: ControlInput) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let key = input.key().to_string();
        match controller.capture(input) {
            Ok(Some(transition)) => self.begin_transition(ctx, transition),
            Ok(None) => {}
            Err(e) => warn!("Ignoring input for {}: {}", key, e),
        }
    }

    fn track(&self, event: AnalyticsEvent) {
        if let Some(controller) = self.controller.as_ref() {
            controller.track(event);
        }
    }

    fn render_control(
        &self,
        ctx: &Context<Self>,
        controller: &QuizController<LocalAnswerStore, BrowserAnalytics>,
        control: &ControlSpec,
    ) -> Html {
        let answers = controller.answers();
        let key = control.key.clone();
        let id = control.dom_id();
        let typed = controller
            .draft(&control.key)
            .or_else(|| answers.text(&control.key))
            .unwrap_or_default()
            .to_string();

        match &control.kind {
            ControlKind::Text { placeholder } | ControlKind::Email { placeholder } => {
                let input_type = if matches!(control.kind, ControlKind::Email { .. }) {
                    "email"
                } else {
                    "text"
                };
                let oninput = ctx.link().callback(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    QuizMsg::Capture(ControlInput::text(&key, &input.value()))
                });
                html! {
                    <label class="quiz-field">
                        <span>{&control.label}</span>
                        <input
                            id={id}
                            type={input_type}
                            placeholder={placeholder.clone()}
                            value={typed.clone()}
                            {oninput}
                        />
                    </label>
                }
            }
            ControlKind::Select { options } => {
                let onchange = ctx.link().callback(move |e: Event| {
                    let select: HtmlSelectElement = e.target_unchecked_into();
                    QuizMsg::Capture(ControlInput::text(&key, &select.value()))
                });
                let current = answers.text(&control.key).unwrap_or_default();
                html! {
                    <label class="quiz-field">
                        <span>{&control.label}</span>
                        <select id={id} {onchange}>
                            <option value="" selected={current.is_empty()}>{"Choose..."}</option>
                            {
                                options.iter().map(|o| html! {
                                    <option value={o.value.clone()} selected={o.value == current}>
                                        {&o.label}
                                    </option>
                                }).collect::<Html>()
                            }
                        </select>
                    </label>
                }
            }
            ControlKind::Breed => {
                let link = ctx.link();
                html! {
                    <BreedSelect
                        id={id}
                        value={typed.clone()}
                        catalog={self.breeds.clone()}
                        on_focus={link.callback(|_| QuizMsg::BreedFocus)}
                        on_search={link.callback(QuizMsg::BreedSearch)}
                        on_select={link.callback(QuizMsg::BreedSelect)}
                        on_close={link.callback(|_| QuizMsg::BreedClose)}
                    />
                }
            }
            ControlKind::Radio { options, .. } => html! {
                <div class="radio-group">
                    {
                        options.iter().enumerate().map(|(i, o)| {
                            let selected = answers.is_selected(&control.key, &o.value);
                            let onchange = {
                                let key = key.clone();
                                let value = o.value.clone();
                                ctx.link().callback(move |_: Event| {
                                    QuizMsg::Capture(ControlInput::radio(&key, &value))
                                })
                            };
                            html! {
                                <label class={classes!("quiz-option", selected.then(|| "active"))}>
                                    <input
                                        id={if i == 0 { id.clone() } else { format!("{}-{}", id, i) }}
                                        type="radio"
                                        name={control.key.clone()}
                                        value={o.value.clone()}
                                        checked={selected}
                                        {onchange}
                                    />
                                    <span>{&o.label}</span>
                                </label>
                            }
                        }).collect::<Html>()
                    }
                </div>
            },
            ControlKind::Checkbox { options, exclusive } => html! {
                <div class="checkbox-group">
                    {
                        options.iter().enumerate().map(|(i, o)| {
                            let selected = answers.is_selected(&control.key, &o.value);
                            let is_exclusive = exclusive.as_deref() == Some(o.value.as_str());
                            let onchange = {
                                let key = key.clone();
                                let value = o.value.clone();
                                ctx.link().callback(move |e: Event| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    QuizMsg::Capture(ControlInput::checkbox(&key, &value, input.checked()))
                                })
                            };
                            html! {
                                <label class={classes!(
                                    "quiz-option",
                                    is_exclusive.then(|| "onlyselect"),
                                    selected.then(|| "active")
                                )}>
                                    <input
                                        id={if i == 0 { id.clone() } else { format!("{}-{}", id, i) }}
                                        type="checkbox"
                                        value={o.value.clone()}
                                        checked={selected}
                                        {onchange}
                                    />
                                    <span>{&o.label}</span>
                                </label>
                            }
                        }).collect::<Html>()
                    }
                </div>
            },
        }
    }

    fn render_step(
        &self,
        ctx: &Context<Self>,
        controller: &QuizController<LocalAnswerStore, BrowserAnalytics>,
        index: usize,
        step: &StepSpec,
    ) -> Html {
        let visible = index == controller.visible() && controller.phase() != Phase::Confirmed;
        let is_first = index == 0;
        let is_last = index + 1 == controller.config().len();
        let answers = controller.answers();
        let enabled = controller.can_advance();

        let next_button = if is_last {
            html! {
                <button class="submit-btn" onclick={ctx.link().callback(|e: MouseEvent| {
                    e.prevent_default();
                    QuizMsg::Submit
                })}>
                    {"Get my results"}
                </button>
            }
        } else {
            let style = if enabled || step.free_pass {
                "opacity: 1; cursor: pointer;"
            } else {
                "opacity: 0.5; cursor: not-allowed;"
            };
            html! {
                <button
                    class={classes!("next-btn", step.free_pass.then(|| "next-btn-no"))}
                    style={style}
                    onclick={ctx.link().callback(|e: MouseEvent| {
                        e.prevent_default();
                        QuizMsg::Next
                    })}
                >
                    {"Next"}
                </button>
            }
        };

        html! {
            <div
                key={step.id.clone()}
                class="quiz-slide"
                data-index={index.to_string()}
                style={if visible { "display: block;" } else { "display: none;" }}
            >
                <h2 class="dynamic-text">{personalize(&step.title, answers)}</h2>
                if !step.subtitle.is_empty() {
                    <p class="quiz-subtitle">{personalize(&step.subtitle, answers)}</p>
                }
                <div class="quiz-controls">
                    { for step.controls.iter().map(|c| self.render_control(ctx, controller, c)) }
                </div>
                if visible {
                    if let Some((_, message)) = &self.error {
                        <div class="error-message">{message}</div>
                    }
                }
                <div class="quiz-nav">
                    if !is_first {
                        <button class="back-btn" onclick={ctx.link().callback(|e: MouseEvent| {
                            e.prevent_default();
                            QuizMsg::Back
                        })}>
                            {"Back"}
                        </button>
                    }
                    {next_button}
                </div>
            </div>
        }
    }
}

impl Component for Quiz {
    type Message = QuizMsg;
    type Properties = QuizProps;

    fn create(ctx: &Context<Self>) -> Self {
        let quiz_config = ctx.props().config.clone();
        let controller = match QuizController::new(
            quiz_config,
            LocalAnswerStore::new(config::ANSWERS_STORAGE_KEY),
            BrowserAnalytics::new(),
        ) {
            Ok(mut controller) => {
                controller.initialize();
                controller.track(AnalyticsEvent::tagged("quiz_view"));
                Some(controller)
            }
            Err(e) => {
                error!("Quiz disabled, invalid configuration: {}", e);
                None
            }
        };

        let mut breeds = BreedCatalog::new();
        let wants_breeds = controller
            .as_ref()
            .map_or(false, |c| c.config().control(BREED_KEY).is_some());
        if wants_breeds && breeds.begin_load() {
            ctx.link().send_future(async {
                QuizMsg::BreedsLoaded(fetch_breeds(config::BREED_LIST_URL).await)
            });
        }

        let link = ctx.link().clone();
        Timeout::new(REVEAL_DELAY_MS, move || link.send_message(QuizMsg::Reveal)).forget();

        Self {
            progress: controller.as_ref().map_or(0, |c| c.progress()),
            controller,
            error: None,
            error_seq: 0,
            breeds,
            redirect: None,
            countdown: RedirectCountdown::new(),
            ticker: None,
            shown: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            QuizMsg::Capture(input) => {
                self.capture(ctx, input);
                true
            }
            QuizMsg::Next => {
                let Some(controller) = self.controller.as_mut() else {
                    return false;
                };
                match controller.navigate(Direction::Next) {
                    Ok(Some(transition)) => self.begin_transition(ctx, transition),
                    Ok(None) => {}
                    Err(e) => {
                        let focus = e.focus_key().map(str::to_string);
                        self.show_error(ctx, e.to_string(), focus.as_deref());
                    }
                }
                true
            }
            QuizMsg::Back => {
                let Some(controller) = self.controller.as_mut() else {
                    return false;
                };
                if let Ok(Some(transition)) = controller.navigate(Direction::Prev) {
                    self.begin_transition(ctx, transition);
                }
                true
            }
            QuizMsg::TransitionDone(transition) => self
                .controller
                .as_mut()
                .map_or(false, |c| c.complete_transition(transition)),
            QuizMsg::DismissError(seq) => {
                if matches!(self.error, Some((current, _)) if current == seq) {
                    self.error = None;
                    return true;
                }
                false
            }
            QuizMsg::Submit => {
                let Some(controller) = self.controller.as_mut() else {
                    return false;
                };
                let email = controller
                    .current_step()
                    .email_control()
                    .and_then(|c| controller.draft(&c.key))
                    .unwrap_or_default()
                    .to_string();

                match controller.submit(&email) {
                    Ok(submission) => {
                        ctx.link().send_future(async move {
                            QuizMsg::SubmissionSettled(
                                post_submission(config::get_webhook_url(), &submission.payload).await,
                            )
                        });
                        // The confirmation never waits for the webhook.
                        if let Some(plan) = controller.confirm() {
                            info!("Quiz confirmed, redirecting to {}", plan.url);
                            self.redirect = Some(plan);
                            self.progress = 100;
                            let link = ctx.link().clone();
                            Timeout::new(COUNTDOWN_START_DELAY_MS, move || {
                                link.send_message(QuizMsg::StartCountdown);
                            })
                            .forget();
                        }
                    }
                    Err(QuizError::Validation(e)) => {
                        let focus = e.focus_key().map(str::to_string);
                        let focus = focus.or_else(|| {
                            controller
                                .current_step()
                                .email_control()
                                .map(|c| c.key.clone())
                        });
                        self.show_error(ctx, e.to_string(), focus.as_deref());
                    }
                    Err(e) => warn!("Quiz submission refused: {}", e),
                }
                true
            }
            QuizMsg::SubmissionSettled(result) => {
                if let Err(e) = &result {
                    error!("Error submitting quiz: {}", e);
                }
                if let Some(controller) = self.controller.as_mut() {
                    controller.submission_settled(result);
                }
                false
            }
            QuizMsg::StartCountdown => {
                if let Some(plan) = &self.redirect {
                    let link = ctx.link().clone();
                    self.ticker = Some(Interval::new(plan.tick_ms(), move || {
                        link.send_message(QuizMsg::CountdownTick);
                    }));
                }
                false
            }
            QuizMsg::CountdownTick => {
                if self.ticker.is_none() {
                    return false;
                }
                if self.countdown.tick() {
                    self.ticker = None;
                    if let Some(plan) = &self.redirect {
                        if let Some(window) = window() {
                            let _ = window.location().set_href(&plan.url);
                        }
                    }
                }
                true
            }
            QuizMsg::Reveal => {
                self.shown = true;
                true
            }
            QuizMsg::BreedsLoaded(result) => {
                match &result {
                    Ok(breeds) => {
                        info!("Loaded {} dog breeds", breeds.len());
                        self.track(AnalyticsEvent::lifecycle("breeds_loaded").with("count", breeds.len()));
                    }
                    Err(e) => {
                        error!("Error loading dog breeds: {}", e);
                        self.track(
                            AnalyticsEvent::lifecycle("breeds_load_error").with("error", e.to_string()),
                        );
                    }
                }
                self.breeds.finish_load(result);
                true
            }
            QuizMsg::BreedFocus => {
                self.breeds.open();
                self.track(AnalyticsEvent::lifecycle("breed_search_focused"));
                true
            }
            QuizMsg::BreedSearch(term) => {
                self.breeds.filter(&term);
                self.track(AnalyticsEvent::lifecycle("breed_search").with("searchTerm", term.as_str()));
                if let Some(controller) = self.controller.as_mut() {
                    if let Err(e) = controller.edit_draft(BREED_KEY, &term) {
                        warn!("Ignoring breed search: {}", e);
                    }
                }
                true
            }
            QuizMsg::BreedSelect(breed) => {
                let value = self.breeds.select(&breed);
                self.capture(ctx, ControlInput::text(BREED_KEY, &value));
                self.track(AnalyticsEvent::lifecycle("breed_selected").with("breed", value));
                true
            }
            QuizMsg::BreedClose => {
                self.breeds.close();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(controller) = self.controller.as_ref() else {
            return html! {};
        };
        let confirmed = controller.phase() == Phase::Confirmed;

        html! {
            <div class={classes!("quiz-container", self.shown.then(|| "show"))}>
                if !confirmed {
                    <ProgressBar percent={self.progress} />
                }
                {
                    controller.config().steps.iter().enumerate()
                        .map(|(i, step)| self.render_step(ctx, controller, i, step))
                        .collect::<Html>()
                }
                if confirmed {
                    <ThankYou
                        title={personalize(&controller.config().thank_you.title, controller.answers())}
                        percent={self.countdown.percent()}
                    />
                }
            </div>
        }
    }
}

#[function_component(QuizPage)]
pub fn quiz_page() -> Html {
    let quiz_config = use_memo(|_| config::load_quiz_config(), ());

    html! {
        <section id="quiz" class="quiz-section">
            <Quiz config={quiz_config} />
        </section>
    }
}
