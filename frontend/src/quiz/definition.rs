use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::answers::AnswerMap;
use super::error::ConfigError;

pub const DOG_NAME_PLACEHOLDER: &str = "[dog_name]";
pub const DOG_NAME_KEY: &str = "dogName";
pub const BREED_KEY: &str = "breed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    Text {
        #[serde(default)]
        placeholder: String,
    },
    Email {
        #[serde(default)]
        placeholder: String,
    },
    Select {
        options: Vec<ChoiceOption>,
    },
    /// Free text backed by the remote breed list.
    Breed,
    Radio {
        options: Vec<ChoiceOption>,
        /// Move to the next step as soon as an option is picked.
        #[serde(default = "default_true")]
        advance: bool,
    },
    Checkbox {
        options: Vec<ChoiceOption>,
        /// Option that excludes every other option of the group.
        #[serde(default)]
        exclusive: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub kind: ControlKind,
    #[serde(default = "default_true")]
    pub required: bool,
}

impl ControlSpec {
    pub fn new(key: &str, label: &str, kind: ControlKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// DOM id used to focus the control after a failed validation.
    pub fn dom_id(&self) -> String {
        format!("quiz-control-{}", self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Analytics tag sent when the user leaves this step.
    #[serde(default)]
    pub ga_event: Option<String>,
    /// Next is never blocked by validation on this step.
    #[serde(default)]
    pub free_pass: bool,
    #[serde(default)]
    pub controls: Vec<ControlSpec>,
}

impl StepSpec {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: String::new(),
            ga_event: None,
            free_pass: false,
            controls: Vec::new(),
        }
    }

    pub fn subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = subtitle.to_string();
        self
    }

    pub fn tagged(mut self, ga_event: &str) -> Self {
        self.ga_event = Some(ga_event.to_string());
        self
    }

    pub fn free_pass(mut self) -> Self {
        self.free_pass = true;
        self
    }

    pub fn control(mut self, control: ControlSpec) -> Self {
        self.controls.push(control);
        self
    }

    pub fn email_control(&self) -> Option<&ControlSpec> {
        self.controls
            .iter()
            .find(|c| matches!(c.kind, ControlKind::Email { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThankYouSpec {
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u32,
    #[serde(default = "default_problem_key")]
    pub problem_key: String,
    #[serde(default)]
    pub title: String,
}

impl Default for ThankYouSpec {
    fn default() -> Self {
        Self {
            redirect_url: default_redirect_url(),
            redirect_delay_ms: default_redirect_delay(),
            problem_key: default_problem_key(),
            title: "Thank you! We're preparing your results".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    pub steps: Vec<StepSpec>,
    #[serde(default)]
    pub thank_you: ThankYouSpec,
}

fn default_true() -> bool {
    true
}

fn default_redirect_url() -> String {
    "/pages/quiz".to_string()
}

fn default_redirect_delay() -> u32 {
    3000
}

fn default_problem_key() -> String {
    "problem".to_string()
}

impl QuizConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: QuizConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let last = self.steps.last().ok_or(ConfigError::NoSteps)?;

        let mut seen = HashSet::new();
        for control in self.steps.iter().flat_map(|s| s.controls.iter()) {
            if !seen.insert(control.key.as_str()) {
                return Err(ConfigError::DuplicateKey(control.key.clone()));
            }
            if let ControlKind::Checkbox {
                options,
                exclusive: Some(exclusive),
            } = &control.kind
            {
                if !options.iter().any(|o| &o.value == exclusive) {
                    return Err(ConfigError::UnknownExclusive {
                        key: control.key.clone(),
                        option: exclusive.clone(),
                    });
                }
            }
        }

        if last.email_control().is_none() {
            return Err(ConfigError::MissingEmailControl);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn control(&self, key: &str) -> Option<&ControlSpec> {
        self.steps
            .iter()
            .flat_map(|s| s.controls.iter())
            .find(|c| c.key == key)
    }

    /// The built-in dog health quiz.
    pub fn dog_quiz() -> Self {
        let problems = vec![
            ChoiceOption::new("itching", "Itching & scratching"),
            ChoiceOption::new("digestion", "Digestion"),
            ChoiceOption::new("joints", "Joints & mobility"),
            ChoiceOption::new("dental", "Teeth & breath"),
        ];
        let weights = vec![
            ChoiceOption::new("small", "Under 10 kg"),
            ChoiceOption::new("medium", "10 - 25 kg"),
            ChoiceOption::new("large", "Over 25 kg"),
        ];
        let dental = vec![
            ChoiceOption::new("bad_breath", "Bad breath"),
            ChoiceOption::new("tartar", "Tartar"),
            ChoiceOption::new("red_gums", "Red gums"),
            ChoiceOption::new("none", "None of these"),
        ];
        let health = vec![
            ChoiceOption::new("healthy", "Very healthy"),
            ChoiceOption::new("some_issues", "Some issues"),
            ChoiceOption::new("chronic", "Chronic condition"),
        ];

        QuizConfig {
            steps: vec![
                StepSpec::new("problem", "What would you like to improve?")
                    .tagged("quiz_step_problem")
                    .control(ControlSpec::new(
                        "problem",
                        "",
                        ControlKind::Radio {
                            options: problems,
                            advance: true,
                        },
                    )),
                StepSpec::new("name", "What's your dog's name?")
                    .tagged("quiz_step_name")
                    .control(ControlSpec::new(
                        DOG_NAME_KEY,
                        "Name",
                        ControlKind::Text {
                            placeholder: "e.g. Bella".to_string(),
                        },
                    )),
                StepSpec::new("breed", "What breed is [dog_name]?")
                    .tagged("quiz_step_breed")
                    .control(ControlSpec::new(BREED_KEY, "Breed", ControlKind::Breed)),
                StepSpec::new("weight", "How much does [dog_name] weigh?")
                    .tagged("quiz_step_weight")
                    .control(ControlSpec::new(
                        "weight",
                        "",
                        ControlKind::Radio {
                            options: weights,
                            advance: true,
                        },
                    )),
                StepSpec::new("dental", "Does [dog_name] have any of these?")
                    .subtitle("Select all that apply")
                    .tagged("quiz_step_dental")
                    .control(ControlSpec::new(
                        "dental",
                        "",
                        ControlKind::Checkbox {
                            options: dental,
                            exclusive: Some("none".to_string()),
                        },
                    )),
                StepSpec::new("health", "How would you describe [dog_name]'s health?")
                    .tagged("quiz_step_health")
                    .control(ControlSpec::new(
                        "health",
                        "",
                        ControlKind::Radio {
                            options: health,
                            advance: true,
                        },
                    )),
                StepSpec::new("insight", "Good news: small changes go a long way")
                    .subtitle("Most dogs show results within a few weeks.")
                    .tagged("quiz_step_insight")
                    .free_pass(),
                StepSpec::new("email", "Where should we send [dog_name]'s plan?")
                    .tagged("quiz_submit")
                    .control(ControlSpec::new(
                        "email",
                        "Email",
                        ControlKind::Email {
                            placeholder: "you@example.com".to_string(),
                        },
                    )),
            ],
            thank_you: ThankYouSpec::default(),
        }
    }
}

/// Replaces the dog name placeholder with the captured name.
pub fn personalize(template: &str, answers: &AnswerMap) -> String {
    let name = answers
        .text(DOG_NAME_KEY)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("your dog");
    template.replace(DOG_NAME_PLACEHOLDER, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_quiz_is_valid() {
        let config = QuizConfig::dog_quiz();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.control(BREED_KEY).is_some());
    }

    #[test]
    fn parses_json_config_with_defaults() {
        let raw = r#"{
            "steps": [
                { "id": "a", "title": "Pick", "ga_event": "step_a",
                  "controls": [ { "key": "pick", "type": "radio",
                                  "options": [ { "value": "x", "label": "X" } ] } ] },
                { "id": "b", "title": "Mail",
                  "controls": [ { "key": "email", "type": "email" } ] }
            ],
            "thank_you": { "redirect_url": "/thanks" }
        }"#;

        let config = QuizConfig::from_json(raw).unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config.thank_you.redirect_url, "/thanks");
        assert_eq!(config.thank_you.redirect_delay_ms, 3000);

        let pick = config.control("pick").unwrap();
        assert!(pick.required);
        assert_eq!(
            pick.kind,
            ControlKind::Radio {
                options: vec![ChoiceOption::new("x", "X")],
                advance: true,
            }
        );
    }

    #[test]
    fn rejects_broken_configs() {
        assert_eq!(
            QuizConfig::from_json(r#"{ "steps": [] }"#),
            Err(ConfigError::NoSteps)
        );

        let no_email = r#"{ "steps": [ { "id": "a", "title": "A" } ] }"#;
        assert_eq!(
            QuizConfig::from_json(no_email),
            Err(ConfigError::MissingEmailControl)
        );

        let mut config = QuizConfig::dog_quiz();
        config.steps[1]
            .controls
            .push(ControlSpec::new("problem", "", ControlKind::Breed));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateKey("problem".into()))
        );
    }

    #[test]
    fn personalizes_titles() {
        let mut answers = AnswerMap::new();
        assert_eq!(
            personalize("What breed is [dog_name]?", &answers),
            "What breed is your dog?"
        );

        answers.set_single(DOG_NAME_KEY, " Bella ").unwrap();
        assert_eq!(
            personalize("What breed is [dog_name]?", &answers),
            "What breed is Bella?"
        );
    }
}
