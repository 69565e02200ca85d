use super::answers::AnswerMap;
use super::definition::{ControlSpec, StepSpec};
use super::error::ValidationError;

pub fn control_is_filled(control: &ControlSpec, answers: &AnswerMap) -> bool {
    match answers.get(&control.key) {
        Some(answer) => !answer.is_blank(),
        None => false,
    }
}

/// Checks every required control of `step`, reporting the first empty one.
///
/// Grouped controls pass when at least one option is picked, text-like
/// controls when their trimmed value is non-empty.
pub fn validate_step(step: &StepSpec, answers: &AnswerMap) -> Result<(), ValidationError> {
    match step
        .controls
        .iter()
        .filter(|c| c.required)
        .find(|c| !control_is_filled(c, answers))
    {
        Some(control) => Err(ValidationError::MissingField {
            key: control.key.clone(),
        }),
        None => Ok(()),
    }
}
