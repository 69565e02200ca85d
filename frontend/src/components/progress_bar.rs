use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::quiz::progress::ProgressTween;

const FRAME_MS: u32 = 16;

#[derive(Properties, PartialEq)]
pub struct ProgressBarProps {
    pub percent: u8,
    /// Glide to new values instead of jumping.
    #[prop_or(true)]
    pub animate: bool,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(ProgressBar)]
pub fn progress_bar(props: &ProgressBarProps) -> Html {
    let displayed = use_state_eq(|| 0u8);
    let shown = use_mut_ref(|| 0u8);
    let generation = use_mut_ref(|| 0u32);

    {
        let displayed = displayed.clone();
        let shown = shown.clone();
        let generation = generation.clone();
        let animate = props.animate;
        use_effect_with_deps(
            move |target: &u8| {
                let target = *target;
                *generation.borrow_mut() += 1;
                let run = *generation.borrow();

                if animate {
                    let tween = ProgressTween::new(*shown.borrow(), target);
                    let generation = generation.clone();
                    spawn_local(async move {
                        let mut elapsed = 0.0;
                        loop {
                            TimeoutFuture::new(FRAME_MS).await;
                            // A newer target took over.
                            if *generation.borrow() != run {
                                break;
                            }
                            elapsed += FRAME_MS as f64;
                            let value = tween.value_at(elapsed);
                            *shown.borrow_mut() = value;
                            displayed.set(value);
                            if tween.is_done(elapsed) {
                                break;
                            }
                        }
                    });
                } else {
                    *shown.borrow_mut() = target;
                    displayed.set(target);
                }

                move || {
                    *generation.borrow_mut() += 1;
                }
            },
            props.percent,
        );
    }

    let value = if props.animate { *displayed } else { props.percent };

    html! {
        <div class={classes!("progress-bar", props.class.clone())}>
            <div class="progress" style={format!("width: {}%;", value)}>
                <span>{format!("{}%", value)}</span>
            </div>
        </div>
    }
}
