use yew::prelude::*;

use crate::components::progress_bar::ProgressBar;

#[derive(Properties, PartialEq)]
pub struct ThankYouProps {
    pub title: String,
    /// Fill of the redirect countdown bar.
    pub percent: u8,
}

#[function_component(ThankYou)]
pub fn thank_you(props: &ThankYouProps) -> Html {
    html! {
        <div class="quiz-thank-you-screen" style="display: block;">
            <h2>{&props.title}</h2>
            <p>{"Hang tight, we're taking you to your personalised plan."}</p>
            <ProgressBar
                class={classes!("progress-bar-thank-you")}
                percent={props.percent}
                animate={false}
            />
        </div>
    }
}
