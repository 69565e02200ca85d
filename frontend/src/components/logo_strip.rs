use log::debug;
use web_sys::Element;
use yew::prelude::*;

use crate::behaviors::ticker_duration_secs;

#[derive(Clone, PartialEq)]
pub struct Logo {
    pub name: String,
    pub src: String,
}

impl Logo {
    pub fn new(name: &str, src: &str) -> Self {
        Self {
            name: name.to_string(),
            src: src.to_string(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LogoStripProps {
    pub logos: Vec<Logo>,
}

/// Endless ticker of press logos. The list is rendered twice so the CSS
/// animation can wrap at the halfway point without a gap.
#[function_component(LogoStrip)]
pub fn logo_strip(props: &LogoStripProps) -> Html {
    let track = use_node_ref();

    {
        let track = track.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(el) = track.cast::<Element>() {
                    let secs = ticker_duration_secs(el.scroll_width() as f64);
                    debug!("Logo ticker runs {:.1}s per pass", secs);
                    let _ = el.set_attribute("style", &format!("animation-duration: {}s;", secs));
                }
                || ()
            },
            props.logos.len(),
        );
    }

    html! {
        <div class="logos">
            <div class="logos-slide" ref={track}>
                {
                    (0..2).flat_map(|pass| {
                        props.logos.iter().map(move |logo| html! {
                            <img
                                key={format!("{}-{}", pass, logo.name)}
                                src={logo.src.clone()}
                                alt={logo.name.clone()}
                                aria-hidden={if pass == 0 { "false" } else { "true" }}
                            />
                        })
                    }).collect::<Html>()
                }
            </div>
        </div>
    }
}
