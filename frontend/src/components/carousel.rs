use log::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Array;
use web_sys::{
    Element, HtmlElement, HtmlMediaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};
use yew::prelude::*;

use crate::behaviors::{
    carousel_has_controls, next_scroll_delta, prev_scroll_delta, video_mode, viewport_width,
    ItemBox, VideoMode, VIDEO_VISIBLE_THRESHOLD,
};

#[derive(Clone, PartialEq)]
pub struct CarouselItem {
    pub title: String,
    pub video_src: String,
}

impl CarouselItem {
    pub fn new(title: &str, video_src: &str) -> Self {
        Self {
            title: title.to_string(),
            video_src: video_src.to_string(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct CarouselProps {
    pub items: Vec<CarouselItem>,
}

fn item_boxes(container: &Element) -> Vec<ItemBox> {
    let mut boxes = Vec::new();
    if let Ok(items) = container.query_selector_all(".itemsC") {
        for i in 0..items.length() {
            if let Some(item) = items.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                boxes.push(ItemBox {
                    left: item.get_bounding_client_rect().left(),
                    width: item.offset_width() as f64,
                });
            }
        }
    }
    boxes
}

type VisibilityCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Pauses videos that scroll out of view; narrow screens also start the
/// ones scrolling in.
fn observe_videos(container: &Element) -> Option<(IntersectionObserver, VisibilityCallback)> {
    let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
        let mode = video_mode(viewport_width());
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let Ok(video) = entry.target().dyn_into::<HtmlMediaElement>() else {
                continue;
            };
            if !entry.is_intersecting() {
                let _ = video.pause();
            } else if mode == VideoMode::Autoplay {
                let _ = video.play();
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_root_margin("0px");
    init.set_threshold(&VIDEO_VISIBLE_THRESHOLD.into());

    let observer = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => observer,
        Err(e) => {
            warn!("IntersectionObserver unavailable: {:?}", e);
            return None;
        }
    };

    if let Ok(videos) = container.query_selector_all(".myVideo") {
        for i in 0..videos.length() {
            if let Some(video) = videos.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                observer.observe(&video);
            }
        }
    }
    Some((observer, callback))
}

#[derive(Properties, PartialEq)]
struct CarouselVideoProps {
    item: CarouselItem,
}

#[function_component(CarouselVideo)]
fn carousel_video(props: &CarouselVideoProps) -> Html {
    let video_ref = use_node_ref();
    let muted = use_state(|| true);

    let toggle_sound = {
        let video_ref = video_ref.clone();
        let muted = muted.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            let next = !*muted;
            if let Some(video) = video_ref.cast::<HtmlMediaElement>() {
                video.set_muted(next);
            }
            info!("Video {}", if next { "muted" } else { "unmuted" });
            muted.set(next);
        })
    };

    let onmouseover = {
        let video_ref = video_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if video_mode(viewport_width()) == VideoMode::Hover {
                if let Some(video) = video_ref.cast::<HtmlMediaElement>() {
                    let _ = video.play();
                }
            }
        })
    };

    let onmouseout = {
        let video_ref = video_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if video_mode(viewport_width()) == VideoMode::Hover {
                if let Some(video) = video_ref.cast::<HtmlMediaElement>() {
                    let _ = video.pause();
                }
            }
        })
    };

    html! {
        <div class="itemsC">
            <video
                ref={video_ref}
                class="myVideo"
                src={props.item.video_src.clone()}
                muted={true}
                loop={true}
                playsinline={true}
                {onmouseover}
                {onmouseout}
            />
            <button class={classes!("soundButton", (*muted).then(|| "muted"))} onclick={toggle_sound}>
                <i class={if *muted { "fas fa-volume-mute" } else { "fas fa-volume-up" }}></i>
            </button>
            <p class="item-title">{&props.item.title}</p>
        </div>
    }
}

#[function_component(Carousel)]
pub fn carousel(props: &CarouselProps) -> Html {
    let container = use_node_ref();

    {
        let container = container.clone();
        use_effect_with_deps(
            move |_| {
                let observed = container.cast::<Element>().and_then(|el| observe_videos(&el));
                move || {
                    if let Some((observer, _callback)) = observed {
                        observer.disconnect();
                    }
                }
            },
            props.items.len(),
        );
    }

    let scroll_by = |forward: bool| {
        let container = container.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let Some(el) = container.cast::<Element>() else {
                return;
            };
            let boxes = item_boxes(&el);
            let left = el.get_bounding_client_rect().left();
            let delta = if forward {
                next_scroll_delta(&boxes, left)
            } else {
                prev_scroll_delta(&boxes, left)
            };
            if let Some(delta) = delta {
                el.scroll_by_with_x_and_y(delta, 0.0);
            }
        })
    };

    let scroll_back = scroll_by(false);
    let scroll_forward = scroll_by(true);

    let controls_style = if carousel_has_controls(props.items.len()) {
        ""
    } else {
        "display: none;"
    };

    html! {
        <div class="scrolly">
            <button id="left" class="carousel-button" style={controls_style} onclick={scroll_back}>
                {"‹"}
            </button>
            <div class="carouselPre" ref={container}>
                {
                    props.items.iter().map(|item| html! {
                        <CarouselVideo key={item.video_src.clone()} item={item.clone()} />
                    }).collect::<Html>()
                }
            </div>
            <button id="right" class="carousel-button" style={controls_style} onclick={scroll_forward}>
                {"›"}
            </button>
        </div>
    }
}
