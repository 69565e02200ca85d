use yew::prelude::*;

use crate::components::carousel::{Carousel, CarouselItem};
use crate::components::logo_strip::{Logo, LogoStrip};
use crate::components::quiz::QuizPage;

fn testimonials() -> Vec<CarouselItem> {
    vec![
        CarouselItem::new("Milo, 9, finally back on walks", "/assets/videos/milo.mp4"),
        CarouselItem::new("Luna's breath after two weeks", "/assets/videos/luna.mp4"),
        CarouselItem::new("Bruno lost 3 kg this spring", "/assets/videos/bruno.mp4"),
        CarouselItem::new("Daisy stopped scratching", "/assets/videos/daisy.mp4"),
        CarouselItem::new("Rex at his first vet check-up", "/assets/videos/rex.mp4"),
    ]
}

fn press_logos() -> Vec<Logo> {
    ["dogster", "rover", "akc", "petmd", "bark"]
        .iter()
        .map(|name| Logo::new(name, &format!("/assets/logos/{}.svg", name)))
        .collect()
}

#[function_component]
pub fn Home() -> Html {
    // Scroll to top only on initial mount
    use_effect_with_deps(
        move |_| {
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
            || ()
        },
        (),
    );

    html! {
        <>
            <header class="hero">
                <div class="hero-background"></div>
                <div class="hero-content">
                    <h1>{"A plan built around your dog"}</h1>
                    <p class="hero-subtitle">
                        {"Answer a few questions and get supplement and care advice for your dog's breed, weight and health."}
                    </p>
                    <div class="hero-cta-group">
                        <a href="#quiz" class="hero-cta">{"Take the quiz"}</a>
                    </div>
                </div>
            </header>

            <section class="press animate-on-scroll">
                <p class="press-title">{"As seen in"}</p>
                <LogoStrip logos={press_logos()} />
            </section>

            <section id="stories" class="stories animate-on-scroll">
                <h2>{"Dogs and their people"}</h2>
                <Carousel items={testimonials()} />
            </section>

            <section id="how-it-works" class="how-it-works animate-on-scroll">
                <h2>{"How it works"}</h2>
                <div class="steps">
                    <div class="step">
                        <h3>{"1. Tell us about your dog"}</h3>
                        <p>{"Breed, weight and what worries you most."}</p>
                    </div>
                    <div class="step">
                        <h3>{"2. Get your plan"}</h3>
                        <p>{"We match the answers to the care your dog needs."}</p>
                    </div>
                    <div class="step">
                        <h3>{"3. See the difference"}</h3>
                        <p>{"Most owners notice a change within a few weeks."}</p>
                    </div>
                </div>
                <a href="#quiz" class="hero-cta">{"Start now"}</a>
            </section>

            <QuizPage />
        </>
    }
}
