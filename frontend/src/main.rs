use yew::prelude::*;
use yew_router::prelude::*;
use log::info;
use web_sys::MouseEvent;

mod behaviors;
mod config;
mod quiz;
mod components {
    pub mod breed_select;
    pub mod carousel;
    pub mod logo_strip;
    pub mod progress_bar;
    pub mod quiz;
    pub mod thank_you;
}
mod pages {
    pub mod home;
}

use behaviors::PageBehaviors;
use components::quiz::QuizPage;
use pages::home::Home;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/quiz")]
    Quiz,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::Quiz => {
            info!("Rendering Quiz page");
            html! { <QuizPage /> }
        },
        Route::NotFound => {
            info!("Unknown route, rendering Home page");
            html! { <Home /> }
        },
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    // Anchor clicks are scrolled by PageBehaviors; here the menu only closes.
    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(false))
    };

    let active = (*menu_open).then(|| "active");

    html! {
        <nav class="top-nav">
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"dogquiz"}
                </Link<Route>>

                <button class={classes!("burger-menu", active)} onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={classes!("nav-wrapper", active)} onclick={close_menu}>
                    <a href="#how-it-works" class="nav-link">{"How it works"}</a>
                    <a href="#stories" class="nav-link">{"Stories"}</a>
                    <a href="#quiz" class="nav-cta">{"Take the quiz"}</a>
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    let behaviors = use_mut_ref(PageBehaviors::default);

    {
        let behaviors = behaviors.clone();
        use_effect_with_deps(
            move |_| {
                if behaviors.borrow_mut().install() {
                    info!("Page behaviors installed");
                }
                move || behaviors.borrow_mut().uninstall()
            },
            (),
        );
    }

    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(config::log_level()) {
        web_sys::console::error_1(&format!("error initializing log: {}", e).into());
    }

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
