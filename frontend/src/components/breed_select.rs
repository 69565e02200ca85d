use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::quiz::breeds::BreedCatalog;

#[derive(Properties, PartialEq)]
pub struct BreedSelectProps {
    pub id: String,
    pub value: String,
    pub catalog: BreedCatalog,
    pub on_focus: Callback<()>,
    pub on_search: Callback<String>,
    pub on_select: Callback<String>,
    pub on_close: Callback<()>,
}

#[function_component(BreedSelect)]
pub fn breed_select(props: &BreedSelectProps) -> Html {
    let onfocus = {
        let on_focus = props.on_focus.clone();
        Callback::from(move |_: FocusEvent| on_focus.emit(()))
    };

    let oninput = {
        let on_search = props.on_search.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_search.emit(input.value());
        })
    };

    // Leaving the field counts as a click outside the list.
    let onblur = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: FocusEvent| on_close.emit(()))
    };

    let options_style = if props.catalog.is_open() {
        "display: block;"
    } else {
        "display: none;"
    };

    html! {
        <div class="breed-select-wrapper">
            <input
                id={props.id.clone()}
                class="breed-select"
                type="text"
                autocomplete="off"
                placeholder="Start typing a breed"
                value={props.value.clone()}
                {onfocus}
                {oninput}
                {onblur}
            />
            <div class="breed-select-options" style={options_style}>
                {
                    props.catalog.visibility().into_iter().map(|(breed, visible)| {
                        let on_select = props.on_select.clone();
                        let picked = breed.to_string();
                        // mousedown fires before the input loses focus
                        let onmousedown = Callback::from(move |e: MouseEvent| {
                            e.prevent_default();
                            on_select.emit(picked.clone());
                        });
                        html! {
                            <div
                                key={breed.to_string()}
                                class="breed-option"
                                style={if visible { "display: block;" } else { "display: none;" }}
                                {onmousedown}
                            >
                                {breed}
                            </div>
                        }
                    }).collect::<Html>()
                }
            </div>
        </div>
    }
}
