use shared::{CreateMenuItemRequest, MenuItem, PublicMenuResponse, RawPrice};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::{ApiClient, Logger};

fn raw_price_text(price: &RawPrice) -> String {
    match price {
        RawPrice::Number(n) => format!("{}", n),
        RawPrice::Text(t) => t.clone(),
    }
}

#[derive(Properties, PartialEq)]
pub struct MenuManagerProps {
    pub api_client: ApiClient,
    pub vendor_id: String,
}

/// Editor for the items shown on the public menu page
#[function_component(MenuManager)]
pub fn menu_manager(props: &MenuManagerProps) -> Html {
    let items = use_state(Vec::<MenuItem>::new);
    let loading = use_state(|| true);
    let name = use_state(String::new);
    let description = use_state(String::new);
    let price = use_state(String::new);
    let submitting = use_state(|| false);
    let form_error = use_state(|| Option::<String>::None);

    let refresh = {
        let api_client = props.api_client.clone();
        let vendor_id = props.vendor_id.clone();
        let items = items.clone();
        let loading = loading.clone();

        Callback::from(move |_: ()| {
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let items = items.clone();
            let loading = loading.clone();

            spawn_local(async move {
                match api_client.get_menu_items(&vendor_id).await {
                    Ok(data) => items.set(data.items),
                    Err(e) => Logger::error_with_component(
                        "menu_manager",
                        &format!("Failed to fetch menu items: {}", e),
                    ),
                }
                loading.set(false);
            });
        })
    };

    use_effect_with((), {
        let refresh = refresh.clone();
        move |_| {
            refresh.emit(());
            || ()
        }
    });

    let add_item = {
        let api_client = props.api_client.clone();
        let vendor_id = props.vendor_id.clone();
        let name = name.clone();
        let description = description.clone();
        let price = price.clone();
        let submitting = submitting.clone();
        let form_error = form_error.clone();
        let refresh = refresh.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let name = name.clone();
            let description = description.clone();
            let price = price.clone();
            let submitting = submitting.clone();
            let form_error = form_error.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                submitting.set(true);
                form_error.set(None);

                let request = CreateMenuItemRequest {
                    name: (*name).clone(),
                    description: if description.trim().is_empty() {
                        None
                    } else {
                        Some((*description).clone())
                    },
                    price: RawPrice::Text((*price).clone()),
                };

                match api_client.create_menu_item(&vendor_id, request).await {
                    Ok(_) => {
                        name.set(String::new());
                        description.set(String::new());
                        price.set(String::new());
                        refresh.emit(());
                    }
                    Err(e) => form_error.set(Some(e)),
                }
                submitting.set(false);
            });
        })
    };

    let text_state_input = |state: &UseStateHandle<String>, placeholder: &str| -> Html {
        let value = (**state).clone();
        let setter = state.clone();
        let onchange = Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            setter.set(input.value());
        });
        html! {
            <input
                type="text"
                placeholder={placeholder.to_string()}
                {value}
                {onchange}
                disabled={*submitting}
            />
        }
    };

    html! {
        <section class="menu-manager-section">
            <h2>{"Menu Items"}</h2>

            {if let Some(error) = form_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="menu-item-form" onsubmit={add_item}>
                {text_state_input(&name, "Item name")}
                {text_state_input(&description, "Description (optional)")}
                {text_state_input(&price, "Price")}
                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Adding..." } else { "Add item" }}
                </button>
            </form>

            {if *loading {
                html! { <div class="loading">{"Loading menu..."}</div> }
            } else if items.is_empty() {
                html! { <div class="empty-state">{"No menu items yet."}</div> }
            } else {
                html! {
                    <ul class="menu-item-list">
                        {for items.iter().map(|item| {
                            let on_delete = {
                                let api_client = props.api_client.clone();
                                let vendor_id = props.vendor_id.clone();
                                let item_id = item.id.clone();
                                let refresh = refresh.clone();
                                Callback::from(move |_| {
                                    let api_client = api_client.clone();
                                    let vendor_id = vendor_id.clone();
                                    let item_id = item_id.clone();
                                    let refresh = refresh.clone();
                                    spawn_local(async move {
                                        match api_client.delete_menu_item(&vendor_id, &item_id).await {
                                            Ok(()) => refresh.emit(()),
                                            Err(e) => Logger::error_with_component(
                                                "menu_manager",
                                                &format!("Failed to delete item: {}", e),
                                            ),
                                        }
                                    });
                                })
                            };

                            html! {
                                <li class="menu-item-row" key={item.id.clone()}>
                                    <span class="menu-item-name">{&item.name}</span>
                                    {if let Some(desc) = item.description.as_ref() {
                                        html! { <span class="menu-item-desc">{desc}</span> }
                                    } else { html! {} }}
                                    <span class="menu-item-price">
                                        {raw_price_text(&item.price)}
                                    </span>
                                    <button class="btn btn-small btn-danger" onclick={on_delete}>
                                        {"Remove"}
                                    </button>
                                </li>
                            }
                        })}
                    </ul>
                }
            }}
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct PublicMenuPreviewProps {
    pub api_client: ApiClient,
    /// Slug of the profile being previewed; empty until a profile is saved
    pub slug: String,
}

/// What an unauthenticated visitor sees when scanning the menu QR code
#[function_component(PublicMenuPreview)]
pub fn public_menu_preview(props: &PublicMenuPreviewProps) -> Html {
    let menu = use_state(|| Option::<PublicMenuResponse>::None);
    let loading = use_state(|| false);

    use_effect_with(props.slug.clone(), {
        let api_client = props.api_client.clone();
        let menu = menu.clone();
        let loading = loading.clone();

        move |slug: &String| {
            let slug = slug.clone();
            if !slug.is_empty() {
                let api_client = api_client.clone();
                let menu = menu.clone();
                let loading = loading.clone();
                spawn_local(async move {
                    loading.set(true);
                    match api_client.get_public_menu(&slug).await {
                        Ok(found) => menu.set(found),
                        Err(e) => Logger::error_with_component(
                            "public_menu",
                            &format!("Failed to fetch public menu: {}", e),
                        ),
                    }
                    loading.set(false);
                });
            }
            || ()
        }
    });

    html! {
        <section class="public-menu-section">
            <h2>{"Public Page Preview"}</h2>

            {if props.slug.is_empty() {
                html! {
                    <div class="empty-state">
                        {"Save your profile to claim a menu address."}
                    </div>
                }
            } else if *loading {
                html! { <div class="loading">{"Loading public menu..."}</div> }
            } else if let Some(menu) = menu.as_ref() {
                html! {
                    <div class="public-menu-card">
                        <div
                            class="public-menu-header"
                            style={format!("background: {};", menu.accent_color)}
                        >
                            <h3>{&menu.business_name}</h3>
                            {if let Some(tagline) = menu.tagline.as_ref() {
                                html! { <p>{tagline}</p> }
                            } else { html! {} }}
                        </div>
                        {if menu.items.is_empty() {
                            html! { <div class="empty-state">{"No items on this menu yet."}</div> }
                        } else {
                            html! {
                                <ul class="public-menu-items">
                                    {for menu.items.iter().map(|item| html! {
                                        <li class="public-menu-item">
                                            <div>
                                                <span class="menu-item-name">{&item.name}</span>
                                                {if let Some(desc) = item.description.as_ref() {
                                                    html! { <p class="menu-item-desc">{desc}</p> }
                                                } else { html! {} }}
                                            </div>
                                            <span class="menu-item-price">{&item.price}</span>
                                        </li>
                                    })}
                                </ul>
                            }
                        }}
                        {if let Some(phone) = menu.phone.as_ref() {
                            html! { <p class="public-menu-phone">{format!("☎ {}", phone)}</p> }
                        } else { html! {} }}
                        <p class="public-menu-link">{format!("Shared at /menu/{}", props.slug)}</p>
                    </div>
                }
            } else {
                html! { <div class="empty-state">{"Menu not found."}</div> }
            }}
        </section>
    }
}
