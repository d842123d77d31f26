use shared::calculator::{derive_currency_symbol, format_amount};
use shared::SalesSummaryResponse;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

mod components;
mod hooks;
mod services;
mod session;

use components::branding_form::BrandingForm;
use components::header::{Header, Tab};
use components::menu_page::{MenuManager, PublicMenuPreview};
use components::receipt_form::ReceiptForm;
use components::receipt_preview::ReceiptPreview;
use components::receipt_table::ReceiptTable;
use components::sales_chart::SalesChart;
use hooks::use_profile::use_profile;
use hooks::use_receipts::use_receipts;
use services::{ApiClient, Logger};
use session::Session;

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[function_component(App)]
fn app() -> Html {
    let api_client = ApiClient::new();
    // Explicit session value; components receive it by props, never
    // through ambient context
    let session = Session::local_vendor();

    let active_tab = use_state(|| Tab::Receipts);
    let profile = use_profile(&api_client, &session);
    let receipts = use_receipts(&api_client, &session);

    let summary = use_state(|| Option::<SalesSummaryResponse>::None);
    let summary_loading = use_state(|| false);

    let backend_connected = use_state(|| false);
    let backend_endpoint = use_state(|| String::from("Checking..."));

    // Initial load: probe the backend, then pull profile and receipts
    use_effect_with((), {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let backend_connected = backend_connected.clone();
        let backend_endpoint = backend_endpoint.clone();
        let reload_profile = profile.actions.reload.clone();
        let refresh_receipts = receipts.actions.refresh.clone();

        move |_| {
            spawn_local(async move {
                match api_client.test_connection(&vendor_id).await {
                    Ok(()) => {
                        backend_connected.set(true);
                        backend_endpoint.set("localhost:3000".to_string());
                        Logger::info_with_component("app", "Connected to backend");
                        reload_profile.emit(());
                        refresh_receipts.emit(());
                    }
                    Err(e) => {
                        backend_connected.set(false);
                        backend_endpoint.set("Connection failed".to_string());
                        Logger::error_with_component(
                            "app",
                            &format!("Failed to connect to backend: {}", e),
                        );
                    }
                }
            });

            || ()
        }
    });

    // Refresh the sales summary whenever the dashboard is opened
    use_effect_with(*active_tab, {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let summary = summary.clone();
        let summary_loading = summary_loading.clone();

        move |tab: &Tab| {
            if *tab == Tab::Dashboard {
                let api_client = api_client.clone();
                let vendor_id = vendor_id.clone();
                let summary = summary.clone();
                let summary_loading = summary_loading.clone();

                spawn_local(async move {
                    summary_loading.set(true);
                    match api_client.get_sales_summary(&vendor_id).await {
                        Ok(data) => summary.set(Some(data)),
                        Err(e) => Logger::error_with_component(
                            "app",
                            &format!("Failed to fetch sales summary: {}", e),
                        ),
                    }
                    summary_loading.set(false);
                });
            }

            || ()
        }
    });

    // The preview document: receipt fields from the editor, business
    // fields from the (possibly unsaved) branding form
    let mut document = receipts.form.document();
    document.business_name = non_empty(&profile.form.business_name);
    document.business_phone = non_empty(&profile.form.phone);
    document.tagline = non_empty(&profile.form.tagline);
    document.footer_message = non_empty(&profile.form.footer_message);

    let settings = profile.form.settings();
    let currency_symbol = derive_currency_symbol(&settings.currency);

    let on_select_tab = {
        let active_tab = active_tab.clone();
        Callback::from(move |tab: Tab| active_tab.set(tab))
    };

    html! {
        <>
            <Header
                business_name={non_empty(&profile.form.business_name)}
                accent_color={settings.accent_color.clone()}
                active_tab={*active_tab}
                on_select_tab={on_select_tab}
            />

            <main class="main">
                <div class="container">
                    {match *active_tab {
                        Tab::Receipts => html! {
                            <>
                                <div class="workspace">
                                    <ReceiptForm
                                        form={receipts.form.clone()}
                                        on_edit_field={receipts.actions.edit_field.clone()}
                                        on_set_status={receipts.actions.set_status.clone()}
                                        on_edit_item={receipts.actions.edit_item.clone()}
                                        on_add_item={receipts.actions.add_item.clone()}
                                        on_remove_item={receipts.actions.remove_item.clone()}
                                        on_save={receipts.actions.save.clone()}
                                    />
                                    <ReceiptPreview
                                        document={document.clone()}
                                        settings={settings.clone()}
                                        preview_mode={session.preview_mode()}
                                    />
                                </div>
                                <ReceiptTable
                                    receipts={receipts.list.receipts.clone()}
                                    loading={receipts.list.loading}
                                    currency_symbol={currency_symbol.clone()}
                                    has_more={receipts.list.has_more}
                                    on_load_more={receipts.actions.load_more.clone()}
                                    on_mark={receipts.actions.mark_receipt.clone()}
                                    on_delete={receipts.actions.delete_receipt.clone()}
                                />
                            </>
                        },
                        Tab::Dashboard => {
                            let (paid, pending, count) = summary
                                .as_ref()
                                .map(|s| (s.paid_total, s.pending_total, s.receipt_count))
                                .unwrap_or((0.0, 0.0, 0));
                            html! {
                                <>
                                    <div class="stat-cards">
                                        <div class="stat-card">
                                            <span class="stat-label">{"Collected"}</span>
                                            <span class="stat-value">
                                                {format!("{}{}", currency_symbol, format_amount(paid))}
                                            </span>
                                        </div>
                                        <div class="stat-card">
                                            <span class="stat-label">{"Outstanding"}</span>
                                            <span class="stat-value">
                                                {format!("{}{}", currency_symbol, format_amount(pending))}
                                            </span>
                                        </div>
                                        <div class="stat-card">
                                            <span class="stat-label">{"Receipts"}</span>
                                            <span class="stat-value">{count}</span>
                                        </div>
                                    </div>
                                    <SalesChart
                                        summary={(*summary).clone()}
                                        loading={*summary_loading}
                                    />
                                </>
                            }
                        },
                        Tab::Menu => html! {
                            <div class="workspace">
                                <MenuManager
                                    api_client={api_client.clone()}
                                    vendor_id={session.vendor_id.clone()}
                                />
                                <PublicMenuPreview
                                    api_client={api_client.clone()}
                                    slug={profile.profile.as_ref()
                                        .map(|p| p.slug.clone())
                                        .unwrap_or_default()}
                                />
                            </div>
                        },
                        Tab::Settings => html! {
                            <div class="workspace">
                                <BrandingForm
                                    form={profile.form.clone()}
                                    on_edit={profile.actions.edit.clone()}
                                    on_toggle_logo={profile.actions.set_show_logo.clone()}
                                    on_set_template={profile.actions.set_template.clone()}
                                    on_save={profile.actions.save.clone()}
                                />
                                <ReceiptPreview
                                    document={document.clone()}
                                    settings={settings.clone()}
                                    preview_mode={session.preview_mode()}
                                    show_actions={false}
                                />
                            </div>
                        },
                    }}
                </div>
            </main>

            <div class="connection-status">
                {if *backend_connected {
                    format!("Connected to {}", *backend_endpoint)
                } else {
                    (*backend_endpoint).clone()
                }}
            </div>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
