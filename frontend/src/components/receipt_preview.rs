use shared::render::{build_layout, LogoBlock, ReceiptLayout};
use shared::{PresentationSettings, ReceiptDocument};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::{capture, Logger};

#[derive(Properties, PartialEq)]
pub struct ReceiptPreviewProps {
    pub document: ReceiptDocument,
    pub settings: PresentationSettings,
    /// Explicit flag, not inferred from ambient state; tiles a watermark
    /// over the on-screen preview only
    pub preview_mode: bool,
    /// Hide download/share for read-only embeddings
    #[prop_or(true)]
    pub show_actions: bool,
}

fn logo_html(logo: &Option<LogoBlock>, accent_color: &str) -> Html {
    match logo {
        Some(LogoBlock::Image(url)) => html! {
            <img class="receipt-logo" src={url.clone()} alt="logo" />
        },
        Some(LogoBlock::Monogram(letter)) => html! {
            <div
                class="receipt-monogram"
                style={format!("background: {};", accent_color)}
            >
                {letter}
            </div>
        },
        None => html! {},
    }
}

fn document_html(layout: &ReceiptLayout) -> Html {
    html! {
        <>
            // Diagonal watermark for pending receipts; cosmetic only
            {if let Some(text) = layout.status_watermark.as_ref() {
                html! { <div class="status-watermark">{text}</div> }
            } else { html! {} }}

            <div class="receipt-header">
                {logo_html(&layout.header.logo, &layout.accent_color)}
                <div class="receipt-business">
                    <h2 style={format!("color: {};", layout.accent_color)}>
                        {&layout.header.business_name}
                    </h2>
                    {if let Some(tagline) = layout.header.tagline.as_ref() {
                        html! { <p class="receipt-tagline">{tagline}</p> }
                    } else { html! {} }}
                    {if let Some(phone) = layout.header.phone.as_ref() {
                        html! { <p class="receipt-phone">{phone}</p> }
                    } else { html! {} }}
                </div>
            </div>

            <div class="receipt-meta">
                <div class="billed-to">
                    <span class="meta-label">{"Billed To"}</span>
                    <span class="meta-value">{&layout.meta.customer_name}</span>
                </div>
                <div class="receipt-ref">
                    <span class="meta-value">{format!("#{}", layout.meta.receipt_number)}</span>
                    <span class="meta-label">{&layout.meta.date}</span>
                </div>
            </div>

            <div class="receipt-items">
                {for layout.items.iter().map(|row| html! {
                    <div class="receipt-item-row">
                        <div class="receipt-item-main">
                            <span class="item-name">{&row.name}</span>
                            <span class="item-amount">{&row.amount}</span>
                        </div>
                        {if let Some(detail) = row.detail.as_ref() {
                            html! { <div class="receipt-item-detail">{detail}</div> }
                        } else { html! {} }}
                    </div>
                })}
            </div>

            <div class="receipt-totals">
                {for layout.totals.iter().map(|line| {
                    if line.emphasize {
                        html! {
                            <div
                                class="total-line emphasized"
                                style={format!("color: {};", layout.accent_color)}
                            >
                                <strong>{&line.label}</strong>
                                <strong>{&line.amount}</strong>
                            </div>
                        }
                    } else {
                        html! {
                            <div class="total-line">
                                <span>{&line.label}</span>
                                <span>{&line.amount}</span>
                            </div>
                        }
                    }
                })}
            </div>

            {if let Some(footer) = layout.footer_message.as_ref() {
                html! { <p class="receipt-footer">{footer}</p> }
            } else { html! {} }}
        </>
    }
}

#[function_component(ReceiptPreview)]
pub fn receipt_preview(props: &ReceiptPreviewProps) -> Html {
    let layout = build_layout(&props.document, &props.settings, props.preview_mode);
    let document_node = use_node_ref();
    let capturing = use_state(|| false);
    let action_error = use_state(|| Option::<String>::None);

    let capture_then = {
        let document_node = document_node.clone();
        let capturing = capturing.clone();
        let action_error = action_error.clone();
        let receipt_number = layout.meta.receipt_number.clone();

        move |share: bool| {
            let document_node = document_node.clone();
            let capturing = capturing.clone();
            let action_error = action_error.clone();
            let receipt_number = receipt_number.clone();

            Callback::from(move |_| {
                let node = match document_node.cast::<web_sys::HtmlElement>() {
                    Some(node) => node,
                    None => return,
                };
                let capturing = capturing.clone();
                let action_error = action_error.clone();
                let receipt_number = receipt_number.clone();

                spawn_local(async move {
                    capturing.set(true);
                    action_error.set(None);

                    // The painted document node excludes the preview
                    // overlay, so exports never carry it
                    let result = capture::capture_node(&node).await;
                    let outcome = match result {
                        Ok(data_url) => {
                            if share {
                                capture::share_image(&data_url, &format!("Receipt {}", receipt_number))
                                    .await
                            } else {
                                capture::download_image(
                                    &data_url,
                                    &format!("receipt-{}.png", receipt_number),
                                )
                            }
                        }
                        Err(e) => Err(e),
                    };

                    if let Err(e) = outcome {
                        Logger::error_with_component(
                            "receipt_preview",
                            &format!("Capture failed: {}", e),
                        );
                        action_error.set(Some("Could not export the receipt. Try again.".to_string()));
                    }
                    capturing.set(false);
                });
            })
        }
    };

    let on_download = capture_then(false);
    let on_share = capture_then(true);

    html! {
        <section class="receipt-preview-section">
            <div class="receipt-capture-wrap">
                <div class="receipt-document" ref={document_node}>
                    {document_html(&layout)}
                </div>

                // Preview-only affordance layered outside the captured node
                {if let Some(text) = layout.preview_watermark.as_ref() {
                    html! {
                        <div class="preview-watermark">
                            {for (0..12).map(|i| html! {
                                <span key={i} class="preview-watermark-text">{text}</span>
                            })}
                        </div>
                    }
                } else { html! {} }}
            </div>

            {if let Some(error) = action_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            {if props.show_actions {
                html! {
                    <div class="preview-actions">
                        <button class="btn btn-primary" onclick={on_download} disabled={*capturing}>
                            {if *capturing { "Working..." } else { "Download PNG" }}
                        </button>
                        <button class="btn btn-secondary" onclick={on_share} disabled={*capturing}>
                            {"Share"}
                        </button>
                    </div>
                }
            } else { html! {} }}
        </section>
    }
}
