use shared::{RawPrice, ReceiptStatus};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::hooks::use_receipts::{ItemField, ReceiptField, ReceiptFormState};

#[derive(Properties, PartialEq)]
pub struct ReceiptFormProps {
    pub form: ReceiptFormState,
    pub on_edit_field: Callback<(ReceiptField, String)>,
    pub on_set_status: Callback<ReceiptStatus>,
    pub on_edit_item: Callback<(usize, ItemField, String)>,
    pub on_add_item: Callback<()>,
    pub on_remove_item: Callback<usize>,
    pub on_save: Callback<()>,
}

fn raw_price_text(price: &RawPrice) -> String {
    match price {
        RawPrice::Number(n) => format!("{}", n),
        RawPrice::Text(t) => t.clone(),
    }
}

fn field_input(
    props: &ReceiptFormProps,
    field: ReceiptField,
    label: &str,
    placeholder: &str,
    value: String,
) -> Html {
    let on_edit_field = props.on_edit_field.clone();
    let onchange = Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_edit_field.emit((field, input.value()));
    });

    html! {
        <div class="form-group">
            <label>{label}</label>
            <input
                type="text"
                placeholder={placeholder.to_string()}
                {value}
                {onchange}
                disabled={props.form.saving}
            />
        </div>
    }
}

#[function_component(ReceiptForm)]
pub fn receipt_form(props: &ReceiptFormProps) -> Html {
    let form = &props.form;

    let on_status_change = {
        let on_set_status = props.on_set_status.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_set_status.emit(ReceiptStatus::from_value(Some(&select.value())));
        })
    };

    let on_submit = {
        let on_save = props.on_save.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_save.emit(());
        })
    };

    html! {
        <section class="receipt-form-section">
            <h2>{"New Receipt"}</h2>

            {if let Some(error) = form.form_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            {if let Some(success) = form.form_success.as_ref() {
                html! { <div class="form-message success">{success}</div> }
            } else { html! {} }}

            <form class="receipt-form" onsubmit={on_submit}>
                <div class="form-row">
                    {field_input(props, ReceiptField::Customer, "Billed to", "Customer name",
                        form.customer_name.clone())}
                    {field_input(props, ReceiptField::Date, "Date", "August 7, 2026",
                        form.date.clone())}
                </div>
                <div class="form-row">
                    {field_input(props, ReceiptField::ReceiptNumber, "Receipt number",
                        "Generated when left empty", form.receipt_number.clone())}
                    <div class="form-group">
                        <label>{"Status"}</label>
                        <select onchange={on_status_change} disabled={form.saving}>
                            {for [ReceiptStatus::Paid, ReceiptStatus::Pending, ReceiptStatus::Unpaid]
                                .iter()
                                .map(|status| html! {
                                    <option
                                        value={status.as_str()}
                                        selected={*status == form.status}
                                    >
                                        {status.as_str()}
                                    </option>
                                })}
                        </select>
                    </div>
                </div>

                <h3>{"Items"}</h3>
                <div class="item-rows">
                    {for form.items.iter().enumerate().map(|(index, item)| {
                        let name_change = {
                            let on_edit_item = props.on_edit_item.clone();
                            Callback::from(move |e: Event| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                on_edit_item.emit((index, ItemField::Name, input.value()));
                            })
                        };
                        let quantity_change = {
                            let on_edit_item = props.on_edit_item.clone();
                            Callback::from(move |e: Event| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                on_edit_item.emit((index, ItemField::Quantity, input.value()));
                            })
                        };
                        let price_change = {
                            let on_edit_item = props.on_edit_item.clone();
                            Callback::from(move |e: Event| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                on_edit_item.emit((index, ItemField::Price, input.value()));
                            })
                        };
                        let remove = {
                            let on_remove_item = props.on_remove_item.clone();
                            Callback::from(move |_| on_remove_item.emit(index))
                        };

                        html! {
                            <div class="item-row" key={item.id.clone()}>
                                <input
                                    type="text"
                                    class="item-name"
                                    placeholder="Item name"
                                    value={item.name.clone()}
                                    onchange={name_change}
                                    disabled={form.saving}
                                />
                                <input
                                    type="number"
                                    class="item-quantity"
                                    min="0"
                                    step="1"
                                    value={item.quantity.to_string()}
                                    onchange={quantity_change}
                                    disabled={form.saving}
                                />
                                <input
                                    type="text"
                                    class="item-price"
                                    placeholder="Unit price"
                                    value={raw_price_text(&item.unit_price)}
                                    onchange={price_change}
                                    disabled={form.saving}
                                />
                                <button
                                    type="button"
                                    class="btn btn-small remove-item-btn"
                                    onclick={remove}
                                    disabled={form.saving || form.items.len() == 1}
                                >
                                    {"✕"}
                                </button>
                            </div>
                        }
                    })}
                </div>
                <button
                    type="button"
                    class="btn btn-secondary add-item-btn"
                    onclick={
                        let on_add_item = props.on_add_item.clone();
                        Callback::from(move |_| on_add_item.emit(()))
                    }
                    disabled={form.saving}
                >
                    {"+ Add item"}
                </button>

                <div class="form-row">
                    {field_input(props, ReceiptField::Shipping, "Shipping fee",
                        "0", form.shipping_input.clone())}
                    {field_input(props, ReceiptField::Discount, "Discount",
                        "0", form.discount_input.clone())}
                </div>

                <button type="submit" class="btn btn-primary save-receipt-btn" disabled={form.saving}>
                    {if form.saving { "Saving..." } else { "Save Receipt" }}
                </button>
            </form>
        </section>
    }
}
