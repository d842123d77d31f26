use shared::calculator::format_amount;
use shared::{ReceiptStatus, SavedReceipt};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ReceiptTableProps {
    pub receipts: Vec<SavedReceipt>,
    pub loading: bool,
    pub currency_symbol: String,
    pub has_more: bool,
    pub on_load_more: Callback<()>,
    pub on_mark: Callback<(String, ReceiptStatus)>,
    pub on_delete: Callback<String>,
}

fn status_chip(status: ReceiptStatus) -> Html {
    let class = match status {
        ReceiptStatus::Paid => "status-chip paid",
        ReceiptStatus::Pending => "status-chip pending",
        ReceiptStatus::Unpaid => "status-chip unpaid",
    };
    html! { <span {class}>{status.as_str()}</span> }
}

#[function_component(ReceiptTable)]
pub fn receipt_table(props: &ReceiptTableProps) -> Html {
    if props.loading {
        return html! {
            <section class="receipts-section">
                <h2>{"Saved Receipts"}</h2>
                <div class="loading">{"Loading receipts..."}</div>
            </section>
        };
    }

    html! {
        <section class="receipts-section">
            <h2>{"Saved Receipts"}</h2>

            {if props.receipts.is_empty() {
                html! { <div class="empty-state">{"No receipts saved yet."}</div> }
            } else {
                html! {
                    <div class="table-container">
                        <table class="receipts-table">
                            <thead>
                                <tr>
                                    <th>{"Receipt"}</th>
                                    <th>{"Date"}</th>
                                    <th>{"Customer"}</th>
                                    <th>{"Status"}</th>
                                    <th>{"Total"}</th>
                                    <th>{"Actions"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                {for props.receipts.iter().map(|receipt| {
                                    let id = receipt.id.clone();
                                    let toggled = match receipt.status {
                                        ReceiptStatus::Paid => ReceiptStatus::Pending,
                                        _ => ReceiptStatus::Paid,
                                    };
                                    let mark_label = match receipt.status {
                                        ReceiptStatus::Paid => "Mark pending",
                                        _ => "Mark paid",
                                    };
                                    let on_mark = {
                                        let on_mark = props.on_mark.clone();
                                        let id = id.clone();
                                        Callback::from(move |_| on_mark.emit((id.clone(), toggled)))
                                    };
                                    let on_delete = {
                                        let on_delete = props.on_delete.clone();
                                        let id = id.clone();
                                        Callback::from(move |_| on_delete.emit(id.clone()))
                                    };

                                    html! {
                                        <tr key={receipt.id.clone()}>
                                            <td class="receipt-number">{&receipt.receipt_number}</td>
                                            <td class="date">
                                                {receipt.date.clone().unwrap_or_default()}
                                            </td>
                                            <td class="customer">
                                                {receipt.customer_name.clone()
                                                    .unwrap_or_else(|| "Guest".to_string())}
                                            </td>
                                            <td>{status_chip(receipt.status)}</td>
                                            <td class="total">
                                                {format!("{}{}", props.currency_symbol,
                                                    format_amount(receipt.grand_total))}
                                            </td>
                                            <td class="actions">
                                                <button class="btn btn-small" onclick={on_mark}>
                                                    {mark_label}
                                                </button>
                                                <button
                                                    class="btn btn-small btn-danger"
                                                    onclick={on_delete}
                                                >
                                                    {"Delete"}
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })}
                            </tbody>
                        </table>
                    </div>
                }
            }}

            {if props.has_more {
                let on_load_more = props.on_load_more.clone();
                html! {
                    <button
                        class="btn btn-secondary load-more-btn"
                        onclick={Callback::from(move |_| on_load_more.emit(()))}
                    >
                        {"Load more"}
                    </button>
                }
            } else { html! {} }}
        </section>
    }
}
