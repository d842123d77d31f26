use shared::calculator::sanitize_price;
use shared::{
    DeleteReceiptsRequest, LineItem, RawPrice, ReceiptDocument, ReceiptStatus, SavedReceipt,
    SaveReceiptRequest, UpdateReceiptStatusRequest,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::{ApiClient, Logger};
use crate::session::Session;

#[cfg(target_arch = "wasm32")]
fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn blank_item(seq: u32) -> LineItem {
    LineItem {
        id: LineItem::generate_id(now_millis(), seq),
        name: String::new(),
        quantity: 1,
        unit_price: RawPrice::Text(String::new()),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Adjustment inputs are free text; empty means "not set", anything else
/// goes through the same permissive price coercion as line items.
fn parse_adjustment(input: &str) -> Option<f64> {
    non_empty(input).map(|text| sanitize_price(&RawPrice::Text(text)))
}

/// Which line-item column an edit targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemField {
    Name,
    Quantity,
    Price,
}

/// Which receipt-level field an edit targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReceiptField {
    Customer,
    ReceiptNumber,
    Date,
    Shipping,
    Discount,
}

/// Editor state for the receipt currently being built
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFormState {
    pub items: Vec<LineItem>,
    pub customer_name: String,
    pub receipt_number: String,
    pub date: String,
    pub status: ReceiptStatus,
    pub shipping_input: String,
    pub discount_input: String,
    pub next_item_seq: u32,
    pub saving: bool,
    pub form_error: Option<String>,
    pub form_success: Option<String>,
}

impl ReceiptFormState {
    pub fn new_draft() -> Self {
        Self {
            items: vec![blank_item(0)],
            customer_name: String::new(),
            receipt_number: String::new(),
            date: shared::default_receipt_date(),
            status: ReceiptStatus::default(),
            shipping_input: String::new(),
            discount_input: String::new(),
            next_item_seq: 1,
            saving: false,
            form_error: None,
            form_success: None,
        }
    }

    /// Receipt-side fields of the renderable document; the caller fills in
    /// the business fields from the profile.
    pub fn document(&self) -> ReceiptDocument {
        ReceiptDocument {
            receipt_number: non_empty(&self.receipt_number),
            date: non_empty(&self.date),
            customer_name: non_empty(&self.customer_name),
            business_name: None,
            business_phone: None,
            tagline: None,
            footer_message: None,
            status: self.status,
            items: self.items.clone(),
            shipping_fee: parse_adjustment(&self.shipping_input),
            discount_amount: parse_adjustment(&self.discount_input),
        }
    }

    fn save_request(&self) -> SaveReceiptRequest {
        SaveReceiptRequest {
            receipt_number: non_empty(&self.receipt_number),
            date: non_empty(&self.date),
            customer_name: non_empty(&self.customer_name),
            status: self.status,
            items: self.items.clone(),
            shipping_fee: parse_adjustment(&self.shipping_input),
            discount_amount: parse_adjustment(&self.discount_input),
        }
    }
}

/// Saved-receipt list state
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptListState {
    pub receipts: Vec<SavedReceipt>,
    pub loading: bool,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

pub struct UseReceiptsResult {
    pub form: ReceiptFormState,
    pub list: ReceiptListState,
    pub actions: UseReceiptsActions,
}

#[derive(Clone, PartialEq)]
pub struct UseReceiptsActions {
    pub refresh: Callback<()>,
    pub load_more: Callback<()>,
    pub save: Callback<()>,
    pub add_item: Callback<()>,
    pub remove_item: Callback<usize>,
    pub edit_item: Callback<(usize, ItemField, String)>,
    pub edit_field: Callback<(ReceiptField, String)>,
    pub set_status: Callback<ReceiptStatus>,
    pub mark_receipt: Callback<(String, ReceiptStatus)>,
    pub delete_receipt: Callback<String>,
}

const PAGE_SIZE: u32 = 10;

#[hook]
pub fn use_receipts(api_client: &ApiClient, session: &Session) -> UseReceiptsResult {
    let form = use_state(ReceiptFormState::new_draft);
    let list = use_state(|| ReceiptListState {
        receipts: Vec::new(),
        loading: true,
        has_more: false,
        next_cursor: None,
    });

    let refresh = {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let list = list.clone();

        Callback::from(move |_| {
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let list = list.clone();

            spawn_local(async move {
                list.set(ReceiptListState { loading: true, ..(*list).clone() });

                match api_client.get_receipts(&vendor_id, Some(PAGE_SIZE), None).await {
                    Ok(data) => {
                        list.set(ReceiptListState {
                            receipts: data.receipts,
                            loading: false,
                            has_more: data.pagination.has_more,
                            next_cursor: data.pagination.next_cursor,
                        });
                    }
                    Err(e) => {
                        Logger::error_with_component(
                            "use_receipts",
                            &format!("Failed to fetch receipts: {}", e),
                        );
                        list.set(ReceiptListState { loading: false, ..(*list).clone() });
                    }
                }
            });
        })
    };

    let load_more = {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let list = list.clone();

        Callback::from(move |_| {
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let list = list.clone();
            let cursor = list.next_cursor.clone();

            spawn_local(async move {
                let cursor = match cursor {
                    Some(cursor) => cursor,
                    None => return,
                };

                match api_client
                    .get_receipts(&vendor_id, Some(PAGE_SIZE), Some(&cursor))
                    .await
                {
                    Ok(data) => {
                        let mut receipts = (*list).receipts.clone();
                        receipts.extend(data.receipts);
                        list.set(ReceiptListState {
                            receipts,
                            loading: false,
                            has_more: data.pagination.has_more,
                            next_cursor: data.pagination.next_cursor,
                        });
                    }
                    Err(e) => {
                        Logger::error_with_component(
                            "use_receipts",
                            &format!("Failed to fetch next page: {}", e),
                        );
                    }
                }
            });
        })
    };

    let save = {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let form = form.clone();
        let refresh = refresh.clone();

        Callback::from(move |_| {
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let form = form.clone();
            let refresh = refresh.clone();
            let request = form.save_request();

            spawn_local(async move {
                form.set(ReceiptFormState {
                    saving: true,
                    form_error: None,
                    form_success: None,
                    ..(*form).clone()
                });

                match api_client.save_receipt(&vendor_id, request).await {
                    Ok(response) => {
                        // Fresh draft, keeping the success banner visible
                        let mut next = ReceiptFormState::new_draft();
                        next.form_success = Some(response.success_message);
                        form.set(next);
                        refresh.emit(());

                        // Clear the banner after a few seconds
                        let form = form.clone();
                        spawn_local(async move {
                            gloo::timers::future::TimeoutFuture::new(3000).await;
                            form.set(ReceiptFormState { form_success: None, ..(*form).clone() });
                        });
                    }
                    Err(e) => {
                        form.set(ReceiptFormState {
                            saving: false,
                            form_error: Some(e),
                            ..(*form).clone()
                        });
                    }
                }
            });
        })
    };

    let add_item = {
        let form = form.clone();
        Callback::from(move |_| {
            let mut next = (*form).clone();
            next.items.push(blank_item(next.next_item_seq));
            next.next_item_seq += 1;
            form.set(next);
        })
    };

    let remove_item = {
        let form = form.clone();
        Callback::from(move |index: usize| {
            let mut next = (*form).clone();
            if index < next.items.len() {
                next.items.remove(index);
            }
            form.set(next);
        })
    };

    let edit_item = {
        let form = form.clone();
        Callback::from(move |(index, field, value): (usize, ItemField, String)| {
            let mut next = (*form).clone();
            if let Some(item) = next.items.get_mut(index) {
                match field {
                    ItemField::Name => item.name = value,
                    // Permissive: anything unparseable is quantity 0
                    ItemField::Quantity => {
                        item.quantity = value.trim().parse::<i64>().unwrap_or(0).max(0)
                    }
                    ItemField::Price => item.unit_price = RawPrice::Text(value),
                }
            }
            form.set(next);
        })
    };

    let edit_field = {
        let form = form.clone();
        Callback::from(move |(field, value): (ReceiptField, String)| {
            let mut next = (*form).clone();
            match field {
                ReceiptField::Customer => next.customer_name = value,
                ReceiptField::ReceiptNumber => next.receipt_number = value,
                ReceiptField::Date => next.date = value,
                ReceiptField::Shipping => next.shipping_input = value,
                ReceiptField::Discount => next.discount_input = value,
            }
            form.set(next);
        })
    };

    let set_status = {
        let form = form.clone();
        Callback::from(move |status: ReceiptStatus| {
            form.set(ReceiptFormState { status, ..(*form).clone() });
        })
    };

    let mark_receipt = {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let refresh = refresh.clone();

        Callback::from(move |(receipt_id, status): (String, ReceiptStatus)| {
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                match api_client
                    .update_receipt_status(
                        &vendor_id,
                        &receipt_id,
                        UpdateReceiptStatusRequest { status },
                    )
                    .await
                {
                    Ok(_) => refresh.emit(()),
                    Err(e) => Logger::error_with_component(
                        "use_receipts",
                        &format!("Failed to update status: {}", e),
                    ),
                }
            });
        })
    };

    let delete_receipt = {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let refresh = refresh.clone();

        Callback::from(move |receipt_id: String| {
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                match api_client
                    .delete_receipts(
                        &vendor_id,
                        DeleteReceiptsRequest { receipt_ids: vec![receipt_id] },
                    )
                    .await
                {
                    Ok(_) => refresh.emit(()),
                    Err(e) => Logger::error_with_component(
                        "use_receipts",
                        &format!("Failed to delete receipt: {}", e),
                    ),
                }
            });
        })
    };

    UseReceiptsResult {
        form: (*form).clone(),
        list: (*list).clone(),
        actions: UseReceiptsActions {
            refresh,
            load_more,
            save,
            add_item,
            remove_item,
            edit_item,
            edit_field,
            set_status,
            mark_receipt,
            delete_receipt,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_has_one_blank_item_and_todays_date() {
        let draft = ReceiptFormState::new_draft();
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].quantity, 1);
        assert!(!draft.date.is_empty());
        assert_eq!(draft.status, ReceiptStatus::Paid);
    }

    #[test]
    fn adjustment_parsing_is_permissive() {
        assert_eq!(parse_adjustment(""), None);
        assert_eq!(parse_adjustment("   "), None);
        assert_eq!(parse_adjustment("200"), Some(200.0));
        assert_eq!(parse_adjustment("₦1,500"), Some(1500.0));
        assert_eq!(parse_adjustment("abc"), Some(0.0));
    }

    #[test]
    fn document_drops_empty_fields() {
        let mut form = ReceiptFormState::new_draft();
        form.customer_name = "  ".to_string();
        form.receipt_number = "RCP-7".to_string();
        form.shipping_input = "200".to_string();

        let doc = form.document();
        assert_eq!(doc.customer_name, None);
        assert_eq!(doc.receipt_number.as_deref(), Some("RCP-7"));
        assert_eq!(doc.shipping_fee, Some(200.0));
        assert_eq!(doc.discount_amount, None);
        // Business fields are the profile's to fill
        assert_eq!(doc.business_name, None);
    }
}
