//! Receipt layout resolution.
//!
//! [`build_layout`] turns a [`ReceiptDocument`] plus [`PresentationSettings`]
//! into a fully resolved layout tree: every fallback applied, every money
//! string formatted, every conditional row decided. The tree is plain data,
//! so the on-screen preview is a dumb projection of it and two identical
//! inputs always produce an identical tree (the capture step depends on
//! that).

use serde::{Deserialize, Serialize};

use crate::calculator::{
    compute_grand_total, compute_subtotal, derive_currency_symbol, format_amount, line_amount,
    sanitize_price,
};
use crate::{PresentationSettings, ReceiptDocument, ReceiptStatus, TemplateVariant};

/// Placeholder shown when the customer name is empty
pub const FALLBACK_CUSTOMER_NAME: &str = "Guest";
/// Placeholder shown when the business name is empty
pub const FALLBACK_BUSINESS_NAME: &str = "Business Name";
/// Placeholder shown when a line item has no name
pub const FALLBACK_ITEM_NAME: &str = "Item Name";
/// Placeholder shown when no receipt number was assigned
pub const FALLBACK_RECEIPT_NUMBER: &str = "Draft";
/// Monogram used when the business name is empty
pub const FALLBACK_MONOGRAM: char = 'R';
/// Text tiled across the document in preview mode
pub const PREVIEW_WATERMARK_TEXT: &str = "PREVIEW";

/// Logo slot in the header: a brand image when one is configured, else a
/// single-letter monogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogoBlock {
    Image(String),
    Monogram(char),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderBlock {
    /// None when the logo is toggled off
    pub logo: Option<LogoBlock>,
    pub business_name: String,
    /// Omitted entirely when empty
    pub tagline: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaBlock {
    pub customer_name: String,
    pub receipt_number: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    pub name: String,
    /// Currency-formatted line amount, right-aligned in the projection
    pub amount: String,
    /// `quantity × unit price` breakdown, present on the detailed template
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalLine {
    pub label: String,
    pub amount: String,
    pub emphasize: bool,
}

/// Fully resolved receipt layout, ready for projection and capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLayout {
    pub accent_color: String,
    pub header: HeaderBlock,
    pub meta: MetaBlock,
    pub items: Vec<ItemRow>,
    pub totals: Vec<TotalLine>,
    /// "PENDING" diagonal overlay; cosmetic only
    pub status_watermark: Option<String>,
    /// Repeating overlay shown on unauthenticated previews; never part of
    /// the exported artifact
    pub preview_watermark: Option<String>,
    pub footer_message: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn resolve_logo(doc: &ReceiptDocument, settings: &PresentationSettings) -> Option<LogoBlock> {
    if !settings.show_logo {
        return None;
    }
    if let Some(url) = settings.logo_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        return Some(LogoBlock::Image(url.to_string()));
    }
    let monogram = non_empty(doc.business_name.as_ref())
        .and_then(|name| name.chars().next())
        .map(|c| c.to_uppercase().next().unwrap_or(FALLBACK_MONOGRAM))
        .unwrap_or(FALLBACK_MONOGRAM);
    Some(LogoBlock::Monogram(monogram))
}

/// Resolve a document into its layout tree.
///
/// Pure: the same `(doc, settings, preview_mode)` triple always yields the
/// same tree, and neither input is mutated. Totals are recomputed here from
/// the raw items on every call; nothing persisted is trusted.
pub fn build_layout(
    doc: &ReceiptDocument,
    settings: &PresentationSettings,
    preview_mode: bool,
) -> ReceiptLayout {
    let symbol = derive_currency_symbol(&settings.currency);

    let header = HeaderBlock {
        logo: resolve_logo(doc, settings),
        business_name: non_empty(doc.business_name.as_ref())
            .unwrap_or_else(|| FALLBACK_BUSINESS_NAME.to_string()),
        tagline: non_empty(doc.tagline.as_ref()),
        phone: non_empty(doc.business_phone.as_ref()),
    };

    let meta = MetaBlock {
        customer_name: non_empty(doc.customer_name.as_ref())
            .unwrap_or_else(|| FALLBACK_CUSTOMER_NAME.to_string()),
        receipt_number: non_empty(doc.receipt_number.as_ref())
            .unwrap_or_else(|| FALLBACK_RECEIPT_NUMBER.to_string()),
        date: non_empty(doc.date.as_ref()).unwrap_or_default(),
    };

    let items = doc
        .items
        .iter()
        .map(|item| {
            let name = if item.name.trim().is_empty() {
                FALLBACK_ITEM_NAME.to_string()
            } else {
                item.name.trim().to_string()
            };
            let detail = match settings.template_variant {
                TemplateVariant::Detailed => Some(format!(
                    "{} × {}{}",
                    item.quantity.max(0),
                    symbol,
                    format_amount(sanitize_price(&item.unit_price))
                )),
                TemplateVariant::Simple => None,
            };
            ItemRow {
                name,
                amount: format!("{}{}", symbol, format_amount(line_amount(item))),
                detail,
            }
        })
        .collect();

    let subtotal = compute_subtotal(&doc.items);
    let grand_total = compute_grand_total(subtotal, doc.shipping_fee, doc.discount_amount);

    let mut totals = vec![TotalLine {
        label: "Subtotal".to_string(),
        amount: format!("{}{}", symbol, format_amount(subtotal)),
        emphasize: false,
    }];
    if let Some(shipping) = doc.shipping_fee.filter(|v| *v > 0.0) {
        totals.push(TotalLine {
            label: "Shipping".to_string(),
            amount: format!("{}{}", symbol, format_amount(shipping)),
            emphasize: false,
        });
    }
    if let Some(discount) = doc.discount_amount.filter(|v| *v > 0.0) {
        totals.push(TotalLine {
            label: "Discount".to_string(),
            amount: format!("-{}{}", symbol, format_amount(discount)),
            emphasize: false,
        });
    }
    totals.push(TotalLine {
        label: doc.status.total_label().to_string(),
        amount: format!("{}{}", symbol, format_amount(grand_total)),
        emphasize: true,
    });

    ReceiptLayout {
        accent_color: settings.accent_color.clone(),
        header,
        meta,
        items,
        totals,
        status_watermark: match doc.status {
            ReceiptStatus::Pending => Some("PENDING".to_string()),
            _ => None,
        },
        preview_watermark: preview_mode.then(|| PREVIEW_WATERMARK_TEXT.to_string()),
        footer_message: non_empty(doc.footer_message.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineItem, RawPrice};

    fn sample_doc() -> ReceiptDocument {
        ReceiptDocument {
            receipt_number: Some("RCP-000123".to_string()),
            date: Some("August 7, 2026".to_string()),
            customer_name: Some("Ada Obi".to_string()),
            business_name: Some("Mama K Kitchen".to_string()),
            business_phone: Some("0801 234 5678".to_string()),
            tagline: Some("Good food, fast".to_string()),
            footer_message: Some("Thank you for your patronage!".to_string()),
            status: ReceiptStatus::Paid,
            items: vec![
                LineItem {
                    id: LineItem::generate_id(1702516122000, 0),
                    name: "Jollof rice".to_string(),
                    quantity: 2,
                    unit_price: "1,500".into(),
                },
                LineItem {
                    id: LineItem::generate_id(1702516122000, 1),
                    name: "Malt drink".to_string(),
                    quantity: 1,
                    unit_price: RawPrice::Number(300.0),
                },
            ],
            shipping_fee: Some(200.0),
            discount_amount: Some(500.0),
        }
    }

    fn settings() -> PresentationSettings {
        PresentationSettings {
            currency: "₦ (NGN)".to_string(),
            ..PresentationSettings::default()
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let doc = sample_doc();
        let cfg = settings();
        let first = build_layout(&doc, &cfg, true);
        let second = build_layout(&doc, &cfg, true);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn totals_block_reflects_worked_example() {
        let layout = build_layout(&sample_doc(), &settings(), false);
        let labels: Vec<&str> = layout.totals.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Subtotal", "Shipping", "Discount", "TOTAL PAID"]);
        assert_eq!(layout.totals[0].amount, "₦3,300.00");
        assert_eq!(layout.totals[1].amount, "₦200.00");
        assert_eq!(layout.totals[2].amount, "-₦500.00");
        assert_eq!(layout.totals[3].amount, "₦3,000.00");
        assert!(layout.totals[3].emphasize);
    }

    #[test]
    fn shipping_and_discount_rows_hidden_at_zero() {
        let mut doc = sample_doc();
        doc.shipping_fee = Some(0.0);
        doc.discount_amount = None;
        let layout = build_layout(&doc, &settings(), false);
        let labels: Vec<&str> = layout.totals.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Subtotal", "TOTAL PAID"]);
    }

    #[test]
    fn pending_status_switches_label_and_watermark() {
        let mut doc = sample_doc();
        doc.status = ReceiptStatus::Pending;
        let layout = build_layout(&doc, &settings(), false);
        assert_eq!(layout.totals.last().unwrap().label, "TOTAL DUE");
        assert_eq!(layout.status_watermark.as_deref(), Some("PENDING"));

        doc.status = ReceiptStatus::Unpaid;
        let layout = build_layout(&doc, &settings(), false);
        assert_eq!(layout.totals.last().unwrap().label, "TOTAL PAID");
        assert_eq!(layout.status_watermark, None);
    }

    #[test]
    fn preview_watermark_follows_flag_only() {
        let doc = sample_doc();
        let cfg = settings();
        assert_eq!(
            build_layout(&doc, &cfg, true).preview_watermark.as_deref(),
            Some(PREVIEW_WATERMARK_TEXT)
        );
        assert_eq!(build_layout(&doc, &cfg, false).preview_watermark, None);
    }

    #[test]
    fn preview_flag_does_not_change_totals() {
        let doc = sample_doc();
        let cfg = settings();
        assert_eq!(
            build_layout(&doc, &cfg, true).totals,
            build_layout(&doc, &cfg, false).totals
        );
    }

    #[test]
    fn monogram_derived_from_business_name() {
        let mut cfg = settings();
        cfg.logo_url = None;
        let layout = build_layout(&sample_doc(), &cfg, false);
        assert_eq!(layout.header.logo, Some(LogoBlock::Monogram('M')));

        let mut doc = sample_doc();
        doc.business_name = None;
        let layout = build_layout(&doc, &cfg, false);
        assert_eq!(layout.header.logo, Some(LogoBlock::Monogram(FALLBACK_MONOGRAM)));
        assert_eq!(layout.header.business_name, FALLBACK_BUSINESS_NAME);
    }

    #[test]
    fn logo_url_wins_over_monogram_and_toggle_hides_both() {
        let mut cfg = settings();
        cfg.logo_url = Some("https://cdn.example.com/logo.png".to_string());
        let layout = build_layout(&sample_doc(), &cfg, false);
        assert_eq!(
            layout.header.logo,
            Some(LogoBlock::Image("https://cdn.example.com/logo.png".to_string()))
        );

        cfg.show_logo = false;
        let layout = build_layout(&sample_doc(), &cfg, false);
        assert_eq!(layout.header.logo, None);
    }

    #[test]
    fn detailed_template_adds_breakdown_lines() {
        let mut cfg = settings();
        cfg.template_variant = TemplateVariant::Detailed;
        let layout = build_layout(&sample_doc(), &cfg, false);
        assert_eq!(layout.items[0].detail.as_deref(), Some("2 × ₦1,500.00"));
        assert_eq!(layout.items[1].detail.as_deref(), Some("1 × ₦300.00"));

        cfg.template_variant = TemplateVariant::Simple;
        let layout = build_layout(&sample_doc(), &cfg, false);
        assert!(layout.items.iter().all(|row| row.detail.is_none()));
    }

    #[test]
    fn empty_fields_fall_back_to_placeholders() {
        let doc = ReceiptDocument::default();
        let layout = build_layout(&doc, &settings(), false);
        assert_eq!(layout.meta.customer_name, FALLBACK_CUSTOMER_NAME);
        assert_eq!(layout.meta.receipt_number, FALLBACK_RECEIPT_NUMBER);
        assert_eq!(layout.header.business_name, FALLBACK_BUSINESS_NAME);
        assert_eq!(layout.header.tagline, None);
        assert_eq!(layout.footer_message, None);
        assert_eq!(layout.totals.first().unwrap().amount, "₦0.00");
    }

    #[test]
    fn item_rows_keep_insertion_order_and_placeholders() {
        let mut doc = sample_doc();
        doc.items.push(LineItem {
            id: LineItem::generate_id(1702516122000, 2),
            name: "   ".to_string(),
            quantity: 99,
            unit_price: "abc".into(),
        });
        let layout = build_layout(&doc, &settings(), false);
        assert_eq!(layout.items.len(), 3);
        assert_eq!(layout.items[0].name, "Jollof rice");
        assert_eq!(layout.items[2].name, FALLBACK_ITEM_NAME);
        assert_eq!(layout.items[2].amount, "₦0.00");
    }

    #[test]
    fn renderer_does_not_mutate_document() {
        let doc = sample_doc();
        let before = doc.clone();
        let _ = build_layout(&doc, &settings(), true);
        assert_eq!(doc, before);
    }
}
