//! Invoice document builder.
//!
//! Transforms an [`OrderAggregate`] into a self-contained styled HTML
//! document suitable for rendering as a printable invoice, then seals it
//! into the JSON envelope the HTTP boundary returns. Shaping and rendering
//! are pure; the builder performs no I/O and no authorization. It assumes
//! the aggregate was loaded by a read that already verified ownership.
//!
//! Rendering is split in two to make the escaping invariant structural:
//! [`InvoiceDocument::from_aggregate`] moves every untrusted field through
//! [`Escaped`], and [`InvoiceDocument::render`] only interpolates `Escaped`
//! values (or typed numbers and dates) into the template.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::markup::Escaped;
use crate::order::{OrderAggregate, OrderStatus, ShippingAddress};
use crate::types::{Money, OrderNumber};

const VENDOR_NAME: &str = "SIERRA AEROSPACE";
const VENDOR_TAGLINE: &str = "Precision Navigation Systems";
const VENDOR_LOCATION: &str = "Bangalore, Karnataka, India";
const VENDOR_EMAIL: &str = "contact@sierraaerospace.in";
const SUPPORT_EMAIL: &str = "support@sierraaerospace.in";
const FOOTER_SIGNOFF: &str = "Sierra Aerospace | Precision Navigation for the Modern Era";

/// Format a date as `D MMM YYYY` in a fixed English locale, e.g. `5 Jan 2025`.
///
/// Absent dates render as `N/A`.
pub fn format_invoice_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "N/A".to_owned(), |d| d.format("%-d %b %Y").to_string())
}

/// Badge background and text color for a status.
const fn badge_palette(status: OrderStatus) -> (&'static str, &'static str) {
    match status {
        OrderStatus::Delivered => ("#dcfce7", "#166534"),
        OrderStatus::Cancelled => ("#fee2e2", "#dc2626"),
        _ => ("#fef3c7", "#92400e"),
    }
}

/// Escaped shipping-address block of the invoice.
#[derive(Debug, Clone)]
pub struct ShipTo {
    /// Recipient, falling back to `Customer` when blank
    pub name: Escaped,
    /// Street address
    pub address: Escaped,
    /// City
    pub city: Escaped,
    /// State
    pub state: Escaped,
    /// Postal code
    pub pincode: Escaped,
    /// Contact phone
    pub phone: Escaped,
}

impl ShipTo {
    fn from_address(address: &ShippingAddress) -> Self {
        Self {
            name: Escaped::from_opt(address.name.as_deref()).non_empty_or("Customer"),
            address: Escaped::from_opt(address.address.as_deref()),
            city: Escaped::from_opt(address.city.as_deref()),
            state: Escaped::from_opt(address.state.as_deref()),
            pincode: Escaped::from_opt(address.pincode.as_deref()),
            phone: Escaped::from_opt(address.phone.as_deref()),
        }
    }
}

/// One rendered line of the item table.
#[derive(Debug, Clone)]
pub struct LineRow {
    /// Product name, escaped
    pub product: Escaped,
    /// Units purchased
    pub quantity: u32,
    /// Price per unit
    pub unit_price: Money,
    /// Stored line total
    pub line_total: Money,
}

/// The totals block.
#[derive(Debug, Clone, Copy)]
pub struct Totals {
    /// Sum of line totals
    pub subtotal: Money,
    /// Shipping cost
    pub shipping: Money,
    /// Tax (GST)
    pub tax: Money,
    /// Grand total
    pub total: Money,
}

/// A fully shaped invoice, ready to render.
///
/// Every untrusted field has already been escaped; rendering is a pure
/// template walk with no further decisions about trust.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    order_number: Escaped,
    issued_on: String,
    status: OrderStatus,
    badge_text: Escaped,
    ship_to: ShipTo,
    expected_delivery: Option<String>,
    rows: Vec<LineRow>,
    totals: Totals,
}

impl InvoiceDocument {
    /// Shape an order aggregate into an invoice document.
    ///
    /// Never fails: an empty item list produces an empty table body, and
    /// absent monetary or address fields collapse to zero or empty text.
    pub fn from_aggregate(aggregate: &OrderAggregate) -> Self {
        let order = &aggregate.order;
        let empty_address = ShippingAddress::default();
        let address = order.shipping_address.as_ref().unwrap_or(&empty_address);

        let rows = aggregate
            .items
            .iter()
            .map(|item| LineRow {
                product: Escaped::from_raw(item.product_name.as_ref()),
                quantity: item.quantity.value(),
                unit_price: item.unit_price,
                line_total: item.total_price,
            })
            .collect();

        Self {
            order_number: Escaped::from_raw(order.order_number.as_ref()),
            issued_on: format_invoice_date(Some(order.created_at.date_naive())),
            status: order.status,
            badge_text: Escaped::from_raw(&order.status.as_str().to_uppercase()),
            ship_to: ShipTo::from_address(address),
            expected_delivery: order
                .expected_delivery
                .map(|date| format_invoice_date(Some(date))),
            rows,
            totals: Totals {
                subtotal: order.subtotal,
                shipping: order.shipping_cost,
                tax: order.tax,
                total: order.total,
            },
        }
    }

    /// Render the document as a single self-contained HTML page.
    pub fn render(&self) -> String {
        let (badge_bg, badge_fg) = badge_palette(self.status);
        let mut out = String::with_capacity(8 * 1024);

        // The only dynamic piece of the style block is the badge palette.
        let _ = write!(
            out,
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n  \
             <title>Invoice {number}</title>\n  <style>{style}\n    \
             .status-badge {{\n      display: inline-block;\n      padding: 4px 12px;\n      \
             border-radius: 20px;\n      font-size: 12px;\n      font-weight: 500;\n      \
             background: {badge_bg};\n      color: {badge_fg};\n    }}\n  </style>\n</head>\n<body>",
            number = self.order_number,
            style = PAGE_STYLE,
        );

        self.render_header(&mut out);
        self.render_addresses(&mut out);
        self.render_items(&mut out);
        self.render_totals(&mut out);
        Self::render_footer(&mut out);

        out.push_str("\n</body>\n</html>\n");
        out
    }

    fn render_header(&self, out: &mut String) {
        let _ = write!(
            out,
            "\n  <div class=\"header\">\n    <div class=\"company-info\">\n      \
             <h1>{VENDOR_NAME}</h1>\n      <p>{VENDOR_TAGLINE}</p>\n      \
             <p>{VENDOR_LOCATION}</p>\n      <p>{VENDOR_EMAIL}</p>\n    </div>\n    \
             <div class=\"invoice-info\">\n      <h2>INVOICE</h2>\n      \
             <p><strong>Invoice No:</strong> {number}</p>\n      \
             <p><strong>Date:</strong> {date}</p>\n      \
             <p><strong>Status:</strong> <span class=\"status-badge\">{badge}</span></p>\n    \
             </div>\n  </div>",
            number = self.order_number,
            date = self.issued_on,
            badge = self.badge_text,
        );
    }

    fn render_addresses(&self, out: &mut String) {
        let ship = &self.ship_to;
        let state_part = if ship.state.is_empty() {
            String::new()
        } else {
            format!(", {}", ship.state)
        };
        let _ = write!(
            out,
            "\n  <div class=\"addresses\">\n    <div class=\"address-block\">\n      \
             <h3>Ship To</h3>\n      <p><strong>{name}</strong></p>\n      <p>{address}</p>\n      \
             <p>{city}{state_part} {pincode}</p>\n      <p>{phone}</p>\n    </div>",
            name = ship.name,
            address = ship.address,
            city = ship.city,
            pincode = ship.pincode,
            phone = ship.phone,
        );
        if let Some(expected) = &self.expected_delivery {
            let _ = write!(
                out,
                "\n    <div class=\"address-block\" style=\"text-align: right;\">\n      \
                 <h3>Expected Delivery</h3>\n      <p><strong>{expected}</strong></p>\n    </div>",
            );
        }
        out.push_str("\n  </div>");
    }

    fn render_items(&self, out: &mut String) {
        out.push_str(
            "\n  <table>\n    <thead>\n      <tr>\n        <th>Product</th>\n        \
             <th>Qty</th>\n        <th>Unit Price</th>\n        <th>Total</th>\n      </tr>\n    \
             </thead>\n    <tbody>",
        );
        for row in &self.rows {
            let _ = write!(
                out,
                "\n      <tr>\n        <td>{product}</td>\n        \
                 <td class=\"qty\">{quantity}</td>\n        \
                 <td class=\"amount\">{unit}</td>\n        \
                 <td class=\"amount\">{total}</td>\n      </tr>",
                product = row.product,
                quantity = row.quantity,
                unit = row.unit_price,
                total = row.line_total,
            );
        }
        out.push_str("\n    </tbody>\n  </table>");
    }

    fn render_totals(&self, out: &mut String) {
        let _ = write!(
            out,
            "\n  <div class=\"totals\">\n    <div class=\"totals-row\">\n      \
             <span>Subtotal</span>\n      <span>{subtotal}</span>\n    </div>\n    \
             <div class=\"totals-row\">\n      <span>Shipping</span>\n      \
             <span>{shipping}</span>\n    </div>\n    <div class=\"totals-row\">\n      \
             <span>Tax (GST)</span>\n      <span>{tax}</span>\n    </div>\n    \
             <div class=\"totals-row total\">\n      <span>Total</span>\n      \
             <span>{total}</span>\n    </div>\n  </div>",
            subtotal = self.totals.subtotal,
            shipping = self.totals.shipping,
            tax = self.totals.tax,
            total = self.totals.total,
        );
    }

    fn render_footer(out: &mut String) {
        let _ = write!(
            out,
            "\n  <div class=\"footer\">\n    <p>Thank you for your business!</p>\n    \
             <p>For questions about this invoice, please contact {SUPPORT_EMAIL}</p>\n    \
             <p>{FOOTER_SIGNOFF}</p>\n  </div>",
        );
    }
}

const PAGE_STYLE: &str = "\n    body {\n      font-family: 'Helvetica Neue', Arial, sans-serif;\n      margin: 0;\n      padding: 40px;\n      color: #1f2937;\n      background: #fff;\n    }\n    .header {\n      display: flex;\n      justify-content: space-between;\n      margin-bottom: 40px;\n      border-bottom: 2px solid #d4a843;\n      padding-bottom: 20px;\n    }\n    .company-info h1 {\n      margin: 0;\n      color: #d4a843;\n      font-size: 28px;\n    }\n    .company-info p {\n      margin: 4px 0;\n      color: #6b7280;\n      font-size: 12px;\n    }\n    .invoice-info {\n      text-align: right;\n    }\n    .invoice-info h2 {\n      margin: 0;\n      font-size: 24px;\n      color: #1f2937;\n    }\n    .invoice-info p {\n      margin: 4px 0;\n      font-size: 12px;\n      color: #6b7280;\n    }\n    .addresses {\n      display: flex;\n      justify-content: space-between;\n      margin-bottom: 30px;\n    }\n    .address-block h3 {\n      font-size: 14px;\n      color: #6b7280;\n      margin: 0 0 8px 0;\n      text-transform: uppercase;\n    }\n    .address-block p {\n      margin: 2px 0;\n      font-size: 13px;\n    }\n    table {\n      width: 100%;\n      border-collapse: collapse;\n      margin-bottom: 30px;\n    }\n    th {\n      background: #f3f4f6;\n      padding: 12px;\n      text-align: left;\n      font-size: 12px;\n      text-transform: uppercase;\n      color: #6b7280;\n    }\n    td {\n      padding: 12px;\n      border-bottom: 1px solid #e5e7eb;\n    }\n    th:last-child, th:nth-child(3), td.amount {\n      text-align: right;\n    }\n    th:nth-child(2), td.qty {\n      text-align: center;\n    }\n    .totals {\n      margin-left: auto;\n      width: 300px;\n    }\n    .totals-row {\n      display: flex;\n      justify-content: space-between;\n      padding: 8px 0;\n      font-size: 14px;\n    }\n    .totals-row.total {\n      border-top: 2px solid #1f2937;\n      font-weight: bold;\n      font-size: 16px;\n      padding-top: 12px;\n    }\n    .footer {\n      margin-top: 40px;\n      padding-top: 20px;\n      border-top: 1px solid #e5e7eb;\n      text-align: center;\n      font-size: 12px;\n      color: #6b7280;\n    }";

/// JSON envelope carrying a sealed invoice document.
///
/// The payload is the rendered markup re-encoded as base64, not a true
/// PDF, while the filename keeps the `.pdf` extension the order-history
/// client expects. The mismatch is long-standing wire behavior and is
/// preserved for compatibility; producing a real PDF would be an external
/// rendering-service decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEnvelope {
    /// Base64 (standard alphabet) of the rendered document bytes
    pub document_base64: String,
    /// Suggested download filename, `invoice-<order_number>.pdf`
    pub file_name: String,
}

impl InvoiceEnvelope {
    /// Encode a rendered document for transport.
    pub fn seal(order_number: &OrderNumber, document: &str) -> Self {
        Self {
            document_base64: STANDARD.encode(document.as_bytes()),
            file_name: format!("invoice-{order_number}.pdf"),
        }
    }
}

/// Shape, render and seal an invoice for one order aggregate.
pub fn generate_invoice(aggregate: &OrderAggregate) -> InvoiceEnvelope {
    let document = InvoiceDocument::from_aggregate(aggregate);
    InvoiceEnvelope::seal(&aggregate.order.order_number, &document.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Order, OrderItem};
    use crate::types::{OrderId, ProductId, ProductName, Quantity};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn item(name: &str, quantity: u32, unit_paise: u64, total_paise: u64) -> OrderItem {
        OrderItem {
            id: Uuid::now_v7(),
            product_id: ProductId::try_new("truenav-pro".to_string()).unwrap(),
            product_name: ProductName::try_new(name.to_string()).unwrap(),
            quantity: Quantity::new(quantity).unwrap(),
            unit_price: Money::from_paise(unit_paise).unwrap(),
            total_price: Money::from_paise(total_paise).unwrap(),
        }
    }

    fn aggregate(status: OrderStatus, items: Vec<OrderItem>) -> OrderAggregate {
        OrderAggregate {
            order: Order {
                id: OrderId::new(),
                order_number: OrderNumber::try_new("SA-1001".to_string()).unwrap(),
                status,
                subtotal: Money::from_paise(3000).unwrap(),
                shipping_cost: Money::from_paise(500).unwrap(),
                tax: Money::from_paise(200).unwrap(),
                total: Money::from_paise(3700).unwrap(),
                shipping_address: Some(ShippingAddress {
                    name: Some("O'Brien & <Co>".to_string()),
                    address: Some("12, HAL Old Airport Road".to_string()),
                    city: Some("Bangalore".to_string()),
                    state: Some("Karnataka".to_string()),
                    pincode: Some("560017".to_string()),
                    phone: Some("+91 98450 00000".to_string()),
                }),
                expected_delivery: None,
                created_at: Utc.with_ymd_and_hms(2025, 1, 5, 10, 30, 0).unwrap(),
            },
            items,
            shipments: vec![],
        }
    }

    #[test]
    fn test_date_formatting() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_invoice_date(Some(date)), "5 Jan 2025");
        assert_eq!(format_invoice_date(None), "N/A");
    }

    #[test]
    fn test_empty_item_list_renders_empty_table_body() {
        let html = InvoiceDocument::from_aggregate(&aggregate(OrderStatus::Pending, vec![]))
            .render();
        // Only the header row remains.
        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(html.contains("<tbody>"));
    }

    #[test]
    fn test_totals_block_renders_currency_with_two_decimals() {
        let agg = aggregate(
            OrderStatus::Confirmed,
            vec![item("TrueNav-Pro", 3, 1000, 3000)],
        );
        let html = InvoiceDocument::from_aggregate(&agg).render();
        assert!(html.contains("₹30.00"));
        assert!(html.contains("₹5.00"));
        assert!(html.contains("₹2.00"));
        assert!(html.contains("₹37.00"));
        assert!(html.contains("₹10.00"));
    }

    #[test]
    fn test_untrusted_shipping_name_is_escaped() {
        let agg = aggregate(OrderStatus::Pending, vec![]);
        let html = InvoiceDocument::from_aggregate(&agg).render();
        assert!(html.contains("O&#039;Brien &amp; &lt;Co&gt;"));
        assert!(!html.contains("O'Brien"));
    }

    #[test]
    fn test_untrusted_product_name_is_escaped() {
        let agg = aggregate(
            OrderStatus::Pending,
            vec![item("<script>alert(1)</script>", 1, 100, 100)],
        );
        let html = InvoiceDocument::from_aggregate(&agg).render();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_delivered_order_badge_and_filename() {
        let agg = aggregate(OrderStatus::Delivered, vec![]);
        let html = InvoiceDocument::from_aggregate(&agg).render();
        assert!(html.contains("<span class=\"status-badge\">DELIVERED</span>"));
        assert!(html.contains("background: #dcfce7"));

        let envelope = generate_invoice(&agg);
        assert_eq!(envelope.file_name, "invoice-SA-1001.pdf");
    }

    #[test]
    fn test_missing_address_renders_customer_fallback() {
        let mut agg = aggregate(OrderStatus::Pending, vec![]);
        agg.order.shipping_address = None;
        let html = InvoiceDocument::from_aggregate(&agg).render();
        assert!(html.contains("<strong>Customer</strong>"));
    }

    #[test]
    fn test_expected_delivery_block_is_conditional() {
        let mut agg = aggregate(OrderStatus::Shipped, vec![]);
        let without = InvoiceDocument::from_aggregate(&agg).render();
        assert!(!without.contains("Expected Delivery"));

        agg.order.expected_delivery = NaiveDate::from_ymd_opt(2025, 2, 14);
        let with = InvoiceDocument::from_aggregate(&agg).render();
        assert!(with.contains("Expected Delivery"));
        assert!(with.contains("14 Feb 2025"));
    }

    #[test]
    fn test_envelope_roundtrips_document_bytes() {
        let agg = aggregate(OrderStatus::Pending, vec![item("TrueNav-Pro", 1, 100, 100)]);
        let document = InvoiceDocument::from_aggregate(&agg).render();
        let envelope = InvoiceEnvelope::seal(&agg.order.order_number, &document);

        let decoded = STANDARD.decode(envelope.document_base64.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), document);
    }

    #[test]
    fn test_envelope_wire_field_names_are_camel_case() {
        let envelope = InvoiceEnvelope::seal(
            &OrderNumber::try_new("SA-1001".to_string()).unwrap(),
            "<html></html>",
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("documentBase64").is_some());
        assert_eq!(json["fileName"], "invoice-SA-1001.pdf");
    }
}
