use serde_json::Value;

use crate::data_objects::{OrderDetail, ProductLine};

/// Extracts a structured [`OrderDetail`] from the loosely-typed `data` payload of a detail response.
///
/// Pure and total: a missing or mis-typed field never fails the fetch, it simply yields the field's default.
/// The interesting paths are `details.orderId`, `details.paidAt`, `details.status.name` and the `products` array.
pub fn extract_order_detail(data: &Value) -> OrderDetail {
    let details = &data["details"];
    let order_id = string_field(details, "orderId");
    let paid_at = string_field(details, "paidAt");
    let status = string_field(&details["status"], "name");
    let products = data["products"].as_array().map(|list| list.iter().map(product_line).collect()).unwrap_or_default();
    OrderDetail { order_id, paid_at, status, products }
}

fn product_line(raw: &Value) -> ProductLine {
    ProductLine {
        product_name: string_field(raw, "productName"),
        price: raw["price"].as_f64().unwrap_or_default(),
        amount: raw["amount"].as_i64().unwrap_or_default(),
    }
}

fn string_field(value: &Value, field: &str) -> String {
    value[field].as_str().unwrap_or_default().to_string()
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn a_complete_payload_extracts_every_field() {
        let data = json!({
            "details": {
                "orderId": "878710564238701944",
                "paidAt": "1718236800",
                "status": { "name": "trade succeeded" },
            },
            "products": [
                { "productName": "enamel pin", "price": 19.99, "amount": 3 },
                { "productName": "sticker sheet", "price": 4.5, "amount": 1 },
            ],
        });
        let detail = extract_order_detail(&data);
        assert_eq!(detail.order_id, "878710564238701944");
        assert_eq!(detail.paid_at, "1718236800");
        assert_eq!(detail.status, "trade succeeded");
        assert_eq!(detail.products, vec![
            ProductLine { product_name: "enamel pin".to_string(), price: 19.99, amount: 3 },
            ProductLine { product_name: "sticker sheet".to_string(), price: 4.5, amount: 1 },
        ]);
    }

    #[test]
    fn missing_fields_become_defaults() {
        let detail = extract_order_detail(&json!({}));
        assert_eq!(detail, OrderDetail::default());

        let detail = extract_order_detail(&json!({ "details": { "orderId": "42" } }));
        assert_eq!(detail.order_id, "42");
        assert_eq!(detail.paid_at, "");
        assert_eq!(detail.status, "");
        assert!(detail.products.is_empty());
    }

    #[test]
    fn mistyped_fields_do_not_fail_the_extraction() {
        let data = json!({
            "details": {
                "orderId": 878710564238701944_i64,
                "paidAt": 1718236800,
                "status": "trade succeeded",
            },
            "products": [
                { "productName": 7, "price": "19.99", "amount": "3" },
            ],
        });
        let detail = extract_order_detail(&data);
        assert_eq!(detail.order_id, "");
        assert_eq!(detail.paid_at, "");
        assert_eq!(detail.status, "", "status.name only counts when status is an object");
        assert_eq!(detail.products, vec![ProductLine::default()]);
    }

    #[test]
    fn a_non_array_products_field_yields_no_products() {
        let detail = extract_order_detail(&json!({ "products": "none" }));
        assert!(detail.products.is_empty());
    }
}
