//! Integration tests for the administrator dashboard.
//!
//! Covers catalog upload, the catalog filter seen by customers, the order
//! report and both export formats.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::io::Cursor;

use calamine::{Data, Reader};
use serde_json::json;
use tany_orders_integration_tests::{ADMIN_PASSWORD, TestContext, json};

#[tokio::test]
async fn test_admin_login_shows_dashboard() {
    let ctx = TestContext::start().await;
    let browser = ctx.browser();

    let resp = browser
        .post_form(
            "/auth/admin/login",
            &[("username", "root"), ("password", ADMIN_PASSWORD)],
        )
        .await;
    assert_eq!(resp.status(), 401);
    assert_eq!(json(resp).await["error"], "Invalid admin credentials");

    let admin = ctx.admin().await;
    let body = json(admin.get("/").await).await;
    assert_eq!(body["page"], "admin_dashboard");
    assert_eq!(body["dashboard"]["report"]["total_orders"], 0);

    // The dashboard is fixed; customer pages are out of reach.
    let resp = admin.post_form("/nav", &[("to", "catalog")]).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_admin_routes_reject_customers() {
    let ctx = TestContext::start().await;
    let customer = ctx.customer("sneaky@example.com", "pw").await;

    assert_eq!(customer.get("/admin/orders").await.status(), 401);
    assert_eq!(customer.get("/admin/products").await.status(), 401);
    let resp = customer
        .upload("catalog.csv", b"item_code,description\nX,Y\n".to_vec())
        .await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_upload_applies_defaults() {
    let ctx = TestContext::start().await;
    let admin = ctx.admin().await;

    let resp = admin
        .upload(
            "catalog.csv",
            b"item_code,description,brand\nA1,Whole milk,Tany\nB2,Roma tomatoes,\n".to_vec(),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body = json(resp).await;
    assert_eq!(body["uploaded"], 2);
    assert_eq!(body["message"], "Uploaded 2 products successfully!");

    let products = json(admin.get("/admin/products").await).await;
    assert_eq!(
        products,
        json!([
            {
                "item_code": "A1",
                "description": "Whole milk",
                "category": "Uncategorized",
                "brand": "Tany",
                "image": null,
                "units": ["Case", "Each"],
                "purchasable": true
            },
            {
                "item_code": "B2",
                "description": "Roma tomatoes",
                "category": "Uncategorized",
                "brand": null,
                "image": null,
                "units": ["Case", "Each"],
                "purchasable": true
            }
        ])
    );
}

#[tokio::test]
async fn test_upload_ignores_extra_columns_and_defaults_description() {
    let ctx = TestContext::start().await;
    let admin = ctx.admin().await;

    let resp = admin
        .upload(
            "catalog.csv",
            b"item_code,price,category\nA1,4.99,Dairy\n".to_vec(),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let products = json(admin.get("/admin/products").await).await;
    assert_eq!(products[0]["item_code"], "A1");
    assert_eq!(products[0]["description"], "");
    assert_eq!(products[0]["category"], "Dairy");
    assert!(products[0].get("price").is_none());
}

#[tokio::test]
async fn test_rejected_upload_keeps_catalog() {
    let ctx = TestContext::start().await;
    let admin = ctx.admin().await;
    admin
        .upload("catalog.csv", b"item_code,description\nA1,Whole milk\n".to_vec())
        .await;

    let resp = admin
        .upload("catalog.csv", b"description\nno codes here\n".to_vec())
        .await;
    assert_eq!(resp.status(), 400);

    let resp = admin.upload("catalog.pdf", b"%PDF".to_vec()).await;
    assert_eq!(resp.status(), 400);

    let products = json(admin.get("/admin/products").await).await;
    assert_eq!(products.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_category_filter_scenario() {
    let ctx = TestContext::start().await;
    let admin = ctx.admin().await;
    admin
        .upload(
            "catalog.csv",
            b"item_code,description,category\nA1,Whole milk,Dairy\nB2,Roma tomatoes,Produce\n"
                .to_vec(),
        )
        .await;

    let customer = ctx.customer("filter@example.com", "pw").await;

    let body = json(customer.get("/catalog?category=Dairy").await).await;
    let codes: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["item_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["A1"]);
    assert_eq!(body["categories"], json!(["Dairy", "Produce"]));

    let body = json(customer.get("/catalog?category=All&q=TOMATO").await).await;
    assert_eq!(body["products"][0]["item_code"], "B2");

    let categories = json(customer.get("/catalog/categories").await).await;
    assert_eq!(categories, json!(["Dairy", "Produce"]));

    let product = json(customer.get("/catalog/A1").await).await;
    assert_eq!(product["description"], "Whole milk");
    assert_eq!(json(customer.get("/").await).await["page"], "product_detail");

    assert_eq!(customer.get("/catalog/ZZZ").await.status(), 404);
}

#[tokio::test]
async fn test_report_and_exports() {
    let ctx = TestContext::start().await;
    let admin = ctx.admin().await;
    admin
        .upload(
            "catalog.csv",
            b"item_code,description\nSKU1,Rice 5kg\nSKU2,\"Beans, black\"\n".to_vec(),
        )
        .await;

    let customer = ctx.browser();
    customer
        .signup("Ann", "Lee", "Acme, Inc.", "ann@acme.com", "pw1")
        .await;
    customer.login("ann@acme.com", "pw1").await;
    customer.add_to_cart("SKU1", "Case", 3).await;
    customer.add_to_cart("SKU2", "Each", 12).await;
    assert_eq!(customer.submit_order().await.status(), 200);

    let report = json(admin.get("/admin/orders").await).await;
    assert_eq!(report["total_orders"], 1);
    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["customer_name"], "Ann Lee");
    assert_eq!(rows[0]["uom"], "Case");
    assert_eq!(rows[1]["quantity"], 12);

    // CSV
    let resp = admin.get("/admin/orders/export.csv").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/csv");
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=\"tany_foods_orders.csv\""
    );
    let text = resp.text().await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Order ID,Timestamp,Customer Name,Company Name,Email,Item Code,Description,Quantity,UOM"
    );
    assert!(lines[2].ends_with(",\"Acme, Inc.\",ann@acme.com,SKU2,\"Beans, black\",12,Each"));

    // XLSX
    let resp = admin.get("/admin/orders/export.xlsx").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=\"tany_foods_orders.xlsx\""
    );
    let bytes = resp.bytes().await.unwrap().to_vec();
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Orders").unwrap();
    let sheet: Vec<&[Data]> = range.rows().collect();
    assert_eq!(sheet.len(), 3);
    assert_eq!(sheet[1][5], Data::String("SKU1".to_string()));
    assert_eq!(sheet[1][7], Data::Float(3.0));
}

#[tokio::test]
async fn test_empty_export_has_header_only() {
    let ctx = TestContext::start().await;
    let admin = ctx.admin().await;

    let text = admin
        .get("/admin/orders/export.csv")
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(text.lines().count(), 1);
}
