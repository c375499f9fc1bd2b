//! Remote product catalog backing the insert-product popover.

use std::sync::mpsc::Sender;
use std::thread;

use anyhow::{Context, Result};
use egui_phosphor::regular as icons;
use egui_popover_menu::{FetchReply, ItemFetcher, PopoverItem};
use serde::Deserialize;

use crate::app::SheetAction;
use crate::config::CatalogConfig;

/// One product as served by the catalog endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    products: Vec<ProductRecord>,
}

/// Looks up candidate products for the insert-product popover.
pub struct CatalogFetcher {
    config: CatalogConfig,
}

impl CatalogFetcher {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }
}

impl ItemFetcher<SheetAction> for CatalogFetcher {
    fn fetch(&mut self, query: &str, generation: u64, reply: Sender<FetchReply<SheetAction>>) {
        let config = self.config.clone();
        let query = query.to_string();
        thread::spawn(move || {
            let result = fetch_products(&config, &query)
                .map(|records| records.into_iter().map(product_item).collect())
                .map_err(|e| format!("{:#}", e));
            // The menu may be gone by the time the reply arrives.
            let _ = reply.send(FetchReply { generation, result });
        });
    }
}

fn fetch_products(config: &CatalogConfig, query: &str) -> Result<Vec<ProductRecord>> {
    let mut request = ureq::get(config.endpoint.as_str()).header(
        "Authorization",
        &format!("Bearer {}", config.api_token),
    );
    if !query.trim().is_empty() {
        request = request.query("q", query.trim());
    }
    let response: CatalogResponse = request
        .call()
        .context("Failed to request product catalog")?
        .into_body()
        .read_json()
        .context("Failed to parse product catalog response")?;
    Ok(response.products)
}

/// Wrap a catalog record into an insertable menu item.
pub fn product_item(record: ProductRecord) -> PopoverItem<SheetAction> {
    let label = format!("{} ({})", record.title, record.category);
    PopoverItem::new(label, SheetAction::InsertProduct(record.title)).with_icon(icons::PACKAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_json_maps_to_insert_items() {
        let response: CatalogResponse = serde_json::from_str(
            r#"{"products": [
                {"title": "Monitor Arm", "category": "office", "price": 49.9},
                {"title": "Desk Mat", "category": "office"}
            ]}"#,
        )
        .unwrap();

        let items: Vec<_> = response.products.into_iter().map(product_item).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "Monitor Arm (office)");
        assert_eq!(
            items[0].action,
            Some(SheetAction::InsertProduct("Monitor Arm".to_string()))
        );
        assert!(!items[0].confirmation_required);
    }
}
