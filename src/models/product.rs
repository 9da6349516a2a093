use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,          // Price per square meter
    #[serde(rename = "type")]
    pub kind: Option<String>,        // Floor type, e.g. "laminado" or "vinilico"
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

// Payload for creating a product
#[derive(Deserialize, Debug, Clone, Default)]
pub struct NewProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

// Partial update, absent fields are left untouched
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

/// One page of the product listing together with its pagination metadata.
#[derive(Serialize, Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub pages: u32,
}
