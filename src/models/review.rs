// src/models/review.rs
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i64,
    pub product_id: i64,           // ID of the product the review is associated with
    pub user_id: i64,              // ID of the user who submitted the review
    pub rating: Option<u8>,        // 1 to 5 stars, absent for comment-only reviews
    pub comment: Option<String>,
    pub created_at: Option<String>,
}

// A comment as listed under a product, joined with its author's name
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReviewEntry {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub comment: Option<String>,
    pub created_at: Option<String>, // "%d/%m/%Y %H:%M"
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RatingBucket {
    pub rating: u8,
    pub count: i64,
}
