//! Editorial content managed from the admin dashboard: tips, FAQs and the
//! company's social-media links.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tip {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TipPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct FaqPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SocialMedia {
    pub id: i64,
    pub platform: String,
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SocialMediaPatch {
    pub platform: Option<String>,
    pub url: Option<String>,
}
