pub mod content;
pub mod product;
pub mod review;
pub mod user;
