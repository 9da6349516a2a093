use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    auth::AdminUser,
    error::AppError,
    messages,
    models::product::{NewProduct, ProductPatch},
    state::AppState,
};

#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

// Non-numeric values count as absent, values below 1 as 1
fn clamp_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|v| v.clamp(1, u32::MAX as i64) as u32)
}

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let page = state
        .db
        .list_products(
            query.search.as_deref(),
            clamp_positive(query.page.as_deref()),
            clamp_positive(query.per_page.as_deref()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Lista de produtos",
        "products": page.products,
        "page": page.page,
        "per_page": page.per_page,
        "total": page.total,
        "pages": page.pages,
    })))
}

pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let product = state
        .db
        .find_product(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found(messages::PRODUCT_NOT_FOUND))?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn create(
    state: web::Data<AppState>,
    admin: AdminUser,
    body: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
    let name = super::required(&body.name)
        .ok_or_else(|| AppError::bad_request(messages::MISSING_FIELDS))?;

    let product = state.db.insert_product(name, &body).await?;
    info!("[API] Admin {} created product {}", admin.0.id, product.id);
    Ok(HttpResponse::Created().json(json!({
        "message": messages::PRODUCT_CREATED,
        "product": product,
    })))
}

pub async fn update(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<i64>,
    body: web::Json<ProductPatch>,
) -> Result<HttpResponse, AppError> {
    let product = state
        .db
        .update_product(path.into_inner(), &body)
        .await?
        .ok_or_else(|| AppError::not_found(messages::PRODUCT_NOT_FOUND))?;

    info!("[API] Admin {} updated product {}", admin.0.id, product.id);
    Ok(HttpResponse::Ok().json(json!({
        "message": messages::PRODUCT_UPDATED,
        "product": product,
    })))
}

pub async fn delete(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    if !state.db.delete_product(product_id).await? {
        return Err(AppError::not_found(messages::PRODUCT_NOT_FOUND));
    }
    info!("[API] Admin {} deleted product {}", admin.0.id, product_id);
    Ok(HttpResponse::Ok().json(json!({ "message": messages::PRODUCT_DELETED })))
}
