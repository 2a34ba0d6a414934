use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::Product;
use crate::notifier::ProductNotifier;
use crate::service::CatalogService;
use crate::store::ProductStore;

pub const TAG: &str = "Products";

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(create_product, get_product),
    components(
        schemas(Product),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the catalog router.
///
/// `PUT /v1` is the primary create route; `POST /v1` is accepted as well.
pub fn router<S, N>(service: CatalogService<S, N>) -> Router
where
    S: ProductStore,
    N: ProductNotifier + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/v1", put(create_product).post(create_product))
        .route("/v1/{sku}", get(get_product))
        .with_state(shared_service)
}

/// Create a product if its sku is not yet in the catalog
#[utoipa::path(
    put,
    path = "/v1",
    tag = TAG,
    request_body = Product,
    responses(
        (status = 201, description = "Product accepted", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<S: ProductStore, N: ProductNotifier + 'static>(
    State(service): State<Arc<CatalogService<S, N>>>,
    ValidatedJson(product): ValidatedJson<Product>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by sku
#[utoipa::path(
    get,
    path = "/v1/{sku}",
    tag = TAG,
    params(
        ("sku" = String, Path, description = "Stock-keeping code")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<S: ProductStore, N: ProductNotifier + 'static>(
    State(service): State<Arc<CatalogService<S, N>>>,
    Path(sku): Path<String>,
) -> CatalogResult<Json<Product>> {
    let product = service.get_product(&sku).await?;
    Ok(Json(product))
}
