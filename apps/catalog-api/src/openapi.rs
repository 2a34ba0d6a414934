use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Create and look up catalog products by sku"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/product", api = domain_catalog::ApiDoc),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_paths_are_documented() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/product/v1"));
        assert!(doc.paths.paths.contains_key("/product/v1/{sku}"));
    }
}
