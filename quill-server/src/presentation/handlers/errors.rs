use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpRequest, HttpResponse, Result};
use serde_json::json;

/// Catch-all for unmatched paths. The original path is carried for
/// display only.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    not_found_page(req.path())
}

/// Rewrites any 404 that reaches the middleware layer into the
/// dedicated page context, so extractor failures (e.g. a malformed
/// post id segment) never leak their parser message.
pub fn render_not_found<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    let response = not_found_page(req.path());
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

pub fn render_server_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    let response = HttpResponse::InternalServerError().json(json!({
        "template": "misc/500.html",
        "status": 500,
    }));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

fn not_found_page(path: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "template": "misc/404.html",
        "status": 404,
        "path": path,
    }))
}
