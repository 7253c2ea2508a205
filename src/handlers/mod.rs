pub mod dashboard;
pub mod file_requests;
pub mod files;
pub mod folders;
pub mod lifecycle;
pub mod versions;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};

/// Fallback location for form-endpoint redirects when the request carries no
/// Referer, mirroring the admin panel's main listing.
const DEFAULT_BACK: &str = "/admin/files";

fn redirect_with_flash(location: &str, kind: &str, message: &str) -> HttpResponse {
    let target = format!("{}?{}={}", location, kind, urlencoding::encode(message));

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, target))
        .finish()
}

fn back_location(req: &HttpRequest) -> String {
    req.headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_BACK.to_string())
}

/// 303 back to the referring page with a success flash in the query string.
pub fn redirect_back_success(req: &HttpRequest, message: &str) -> HttpResponse {
    redirect_with_flash(&back_location(req), "success", message)
}

/// 303 back to the referring page with an error flash in the query string.
pub fn redirect_back_error(req: &HttpRequest, message: &str) -> HttpResponse {
    redirect_with_flash(&back_location(req), "error", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    #[test]
    fn flash_redirect_carries_the_encoded_message() {
        let req = TestRequest::default()
            .insert_header((header::REFERER, "/admin/files/archived"))
            .to_http_request();

        let resp = redirect_back_success(&req, "File archived successfully!");

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp.headers().get(header::LOCATION).unwrap();
        assert_eq!(
            location.to_str().unwrap(),
            "/admin/files/archived?success=File%20archived%20successfully%21"
        );
    }

    #[test]
    fn missing_referer_falls_back_to_the_files_listing() {
        let req = TestRequest::default().to_http_request();

        let resp = redirect_back_error(&req, "File not found.");

        let location = resp.headers().get(header::LOCATION).unwrap();
        assert_eq!(
            location.to_str().unwrap(),
            "/admin/files?error=File%20not%20found."
        );
    }
}
