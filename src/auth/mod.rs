use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::error::ApiError;

/// Request-scoped identity resolved by the fronting auth layer and passed in
/// via headers. Operations that mutate shared state take this as an explicit
/// parameter; there is no ambient session state.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: i32,
    pub is_admin: bool,
}

fn parse_identity(req: &HttpRequest) -> Result<Identity, ApiError> {
    let user_id = req
        .headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i32>().ok())
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized: Please log in.".to_string()))?;

    let is_admin = req
        .headers()
        .get("X-User-Admin")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    Ok(Identity { user_id, is_admin })
}

impl FromRequest for Identity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_identity(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn identity_is_read_from_headers() {
        let req = TestRequest::default()
            .insert_header(("X-User-Id", "42"))
            .insert_header(("X-User-Admin", "true"))
            .to_http_request();

        let identity = parse_identity(&req).unwrap();
        assert_eq!(identity.user_id, 42);
        assert!(identity.is_admin);
    }

    #[test]
    fn missing_user_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();

        assert!(matches!(
            parse_identity(&req),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn admin_flag_defaults_to_false() {
        let req = TestRequest::default()
            .insert_header(("X-User-Id", "42"))
            .to_http_request();

        let identity = parse_identity(&req).unwrap();
        assert!(!identity.is_admin);
    }
}
