//! Named HTTP status codes for response helpers.

use std::str::FromStr;

use axum::http::StatusCode;

/// Response kinds with a fixed HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Success,
    Created,
    Accepted,
    NoContent,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Conflict,
    UnprocessableEntity,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
}

impl ResponseKind {
    pub const ALL: [ResponseKind; 14] = [
        ResponseKind::Success,
        ResponseKind::Created,
        ResponseKind::Accepted,
        ResponseKind::NoContent,
        ResponseKind::BadRequest,
        ResponseKind::Unauthorized,
        ResponseKind::Forbidden,
        ResponseKind::NotFound,
        ResponseKind::MethodNotAllowed,
        ResponseKind::Conflict,
        ResponseKind::UnprocessableEntity,
        ResponseKind::InternalServerError,
        ResponseKind::BadGateway,
        ResponseKind::ServiceUnavailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Success => "success",
            ResponseKind::Created => "created",
            ResponseKind::Accepted => "accepted",
            ResponseKind::NoContent => "no_content",
            ResponseKind::BadRequest => "bad_request",
            ResponseKind::Unauthorized => "unauthorized",
            ResponseKind::Forbidden => "forbidden",
            ResponseKind::NotFound => "not_found",
            ResponseKind::MethodNotAllowed => "method_not_allowed",
            ResponseKind::Conflict => "conflict",
            ResponseKind::UnprocessableEntity => "unprocessable_entity",
            ResponseKind::InternalServerError => "internal_server_error",
            ResponseKind::BadGateway => "bad_gateway",
            ResponseKind::ServiceUnavailable => "service_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ResponseKind::Success => StatusCode::OK,
            ResponseKind::Created => StatusCode::CREATED,
            ResponseKind::Accepted => StatusCode::ACCEPTED,
            ResponseKind::NoContent => StatusCode::NO_CONTENT,
            ResponseKind::BadRequest => StatusCode::BAD_REQUEST,
            ResponseKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ResponseKind::Forbidden => StatusCode::FORBIDDEN,
            ResponseKind::NotFound => StatusCode::NOT_FOUND,
            ResponseKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ResponseKind::Conflict => StatusCode::CONFLICT,
            ResponseKind::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ResponseKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ResponseKind::BadGateway => StatusCode::BAD_GATEWAY,
            ResponseKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl FromStr for ResponseKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResponseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Status code for a response kind name; unknown names map to 200.
pub fn get_status_code(response_type: &str) -> u16 {
    response_type
        .parse::<ResponseKind>()
        .map(|kind| kind.status().as_u16())
        .unwrap_or(200)
}
