use derive_more::{Display, Error};
use log::warn;
use ntex::{http, web};

#[derive(Debug, Display, Error)]
pub enum UserError {
    VerificationFailed,
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        warn!("{:#?}", self);

        let body = match self {
            UserError::VerificationFailed => "Verification Failed",
        };

        web::HttpResponse::build(self.status_code())
            .set_header("content-type", "text/plain; charset=utf-8")
            .body(body)
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::VerificationFailed => http::StatusCode::FORBIDDEN,
        }
    }
}
