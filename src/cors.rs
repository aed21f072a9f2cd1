use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Method, Status};
use rocket::{Request, Response};

pub const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Allows cross-origin requests from anywhere.
///
/// Every response gets `Access-Control-Allow-Origin: *`. Preflight requests
/// have no route of their own, so their `404` is turned into an empty `204`
/// listing the allowed methods and echoing the requested headers.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-Origin Resource Sharing",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));

        if request.method() != Method::Options || response.status() != Status::NotFound {
            return;
        }

        response.set_status(Status::NoContent);
        response.set_header(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));
        if let Some(headers) = request.headers().get_one("Access-Control-Request-Headers") {
            response.set_header(Header::new("Access-Control-Allow-Headers", headers.to_owned()));
            response.set_header(Header::new("Vary", "Access-Control-Request-Headers"));
        }
        response.set_sized_body(0, std::io::Cursor::new(""));
    }
}
