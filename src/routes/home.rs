use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

/// `GET /`. Plain-text banner, handy for checking a deployment from a browser.
pub async fn home() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("Backend Server is running!")
}
