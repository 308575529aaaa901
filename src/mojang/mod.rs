/// Authentication API
pub mod auth;
/// Authentication API error types
pub mod error;

/// Post a JSON string to a URL.
async fn http_post_json(
    client: &reqwest::Client,
    url: &str,
    json: String,
) -> std::result::Result<reqwest::Response, reqwest::Error> {
    client
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(json)
        .send()
        .await
}
