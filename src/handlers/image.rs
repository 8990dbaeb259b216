use crate::errors::ServerError;
use crate::images::FetchError;
use crate::requests::{parse_json_body, query_params, read_body, MAX_JSON_BODY_BYTES};
use crate::responses::{json_response, ResultResp};
use crate::state::AppState;
use astra::Request;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
struct FetchImageRequest {
    #[serde(default)]
    image_url: Option<String>,
}

/// GET|POST /api/fetch_image
///
/// Reads `image_url` from the JSON body, falling back to the query string
/// for bodiless GETs.
pub fn fetch_image(req: &mut Request, state: &AppState) -> ResultResp {
    let body = read_body(req, MAX_JSON_BODY_BYTES).map_err(|e| {
        ServerError::Internal(format!("An error occurred while fetching the image: {e}"))
    })?;
    let payload: FetchImageRequest = parse_json_body(&body)?;

    let image_url = payload
        .image_url
        .or_else(|| query_params(req).remove("image_url"))
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Please provide an image URL".into()))?;

    info!(%image_url, "fetching image");

    match state.images.fetch_base64(&image_url) {
        Ok(img_data) => json_response(200, &json!({ "success": true, "img_data": img_data })),
        Err(FetchError::Status(status)) => {
            warn!(%image_url, status, "image host refused");
            Err(ServerError::BadRequest(
                "Failed to fetch the image. Please check the URL".into(),
            ))
        }
        Err(e @ (FetchError::Request(_) | FetchError::Body(_))) => {
            warn!(%image_url, error = %e, "image request failed");
            Err(ServerError::BadRequest(format!(
                "Failed to fetch the image. Request exception: {e}"
            )))
        }
        Err(e @ FetchError::TooLarge { .. }) => {
            warn!(%image_url, error = %e, "image too large");
            Err(ServerError::BadRequest(format!("Failed to fetch the image. {e}")))
        }
        Err(e) => Err(ServerError::Internal(format!(
            "Failed to fetch the image. Unexpected error: {e}"
        ))),
    }
}
