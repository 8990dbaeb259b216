pub mod body;
pub mod multipart;

pub use body::{header_str, parse_json_body, query_params, read_body, BodyError, MAX_JSON_BODY_BYTES};
pub use multipart::{find_part, MultipartError, UploadedPart};
