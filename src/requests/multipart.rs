use bytes::Bytes;
use futures::executor::block_on;
use futures::{future, stream};
use mime::Mime;
use multer::Multipart;
use std::convert::Infallible;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MultipartError {
    #[error("request is not multipart/form-data")]
    NotMultipart,
    #[error("malformed multipart body: {0}")]
    Malformed(#[from] multer::Error),
}

/// One file part pulled out of a multipart form.
#[derive(Debug)]
pub struct UploadedPart {
    pub file_name: Option<String>,
    pub content_type: Option<Mime>,
    pub data: Bytes,
}

/// Find the part named `field` in an already-buffered multipart body.
///
/// The worker thread is blocking, so the parser is driven to completion
/// in place over a single-chunk stream.
pub fn find_part(
    content_type: Option<&str>,
    body: Vec<u8>,
    field: &str,
) -> Result<Option<UploadedPart>, MultipartError> {
    let content_type = content_type.ok_or(MultipartError::NotMultipart)?;
    let boundary =
        multer::parse_boundary(content_type).map_err(|_| MultipartError::NotMultipart)?;

    let chunks = stream::once(future::ready(Ok::<Bytes, Infallible>(Bytes::from(body))));
    let mut multipart = Multipart::new(chunks, boundary);

    block_on(async move {
        while let Some(part) = multipart.next_field().await? {
            if part.name() != Some(field) {
                continue;
            }
            let file_name = part.file_name().map(str::to_owned);
            let content_type = part.content_type().cloned();
            let data = part.bytes().await?;

            return Ok(Some(UploadedPart {
                file_name,
                content_type,
                data,
            }));
        }
        Ok::<_, MultipartError>(None)
    })
}
