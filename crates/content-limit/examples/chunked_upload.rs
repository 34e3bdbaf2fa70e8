use std::convert::Infallible;

use bytes::Bytes;
use futures::stream;
use http::{Method, Request};
use http_body::Frame;
use http_body_util::{BodyExt, StreamBody};
use micro_content_limit::{BodyError, ContentLimitConfig, ContentLimitPolicy};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

static CHUNKS: [&[u8]; 4] = [b"hello ", b"chunked ", b"world", b"!"];

fn upload() -> Request<StreamBody<stream::Iter<std::vec::IntoIter<Result<Frame<Bytes>, Infallible>>>>> {
    let frames: Vec<Result<Frame<Bytes>, Infallible>> =
        CHUNKS.iter().map(|&chunk| Ok(Frame::data(Bytes::from_static(chunk)))).collect();

    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(http::header::TRANSFER_ENCODING, "chunked")
        .body(StreamBody::new(stream::iter(frames)))
        .expect("upload request should be valid")
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match ContentLimitConfig::from_json_str(r#"{"limit": 16}"#) {
        Ok(config) => config,
        Err(e) => {
            error!(cause = %e, "invalid configuration");
            return;
        }
    };
    let policy = ContentLimitPolicy::new(config);

    let request = match policy.apply(upload()) {
        Ok(request) => request,
        Err(failure) => {
            warn!(status = %failure.status(), "request rejected before reading the body");
            return;
        }
    };

    match request.into_body().collect().await {
        Ok(collected) => {
            info!(size = collected.to_bytes().len(), "received request body");
        }
        Err(e) => match e.downcast_ref::<BodyError<Infallible>>().and_then(BodyError::failure) {
            Some(failure) => {
                let response = failure.to_response();
                warn!(status = %response.status(), length = ?failure.detail("length"), "request rejected mid-stream");
            }
            None => error!(cause = %e, "failed to read request body"),
        },
    }
}
