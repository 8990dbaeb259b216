// src/tests/utils.rs
use crate::extraction::QueryExtractor;
use crate::images::ImageFetcher;
use crate::openai::{AudioFile, ChatMessage, ChatModel, OpenAiError, SpeechToText};
use crate::state::AppState;
use astra::{Body, ConnectionInfo, Request, Response, ResponseBuilder, Server};
use serde_json::Value;
use std::collections::VecDeque;
use std::io::Read;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const BOUNDARY: &str = "----property-test-boundary";

// ---------------------------------------------------------------------------
// Fake model backends
// ---------------------------------------------------------------------------

pub type Outcome = Result<String, (u16, String)>;

fn to_result(outcome: &Outcome) -> Result<String, OpenAiError> {
    match outcome {
        Ok(text) => Ok(text.clone()),
        Err((status, message)) => Err(OpenAiError::Api {
            status: *status,
            message: message.clone(),
        }),
    }
}

#[derive(Clone)]
pub struct FakeSpeech {
    outcome: Outcome,
    pub received: Arc<Mutex<Vec<AudioFile>>>,
}

impl FakeSpeech {
    pub fn replying(transcript: &str) -> Self {
        Self {
            outcome: Ok(transcript.to_string()),
            received: Arc::default(),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            outcome: Err((status, message.to_string())),
            received: Arc::default(),
        }
    }
}

impl SpeechToText for FakeSpeech {
    fn transcribe(&self, audio: AudioFile) -> Result<String, OpenAiError> {
        self.received.lock().unwrap().push(audio);
        to_result(&self.outcome)
    }
}

#[derive(Clone)]
pub struct FakeChat {
    outcome: Outcome,
    pub prompts: Arc<Mutex<Vec<(Vec<ChatMessage>, f32)>>>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            outcome: Ok(reply.to_string()),
            prompts: Arc::default(),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            outcome: Err((status, message.to_string())),
            prompts: Arc::default(),
        }
    }
}

impl ChatModel for FakeChat {
    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, OpenAiError> {
        self.prompts
            .lock()
            .unwrap()
            .push((messages.to_vec(), temperature));
        to_result(&self.outcome)
    }
}

/// App state wired to fake model backends and a real image fetcher.
pub fn test_state(speech: FakeSpeech, chat: FakeChat) -> AppState {
    test_state_with_limit(speech, chat, 1024 * 1024)
}

pub fn test_state_with_limit(speech: FakeSpeech, chat: FakeChat, max_upload: usize) -> AppState {
    let images = ImageFetcher::new(Duration::from_secs(5), 1024 * 1024).expect("image fetcher");
    state_with(images, speech, chat, max_upload)
}

/// State around a caller-configured image fetcher and idle model fakes.
pub fn image_state(images: ImageFetcher) -> AppState {
    state_with(images, FakeSpeech::replying(""), FakeChat::replying("{}"), 1024)
}

fn state_with(
    images: ImageFetcher,
    speech: FakeSpeech,
    chat: FakeChat,
    max_upload_bytes: usize,
) -> AppState {
    AppState {
        images,
        speech: Box::new(speech),
        chat: Box::new(chat),
        extractor: QueryExtractor::property_search().expect("extraction prompt"),
        max_upload_bytes,
    }
}

pub fn idle_state() -> AppState {
    test_state(FakeSpeech::replying(""), FakeChat::replying("{}"))
}

// ---------------------------------------------------------------------------
// Request / response helpers
// ---------------------------------------------------------------------------

pub fn request(method: &str, path: &str, body: Vec<u8>) -> Request {
    let mut req = Request::new(Body::from(body));
    *req.method_mut() = method.parse().unwrap();
    *req.uri_mut() = path.parse().unwrap();
    req
}

pub fn json_request(method: &str, path: &str, body: &Value) -> Request {
    let mut req = request(method, path, body.to_string().into_bytes());
    req.headers_mut()
        .insert("Content-Type", "application/json".parse().unwrap());
    req
}

/// `parts` are `(field name, file name, bytes)`; a `None` file name makes a
/// plain text field.
pub fn multipart_request(path: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match file_name {
            Some(f) => format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                 Content-Type: audio/wav\r\n\r\n"
            ),
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut req = request("POST", path, body);
    req.headers_mut().insert(
        "Content-Type",
        format!("multipart/form-data; boundary={BOUNDARY}")
            .parse()
            .unwrap(),
    );
    req
}

pub fn body_bytes(mut resp: Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    bytes
}

pub fn body_json(resp: Response) -> Value {
    let bytes = body_bytes(resp);
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response was not JSON ({e}): {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

// ---------------------------------------------------------------------------
// Throwaway upstream HTTP server
// ---------------------------------------------------------------------------

pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Canned {
    pub fn bytes(status: u16, content_type: &'static str, body: &[u8]) -> Self {
        Self {
            status,
            content_type,
            body: body.to_vec(),
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self::bytes(status, "application/json", body.to_string().as_bytes())
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path plus query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// An astra server on a free local port. Answers requests with the canned
/// responses in order, then with 500 once they run out.
pub struct MockUpstream {
    addr: SocketAddr,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn start(responses: Vec<Canned>) -> Self {
        let server = Server::bind("127.0.0.1:0");
        let addr = server.local_addr().expect("mock upstream addr");
        let queue = Mutex::new(VecDeque::from(responses));
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&recorded);

        thread::spawn(move || {
            let _ = server.serve(move |mut req: Request, _info: ConnectionInfo| {
                sink.lock().unwrap().push(record(&mut req));
                let canned = queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Canned::bytes(500, "text/plain", b"no canned response left"));

                ResponseBuilder::new()
                    .status(canned.status)
                    .header("Content-Type", canned.content_type)
                    .body(Body::from(canned.body))
                    .unwrap()
            });
        });

        Self { addr, recorded }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }
}

fn record(req: &mut Request) -> Recorded {
    let mut body = Vec::new();
    req.body_mut().reader().read_to_end(&mut body).unwrap();

    Recorded {
        method: req.method().to_string(),
        path: req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default(),
        headers: req
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
            .collect(),
        body,
    }
}

/// A listener that accepts connections at the TCP level but never answers.
pub fn silent_upstream() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind silent upstream");
    let url = format!("http://{}/never", listener.local_addr().unwrap());
    (listener, url)
}

/// An address nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind throwaway port");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/gone.png")
}
