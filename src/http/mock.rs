//! Mock HTTP client for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Canned reply for one request.
#[derive(Debug)]
pub enum Reply {
    /// Respond with the status and body.
    Respond(http::StatusCode, String),
    /// Fail with a timeout.
    Timeout,
    /// Fail with a connection error.
    Refused,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Respond(http::StatusCode::OK, body.into())
    }

    pub fn status(status: u16) -> Self {
        Self::Respond(
            http::StatusCode::from_u16(status).unwrap(),
            String::new(),
        )
    }

    fn into_result(self) -> Result<HttpResponse, HttpError> {
        match self {
            Self::Respond(status, body) => Ok(HttpResponse::new(
                status,
                http::HeaderMap::new(),
                body.into_bytes(),
            )),
            Self::Timeout => Err(HttpError::Timeout),
            Self::Refused => Err(HttpError::Connection("connection refused".into())),
        }
    }
}

/// Mock client that replays a scripted sequence of replies and records
/// every request it receives.
///
/// Once the script is exhausted every further request gets a 200 with an
/// empty body.
#[derive(Debug, Default)]
pub struct MockClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::ok(""));
        reply.into_result()
    }
}
