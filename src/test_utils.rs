use crate::auth::{AccessToken, Credentials};
use crate::clock::{Clock, DateTime, Utc};
use crate::http::{HTTPError, HTTPResult};
use crate::reddit::service::{Endpoint, Service};
use reqwest::StatusCode;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

/// A request made through [`TestService::get_resource()`].
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub endpoint: Endpoint,
    pub uri: String,
    pub params: Vec<(&'static str, String)>,
    /// Value of the bearer token sent with the request, if any.
    pub token: Option<String>,
}

impl Request {
    /// Value of the query parameter `name`, if it was sent.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Serves responses from `tests/data` instead of Reddit.
///
/// Listings and searches are read from `new_<suffix>.json` and
/// `search_<suffix>.json`, comment pages from `comments_<post id>.json`,
/// continued threads from `thread_<comment id>.json`, and expanded stubs
/// from `morechildren_<suffix>.json`. Missing files are reported as
/// HTTP 404.
#[derive(Debug)]
pub struct TestService {
    suffix: String,
    token_body: Option<String>,
    fixtures: HashMap<String, String>,
    echo_more_children: bool,
    requests: Mutex<Vec<Request>>,
    token_requests: AtomicUsize,
}

impl TestService {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: String::from(suffix),
            token_body: Some(String::from(
                r#"{"access_token": "test-token", "token_type": "bearer", "expires_in": 86400}"#,
            )),
            fixtures: HashMap::new(),
            echo_more_children: false,
            requests: Mutex::new(vec![]),
            token_requests: AtomicUsize::new(0),
        }
    }

    /// Responds to token requests with HTTP 401.
    pub fn rejecting_credentials(self) -> Self {
        Self {
            token_body: None,
            ..self
        }
    }

    /// Responds to token requests with `body`.
    pub fn with_token_body(self, body: &str) -> Self {
        Self {
            token_body: Some(String::from(body)),
            ..self
        }
    }

    /// Serves `body` in place of `tests/data/<name>.json`.
    pub fn with_fixture(mut self, name: &str, body: &str) -> Self {
        self.fixtures.insert(String::from(name), String::from(body));
        self
    }

    /// Answers every `morechildren` request with one bare comment for
    /// each requested ID.
    pub fn echoing_more_children(self) -> Self {
        Self {
            echo_more_children: true,
            ..self
        }
    }

    /// URIs requested so far, in order. Token requests are not included.
    pub fn requests(&self) -> Vec<String> {
        self.recorded().into_iter().map(|req| req.uri).collect()
    }

    /// Requests made so far, in order. Token requests are not included.
    pub fn recorded(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// IDs sent with each `morechildren` request, in order.
    pub fn more_children_batches(&self) -> Vec<Vec<String>> {
        self.recorded()
            .into_iter()
            .filter_map(|req| match req.endpoint {
                Endpoint::MoreChildren { children, .. } => Some(children),
                _ => None,
            })
            .collect()
    }

    /// Number of token requests made so far.
    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    fn fixture(&self, endpoint: &Endpoint) -> String {
        match endpoint {
            Endpoint::New { .. } => format!("new_{}", self.suffix),
            Endpoint::Comments { post_id, .. } => format!("comments_{post_id}"),
            Endpoint::Thread { comment_id, .. } => format!("thread_{comment_id}"),
            Endpoint::Search { .. } => format!("search_{}", self.suffix),
            Endpoint::MoreChildren { .. } => format!("morechildren_{}", self.suffix),
        }
    }

    fn body(&self, endpoint: &Endpoint) -> HTTPResult<String> {
        if let Endpoint::MoreChildren { children, .. } = endpoint {
            if self.echo_more_children {
                let things: Vec<_> = children
                    .iter()
                    .map(|id| json!({"kind": "t1", "data": {"id": id}}))
                    .collect();
                return Ok(json!({"json": {"errors": [], "data": {"things": things}}}).to_string());
            }
        }

        let name = self.fixture(endpoint);
        match self.fixtures.get(&name) {
            Some(body) => Ok(body.clone()),
            None => fs::read_to_string(format!("tests/data/{name}.json"))
                .map_err(|_| HTTPError::Http(StatusCode::NOT_FOUND)),
        }
    }
}

impl Service for TestService {
    async fn get_resource(
        &self,
        endpoint: &Endpoint,
        token: Option<&AccessToken>,
    ) -> HTTPResult<String> {
        self.requests.lock().unwrap().push(Request {
            endpoint: endpoint.clone(),
            uri: endpoint.uri(token.is_some()),
            params: endpoint.params(),
            token: token.map(|token| String::from(token.value())),
        });
        self.body(endpoint)
    }

    async fn request_token(&self, _credentials: &Credentials) -> HTTPResult<String> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        self.token_body
            .clone()
            .ok_or(HTTPError::Http(StatusCode::UNAUTHORIZED))
    }
}

#[derive(Debug)]
pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}
