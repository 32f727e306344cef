//! Runtime used by generated operation functions
//!
//! A [`Client`] encodes an [`Operation`] as a `{ "query", "variables" }`
//! request, hands it to a [`Transport`] and decodes the `data` of the
//! response into the type the generated function expects.
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

mod discriminator;
mod error;
mod operation;
mod scalar;

pub use discriminator::{unmatched_type_name, AbstractKind, DecodeError};
pub use error::{Error, Location, ServerError, ServerErrors, TransportError};
pub use operation::Operation;
pub use scalar::{Absent, Any, Map, Time, Upload};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Per-call settings passed through to the transport
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl Context {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// An encoded operation ready to be sent
#[derive(Debug)]
pub struct Request<'o> {
    /// JSON `{ "query", "variables" }` document
    pub body: Vec<u8>,
    pub uploads: &'o BTreeMap<String, Upload>,
}

impl Request<'_> {
    /// Whether the request has to be sent as a multipart form
    pub fn is_multipart(&self) -> bool {
        !self.uploads.is_empty()
    }

    pub fn content_type(&self) -> &'static str {
        if self.is_multipart() {
            MULTIPART_CONTENT_TYPE
        } else {
            JSON_CONTENT_TYPE
        }
    }

    /// The `map` part of a multipart request: the form field of every upload
    /// and the variable path it fills
    pub fn upload_map(&self) -> BTreeMap<String, Vec<String>> {
        self.uploads
            .keys()
            .enumerate()
            .map(|(index, key)| (index.to_string(), vec![format!("variables.{key}")]))
            .collect()
    }
}

/// Carries requests to a GraphQL server and returns the raw response body
pub trait Transport {
    fn send(&self, ctx: &Context, request: &Request<'_>) -> Result<Vec<u8>, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&Context, &Request<'_>) -> Result<Vec<u8>, TransportError>,
{
    fn send(&self, ctx: &Context, request: &Request<'_>) -> Result<Vec<u8>, TransportError> {
        self(ctx, request)
    }
}

#[derive(serde::Serialize)]
struct RequestBody<'o> {
    query: &'o str,
    variables: &'o BTreeMap<String, serde_json::Value>,
}

#[derive(serde::Deserialize)]
struct ResponseBody<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

pub struct Client {
    transport: Box<dyn Transport>,
}

impl Client {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Client {
            transport: Box::new(transport),
        }
    }

    /// Send `operation` and decode the `data` of the response
    pub fn execute<T: DeserializeOwned>(&self, ctx: &Context, operation: &Operation) -> Result<T, Error> {
        let body = serde_json::to_vec(&RequestBody {
            query: operation.query(),
            variables: operation.variables(),
        })
        .map_err(Error::Encode)?;
        let request = Request {
            body,
            uploads: operation.uploads(),
        };
        debug!(
            bytes = request.body.len(),
            uploads = request.uploads.len(),
            "sending operation"
        );
        let response = self.transport.send(ctx, &request).map_err(Error::Transport)?;
        let response: ResponseBody<T> = serde_json::from_slice(&response).map_err(Error::Decode)?;
        if let Some(errors) = ServerErrors::from_vec(response.errors) {
            return Err(Error::Server(errors));
        }
        response.data.ok_or(Error::MissingData)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
