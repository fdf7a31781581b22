//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::request::Parts;
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;

use crate::payload::{self, Payload};

/// An incoming HTTP request with its body fully collected.
pub struct Request {
    head: Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(head: Parts, body: Bytes, params: HashMap<String, String>) -> Self {
        Self { head, body, params }
    }

    pub fn method(&self) -> &Method { &self.head.method }
    pub fn path(&self) -> &str { self.head.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.head.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-visible-ASCII values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name)?.to_str().ok()
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/delete/{id:int}`, `req.param("id")` on `/delete/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Reads the body as a JSON document of type `T`.
    ///
    /// See [`Payload`] for how absent and malformed bodies are told apart.
    pub fn json_body<T: DeserializeOwned>(&self) -> Payload<T> {
        let content_type = self.head.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        payload::parse(content_type, &self.body)
    }
}
