//! # Request descriptors.
//!
//! The orchestrator never looks inside a request. It only asks for
//! [`RequestDescriptor::target`] to derive a default group, then hands the
//! descriptor to the executor untouched.

use std::fmt;

/// Caller-supplied description of the action to perform.
pub trait RequestDescriptor: Send + Sync + 'static {
    /// Identity of the endpoint; used as the group when none is set.
    fn target(&self) -> &str;
}

impl RequestDescriptor for String {
    fn target(&self) -> &str {
        self
    }
}

impl RequestDescriptor for &'static str {
    fn target(&self) -> &str {
        self
    }
}

/// Request method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method + target + optional body.
///
/// ```rust
/// use retryvisor::{Method, Request, RequestDescriptor};
///
/// let req = Request::post("https://api.example.com/orders").with_body(r#"{"id":1}"#);
/// assert_eq!(req.method, Method::Post);
/// assert_eq!(req.target(), "https://api.example.com/orders");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub target: String,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            body: None,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::Get, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::Post, target)
    }

    pub fn put(target: impl Into<String>) -> Self {
        Self::new(Method::Put, target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::Delete, target)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl RequestDescriptor for Request {
    fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_their_own_target() {
        assert_eq!("svc".target(), "svc");
        assert_eq!(String::from("svc").target(), "svc");
    }

    #[test]
    fn request_display() {
        assert_eq!(Request::delete("/items/4").to_string(), "DELETE /items/4");
        assert_eq!(Request::get("/a").body, None);
    }
}
