//! Incoming HTTP request type.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri, Version};
use percent_encoding::percent_decode_str;

/// Path parameters captured by the router for the matched route.
///
/// For a route `/users/{id}` and a request to `/users/42`, `get("id")`
/// returns `Some("42")`. Empty until the router has matched the request.
///
/// Values are percent-decoded: `/files/hello%20world` against
/// `/files/{name}` yields `hello world`. A value whose escapes do not decode
/// to UTF-8 is kept exactly as it appeared in the path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<matchit::Params<'_, '_>> for Params {
    fn from(params: matchit::Params<'_, '_>) -> Self {
        Self(params.iter().map(|(k, v)| (k.to_owned(), decode(v))).collect())
    }
}

fn decode(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_owned(),
    }
}

/// An incoming HTTP request with its body fully read.
///
/// Cheap to clone: the body is reference-counted [`Bytes`].
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    pub(crate) params: Params,
}

impl Request {
    /// A request with no headers and an empty body.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Params::default(),
        }
    }

    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body,
            params: Params::default(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn version(&self) -> Version { self.version }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Header lookup. Names are case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All path parameters of the matched route.
    pub fn params(&self) -> &Params { &self.params }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_looked_up_by_name() {
        let mut tree = matchit::Router::new();
        tree.insert("/users/{id}/posts/{post}", ()).unwrap();
        let matched = tree.at("/users/42/posts/7").unwrap();

        let params = Params::from(matched.params);
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("post"), Some("7"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn param_values_are_percent_decoded() {
        let mut tree = matchit::Router::new();
        tree.insert("/files/{name}", ()).unwrap();

        let matched = tree.at("/files/hello%20w%C3%B6rld").unwrap();
        assert_eq!(Params::from(matched.params).get("name"), Some("hello wörld"));

        // %FF is not UTF-8: keep the raw segment.
        let matched = tree.at("/files/bad%FF").unwrap();
        assert_eq!(Params::from(matched.params).get("name"), Some("bad%FF"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::GET, Uri::from_static("/"))
            .with_header(http::header::CONTENT_TYPE, http::HeaderValue::from_static("text/plain"));
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.path(), "/");
    }
}
