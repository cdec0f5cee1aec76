use std::{borrow::Cow, future::Future};

pub trait InterceptedRequest {
    /// Returns the canonical target string the scope filter and logs see,
    /// usually the absolute URL.
    fn target(&self) -> Cow<'_, str>;

    /// Returns the request method, e.g. `GET`.
    fn method(&self) -> &str;
}

pub trait SyntheticResponse {
    /// Builds a failed response carrying `status` and `message`. Used for
    /// injected HTTP failures so callers observe a realistic response
    /// instead of a transport error.
    fn synthetic(status: u16, message: &str) -> Self;
}

pub trait Transport {
    type Request: InterceptedRequest;
    type Response: SyntheticResponse;
    type Error;

    /// Sends the request over the real network. Only called for requests
    /// that chaos lets through.
    fn send(
        &self,
        request: Self::Request,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;
}
