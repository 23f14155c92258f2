//! API clients for various AI services.

pub mod openai;

use crate::http::HTTPError;
use thiserror::Error;

/// A client for an AI service's API.
pub trait APIClient {
    /// The client can make API requests of this type.
    type APIRequest: APIRequest;

    /// The client receives API responses of this type.
    type APIResponse: APIResponse;

    /// Sends the request to the AI service and receives a response.
    ///
    /// Each call is a single attempt; failures are not retried.
    fn send(
        &self,
        request: &Self::APIRequest,
    ) -> impl Future<Output = APIResult<Self::APIResponse>> + Send;
}

/// A request to an AI service's API.
///
/// This trait follows a "builder" pattern where elements of the request
/// are built up over time.
///
/// Assuming you have enum called `Model` that specifies available AI models
/// for your service, and a `ConcreteAPIRequest` struct that implements
/// `APIRequest`, you would create an API request like this:
///
/// ```
/// # use xpost::ai::client::APIRequest;
/// #
/// # pub enum Model {
/// #     AIModel,
/// # }
/// #
/// # #[derive(Default)]
/// # pub struct ConcreteAPIRequest;
/// #
/// # impl APIRequest for ConcreteAPIRequest {
/// #     type Model = Model;
/// #     fn model(self, model: Self::Model) -> Self { self }
/// #     fn input(self, input: impl Into<String>) -> Self { self }
/// #     fn temperature(self, temperature: f32) -> Self { self }
/// # }
/// #
/// let request = ConcreteAPIRequest::default()
///     .model(Model::AIModel)
///     .temperature(0.0)
///     .input("Translate \"bonjour\" into English.");
/// ```
pub trait APIRequest {
    /// An enum or other data structures providing options for different
    /// AI models, which are specific to each service.
    type Model;

    /// Sets the model used by the API request and returns a new
    /// request.
    fn model(self, model: Self::Model) -> Self;

    /// Sets the request's input and returns a new request.
    ///
    /// The input is often referred to as a "prompt" and is the text
    /// for which an AI service generates a response.
    fn input(self, input: impl Into<String>) -> Self;

    /// Sets the sampling temperature and returns a new request.
    ///
    /// Lower temperatures make output more deterministic, which is what
    /// translation wants.
    fn temperature(self, temperature: f32) -> Self;
}

/// A response from an AI service's API.
pub trait APIResponse {
    /// All of the text generated by the model, concatenated.
    fn output_text(&self) -> String;
}

/// An API result that includes the response if successful or an error
/// if unsuccessful.
pub type APIResult<T> = Result<T, APIError>;

/// An API error.
#[derive(Debug, Error)]
pub enum APIError {
    /// The HTTP request to the service failed.
    #[error(transparent)]
    Http(#[from] HTTPError),
}

impl APIError {
    /// True if the request timed out before the service answered.
    pub fn is_timeout(&self) -> bool {
        match self {
            APIError::Http(err) => err.is_timeout(),
        }
    }
}
