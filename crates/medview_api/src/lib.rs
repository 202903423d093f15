//! Request and response shapes of the medview teaching backend.
//!
//! The viewer never talks to the backend itself; hosts perform the HTTP calls
//! and use these types to build requests and decode responses. Each call is
//! described by an [`Endpoint`], which knows its HTTP method and path.

mod chat;
mod endpoint;
mod error;
mod images;
mod sct;

pub use chat::{ChatMessage, ChatRequest, ChatResponse};
pub use endpoint::{Endpoint, Method};
pub use error::{ApiError, decode_response};
pub use images::{ALLOWED_UPLOAD_EXTENSIONS, MedicalImageSummary, UploadForm, UploadResponse};
pub use sct::{
    Difficulty, SctGenerateRequest, SctItem, SctSaveRequest, SctTestDetail, SctTestResponse,
    SctTestSummary,
};
