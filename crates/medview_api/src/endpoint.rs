//! Backend routes.

use std::fmt;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every route the frontend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /api/chat`
    Chat,
    /// `POST /api/sct/generate`
    SctGenerate,
    /// `GET /api/sct/example`
    SctExample,
    /// `POST /api/sct/save`
    SctSave,
    /// `GET /api/sct/list`
    SctList,
    /// `GET /api/sct/{id}`
    SctGet(u64),
    /// `GET /api/medical-images/list`
    ImageList,
    /// `GET /api/medical-images/view/{id}`
    ImageView(u64),
    /// `POST /api/medical-images/upload` (multipart)
    ImageUpload,
    /// `DELETE /api/medical-images/{id}`
    ImageDelete(u64),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Chat | Endpoint::SctGenerate | Endpoint::SctSave | Endpoint::ImageUpload => {
                Method::Post
            }
            Endpoint::ImageDelete(_) => Method::Delete,
            Endpoint::SctExample
            | Endpoint::SctList
            | Endpoint::SctGet(_)
            | Endpoint::ImageList
            | Endpoint::ImageView(_) => Method::Get,
        }
    }

    /// Path relative to the API base, always starting with `/api/`.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Chat => "/api/chat".to_string(),
            Endpoint::SctGenerate => "/api/sct/generate".to_string(),
            Endpoint::SctExample => "/api/sct/example".to_string(),
            Endpoint::SctSave => "/api/sct/save".to_string(),
            Endpoint::SctList => "/api/sct/list".to_string(),
            Endpoint::SctGet(id) => format!("/api/sct/{id}"),
            Endpoint::ImageList => "/api/medical-images/list".to_string(),
            Endpoint::ImageView(id) => format!("/api/medical-images/view/{id}"),
            Endpoint::ImageUpload => "/api/medical-images/upload".to_string(),
            Endpoint::ImageDelete(id) => format!("/api/medical-images/{id}"),
        }
    }

    /// Full URL under `base`. A trailing slash on `base` is ignored.
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }

    /// Whether the call mutates remote state irreversibly and needs the user
    /// to confirm before it is sent.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Endpoint::ImageDelete(_))
    }
}
