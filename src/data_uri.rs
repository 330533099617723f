use base64::{ engine::general_purpose, Engine as _ };
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DataUriError {
    #[error("missing `data:` scheme")] MissingScheme,

    #[error("missing `,` separating header and payload")] MissingPayload,

    #[error("payload is not declared as base64")] NotBase64,

    #[error("missing or malformed MIME type")] InvalidMimeType,

    #[error("invalid base64 payload: {0}")] InvalidBase64(#[from] base64::DecodeError),
}

/// Binary payload decoded from a `data:<mime>;base64,<data>` URI.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.trim().strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;
        let header = header.strip_suffix(";base64").ok_or(DataUriError::NotBase64)?;

        // Parameters such as `;charset=` may sit between the type and `;base64`.
        let mime_type = header.split(';').next().unwrap_or_default().trim();
        if mime_type.is_empty() || !mime_type.contains('/') {
            return Err(DataUriError::InvalidMimeType);
        }

        let data = general_purpose::STANDARD.decode(payload.trim())?;

        Ok(Self {
            mime_type: mime_type.to_lowercase(),
            data,
        })
    }

    pub fn encode(mime_type: &str, data: &[u8]) -> String {
        format!("data:{};base64,{}", mime_type, general_purpose::STANDARD.encode(data))
    }
}
