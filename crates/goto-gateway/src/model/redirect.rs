use serde::Deserialize;

/// Body of `POST /`. Missing fields arrive as empty strings and are rejected
/// by validation rather than by the extractor.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub url: String,
}
