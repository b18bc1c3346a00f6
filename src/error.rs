use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while wiring the cover into the page.
///
/// None of these ever reach the page: the controller logs and drops them,
/// and `app::install` reports them on the console.
#[derive(Error, Debug)]
pub enum CoverError {
    #[error("player surface not found")]
    PlayerUnavailable,

    #[error("cover is not attached to a player")]
    NotAttached,

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Scoreboard request failed: {0}")]
    Fetch(String),
}

impl CoverError {
    pub fn dom(err: JsValue) -> Self {
        CoverError::Dom(format!("{:?}", err))
    }
}

impl From<serde_json::Error> for CoverError {
    fn from(err: serde_json::Error) -> Self {
        CoverError::Serialization(err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for CoverError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        CoverError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoverError::InvalidConfig("empty palette".to_string());
        assert!(err.to_string().contains("empty palette"));
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let err: CoverError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CoverError::Serialization(_)));
    }
}
