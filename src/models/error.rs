use derive_more::Display;

/// Sub-cause of a catalog payload that could not be decoded.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DecodeCause {
    #[display("type mismatch")]
    TypeMismatch,
    #[display("missing key")]
    MissingKey,
    #[display("missing value")]
    MissingValue,
    #[display("corrupted payload")]
    Corrupted,
}

impl DecodeCause {
    pub fn classify(err: &serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Data => {
                let msg = err.to_string();
                if msg.starts_with("missing field") {
                    DecodeCause::MissingKey
                } else if msg.starts_with("invalid type: null") {
                    DecodeCause::MissingValue
                } else {
                    DecodeCause::TypeMismatch
                }
            }
            Category::Io | Category::Syntax | Category::Eof => DecodeCause::Corrupted,
        }
    }
}

#[derive(Debug, Display)]
pub enum SError {
    /// A library root could not be opened.
    #[display("cannot access {_0}: {_1}")]
    Access(String, String),
    #[display("catalog responded with HTTP {status}")]
    Http { status: u16 },
    #[display("catalog decode failed ({_0}): {_1}")]
    Decode(DecodeCause, String),
    #[display("network error: {_0}")]
    Network(String),
    #[display("cache i/o error: {_0}")]
    CacheIO(String),
    /// The bottle configuration could not be rewritten; the launch is aborted.
    #[display("bottle config rewrite failed: {_0}")]
    ConfigRewrite(String),
    #[display("i/o error: {_0}")]
    IOError(String),
    #[display("config error: {_0}")]
    Config(String),
    #[display("spawn failed: {_0}")]
    Spawn(String),
    #[display("no game libraries configured")]
    NoLibraries,
    /// A candidate library root holds no manifests.
    #[display("no games found in {_0}")]
    EmptyLibrary(String),
    #[display("no bottle selected")]
    NoBottleSelected,
    #[display("no bottle named {_0}")]
    UnknownBottle(String),
    #[display("game not found: {_0}")]
    GameNotFound(String),
    #[display("unexpected error: {_0:?}")]
    Unexpected(Option<String>),
}

impl std::error::Error for SError {}

impl From<std::io::Error> for SError {
    fn from(e: std::io::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<confy::ConfyError> for SError {
    fn from(e: confy::ConfyError) -> Self {
        SError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for SError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SError::Http {
                status: status.as_u16(),
            },
            None => SError::Network(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for SError {
    fn from(e: serde_json::Error) -> Self {
        SError::Decode(DecodeCause::classify(&e), e.to_string())
    }
}

impl From<tokio::task::JoinError> for SError {
    fn from(e: tokio::task::JoinError) -> Self {
        SError::Unexpected(Some(e.to_string()))
    }
}
