#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no browser window or document available")]
    NoWindow,
    #[error("a custom element named '{0}' is already defined")]
    AlreadyDefined(String),
    #[error("could not define custom element '{name}': {message}")]
    Define { name: String, message: String },
    #[error("could not attach shadow root: {0}")]
    ShadowRoot(String),
    #[error("could not create event bus: {0}")]
    Bus(String),
}
