use crate::presentation::route::Route;

/// Terminal state of a view whose data could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub message: String,
    pub retry: Route,
}

impl ErrorView {
    pub fn new(message: &str, retry: Route) -> Self {
        Self {
            message: message.to_string(),
            retry,
        }
    }
}
