use thiserror::Error;

/// Errors raised while turning the event page into a scoreboard.
///
/// `EventNotOpen` is a control signal rather than a failure: the poll
/// cycle treats it as "nothing to do" and exits cleanly. Everything
/// else aborts the cycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapeError {
    /// Exhausted the retry budget without a single successful response
    #[error("Fetch failed after {attempts} attempts")]
    FetchTimeout { attempts: usize },

    /// Trailing path segment of the resolved URL is not an integer
    #[error("Malformed event id in resolved URL: {0:?}")]
    MalformedEventId(String),

    /// Battle node carried fewer text fields than expected
    #[error("Malformed battle node: expected 4 text fields, found {found}")]
    MalformedBattle { found: usize },

    /// Score text did not parse as an integer after stripping separators
    #[error("Malformed score text: {0:?}")]
    MalformedScore(String),

    /// Current round has no decided battles, or every battle has concluded
    #[error("Event is not open")]
    EventNotOpen,
}
