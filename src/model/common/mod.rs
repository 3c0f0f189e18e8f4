mod counter;

pub use counter::Counter;

/// Our election IDs are integers.
pub type ElectionId = u64;
/// Our candidate IDs are integers, unique only within their election.
pub type CandidateId = u64;
/// Internal voter IDs are integers; the login handle is a separate string.
pub type VoterId = u64;
/// Our admin IDs are integers.
pub type AdminId = u64;

/// Is this user-supplied text empty once surrounding whitespace is dropped?
pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
