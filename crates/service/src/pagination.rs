//! List windowing for the group list endpoint.
//!
//! The window is an offset/limit pair applied after filtering and ordering.
//! `take` is honored literally, so a zero window yields an empty page.

/// Skip/take window
#[derive(Clone, Copy, Debug)]
pub struct ListWindow {
    /// rows to skip before the first returned one
    pub skip: u64,
    /// maximum rows returned
    pub take: u64,
}

impl ListWindow {
    /// Fill missing query parameters with the endpoint defaults.
    pub fn from_query(skip: Option<u64>, take: Option<u64>) -> Self {
        Self { skip: skip.unwrap_or(0), take: take.unwrap_or(10) }
    }
}

impl Default for ListWindow {
    fn default() -> Self { Self { skip: 0, take: 10 } }
}
