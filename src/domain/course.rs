use std::fmt;

use crate::domain::Keyed;

/// Course offering, keyed by its course code.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    /// Unique course code, e.g. `CS101-SP24`
    pub code: String,
    /// Subject code, e.g. `CS101`
    pub subject_code: String,
    /// Subject name, searched by substring
    pub subject_name: String,
    pub semester: String,
    pub year: String,
    pub seats: u32,
    pub registered: u32,
    pub price: f64,
}

impl Course {
    /// Seats still open for registration.
    pub fn available(&self) -> u32 {
        self.seats.saturating_sub(self.registered)
    }
}

impl Keyed for Course {
    type Key = String;

    fn key(&self) -> &Self::Key {
        &self.code
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) {} {} seats={} registered={} price={:.2}",
            self.code,
            self.subject_code,
            self.subject_name,
            self.semester,
            self.year,
            self.seats,
            self.registered,
            self.price
        )
    }
}
