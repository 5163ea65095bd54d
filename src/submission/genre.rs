//! The fixed genre list offered by the form.

use std::fmt;
use std::str::FromStr;

/// One of the nine selectable genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Keyboard,
    Chamber,
    Orchestra,
    Ballet,
    Opera,
    Choral,
    Electroacoustic,
    World,
    /// Sentinel: the submitter names the genre in `otherGenre`.
    Other,
}

impl Genre {
    /// All genres in the order the form lists them.
    pub const ALL: [Genre; 9] = [
        Genre::Keyboard,
        Genre::Chamber,
        Genre::Orchestra,
        Genre::Ballet,
        Genre::Opera,
        Genre::Choral,
        Genre::Electroacoustic,
        Genre::World,
        Genre::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Keyboard => "Keyboard",
            Genre::Chamber => "Chamber",
            Genre::Orchestra => "Orchestra",
            Genre::Ballet => "Ballet",
            Genre::Opera => "Opera",
            Genre::Choral => "Choral",
            Genre::Electroacoustic => "Electroacoustic",
            Genre::World => "World",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a label is not in [`Genre::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown genre")]
pub struct UnknownGenre;

impl FromStr for Genre {
    type Err = UnknownGenre;

    /// Exact, case-sensitive match against the labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or(UnknownGenre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_parses_back() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>(), Ok(genre));
        }
    }

    #[test]
    fn matching_is_exact() {
        assert_eq!("opera".parse::<Genre>(), Err(UnknownGenre));
        assert_eq!(" Opera".parse::<Genre>(), Err(UnknownGenre));
        assert_eq!("Jazz".parse::<Genre>(), Err(UnknownGenre));
        assert_eq!("".parse::<Genre>(), Err(UnknownGenre));
    }

    #[test]
    fn unknown_genre_is_an_error() {
        let err: Box<dyn std::error::Error> = Box::new(UnknownGenre);
        assert_eq!(err.to_string(), "unknown genre");
    }
}
