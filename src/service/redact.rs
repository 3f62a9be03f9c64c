//! Partial redaction of secrets for log output.

/// Keeps the ends of a string readable and stars out the middle.
///
/// The output always hides something: when fewer than `min_stars + 1` stars
/// would remain, the whole value is starred out instead, using at least
/// `min_stars` stars so that short and empty values are indistinguishable.
///
/// Lengths are counted in characters, not bytes.
///
/// # Examples
///
/// ```rust,ignore
/// use classifica::service::redact::Redaction;
///
/// assert_eq!(Redaction::default().redact("FirstTestString"), "Fir*********ing");
/// assert_eq!(Redaction::default().redact("short"), "*****");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redaction {
    /// Leading characters left intact.
    pub show_first: usize,
    /// Trailing characters left intact.
    pub show_last: usize,
    /// Fewest stars ever written.
    pub min_stars: usize,
}

impl Default for Redaction {
    fn default() -> Self {
        Self {
            show_first: 3,
            show_last: 3,
            min_stars: 3,
        }
    }
}

impl Redaction {
    /// Creates a redaction showing `show_first` and `show_last` characters.
    pub fn new(show_first: usize, show_last: usize) -> Self {
        Self {
            show_first,
            show_last,
            ..Self::default()
        }
    }

    /// Sets the minimum number of stars.
    pub fn with_min_stars(mut self, min_stars: usize) -> Self {
        self.min_stars = min_stars;
        self
    }

    /// Returns the redacted form of `plaintext`.
    pub fn redact(&self, plaintext: &str) -> String {
        let len = plaintext.chars().count();
        let stars = len
            .checked_sub(self.show_first + self.show_last)
            .filter(|stars| *stars > self.min_stars);

        match stars {
            Some(stars) => {
                let mut out = String::with_capacity(plaintext.len());
                out.extend(plaintext.chars().take(self.show_first));
                out.extend(std::iter::repeat_n('*', stars));
                out.extend(plaintext.chars().skip(self.show_first + stars));
                out
            }
            None => "*".repeat(len.max(self.min_stars)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_redaction() {
        let r = Redaction::default();
        assert_eq!(r.redact("FirstTestString"), "Fir*********ing");
        assert_eq!(r.redact("short"), "*****");
        assert_eq!(r.redact(""), "***");
    }

    #[test]
    fn test_custom_ends() {
        assert_eq!(Redaction::new(4, 5).redact("FourHideThisFive!"), "Four********Five!");
        assert_eq!(Redaction::new(0, 0).redact("ShouldBeAllStars"), "*".repeat(16));
        assert_eq!(
            Redaction::new(0, 6).redact("JustTheFrontPlease"),
            "************Please"
        );
        assert_eq!(Redaction::new(11, 0).redact("JustTheBackPlease"), "JustTheBack******");
    }

    #[test]
    fn test_not_enough_stars() {
        assert_eq!(Redaction::new(4, 4).redact("TooShort"), "********");
        assert_eq!(Redaction::new(5, 6).redact("NotEnoughStars"), "*".repeat(14));
        assert_eq!(
            Redaction::new(8, 8)
                .with_min_stars(4)
                .redact("StillNotEnoughStars"),
            "*".repeat(19)
        );
    }

    #[test]
    fn test_counts_characters() {
        let out = Redaction::default().redact("àèìòùÀÈÌÒÙ");
        assert_eq!(out, "àèì****ÌÒÙ");
    }
}
