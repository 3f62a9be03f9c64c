//! Decoding of one line of the sampled tweet stream.
//!
//! Only the path down to the hashtags is modelled; every other field is
//! ignored. Each level is optional, and a missing level means "no hashtags".
//!
//! ```text
//! {"data":{"id":"1","text":"...","entities":{"hashtags":[{"start":0,"end":5,"tag":"rust"}]}}}
//! ```

use serde::Deserialize;

/// Top-level envelope of a streamed tweet.
#[derive(Debug, Default, Deserialize)]
pub struct TweetData {
    /// The tweet itself.
    #[serde(default, alias = "Data")]
    pub data: Option<Tweet>,
}

/// A tweet.
#[derive(Debug, Default, Deserialize)]
pub struct Tweet {
    /// Tweet text.
    #[serde(default, alias = "Text")]
    pub text: Option<String>,
    /// Parsed entities.
    #[serde(default, alias = "Entities")]
    pub entities: Option<Entities>,
}

/// Entities extracted from a tweet.
#[derive(Debug, Default, Deserialize)]
pub struct Entities {
    /// Hashtags, in order of appearance.
    #[serde(default, alias = "Hashtags")]
    pub hashtags: Option<Vec<Hashtag>>,
}

/// A hashtag, without the leading `#`.
#[derive(Debug, Deserialize)]
pub struct Hashtag {
    #[serde(alias = "Tag")]
    pub tag: String,
}

impl TweetData {
    /// Consumes the envelope, yielding its hashtags.
    pub fn into_hashtags(self) -> Vec<String> {
        self.data
            .and_then(|tweet| tweet.entities)
            .and_then(|entities| entities.hashtags)
            .map(|tags| tags.into_iter().map(|h| h.tag).collect())
            .unwrap_or_default()
    }
}

/// Decodes one line and returns its hashtags.
pub fn hashtags(line: &str) -> serde_json::Result<Vec<String>> {
    serde_json::from_str::<TweetData>(line).map(TweetData::into_hashtags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashtags() {
        let line = r#"{"data":{"id":"1","text":"hi #rust #go","entities":{"hashtags":[{"start":3,"end":8,"tag":"rust"},{"start":9,"end":12,"tag":"go"}]}}}"#;
        assert_eq!(hashtags(line).unwrap(), vec!["rust", "go"]);
    }

    #[test]
    fn test_missing_levels_mean_no_hashtags() {
        assert!(hashtags("{}").unwrap().is_empty());
        assert!(hashtags(r#"{"data":{"text":"no entities"}}"#).unwrap().is_empty());
        assert!(hashtags(r#"{"data":{"entities":{"urls":[]}}}"#).unwrap().is_empty());
        assert!(hashtags(r#"{"data":{"entities":{"hashtags":null}}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_capitalized_fields() {
        let line = r#"{"Data":{"Entities":{"Hashtags":[{"Tag":"Rust"}]}}}"#;
        assert_eq!(hashtags(line).unwrap(), vec!["Rust"]);
    }

    #[test]
    fn test_malformed() {
        assert!(hashtags("not json").is_err());
        assert!(hashtags(r#"{"data":{"entities":{"hashtags":[{"start":0}]}}}"#).is_err());
    }

    #[test]
    fn test_repeated_tag_is_kept() {
        let line = r#"{"data":{"entities":{"hashtags":[{"tag":"a"},{"tag":"a"}]}}}"#;
        assert_eq!(hashtags(line).unwrap(), vec!["a", "a"]);
    }
}
