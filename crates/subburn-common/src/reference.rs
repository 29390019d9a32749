//! Video reference parsing.
//!
//! Recognizes the two canonical hosting URL shapes:
//!
//! - query-parameter form: `https://www.youtube.com/watch?v=<id>`
//! - path-embedded form: `https://youtu.be/<id>`
//!
//! Trailing query parameters on the short form (`?t=42`, `?si=...`) are not
//! part of the identifier.

use url::Url;

use crate::{Error, Result, VideoId};

const LONG_HOST: &str = "youtube.com";
const SHORT_HOST: &str = "youtu.be";

/// Parse `reference` as a URI, rejecting anything that is not a valid URI.
pub fn parse_reference(reference: &str) -> Result<Url> {
    Url::parse(reference.trim())
        .map_err(|e| Error::unrecognized(reference, format!("failed to parse URL: {e}")))
}

/// Extract the video identifier from a canonical reference URL.
///
/// # Errors
///
/// Returns [`Error::UnrecognizedReference`] if the reference is not a URI, the
/// host is not a known video host, or no identifier token is present.
///
/// # Examples
///
/// ```
/// use subburn_common::reference::parse_video_id;
///
/// let id = parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10").unwrap();
/// assert_eq!(id.as_str(), "dQw4w9WgXcQ");
///
/// assert!(parse_video_id("https://vimeo.com/12345").is_err());
/// ```
pub fn parse_video_id(reference: &str) -> Result<VideoId> {
    let url = parse_reference(reference)?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::unrecognized(reference, "URL has no host"))?
        .to_ascii_lowercase();

    if host_matches(&host, SHORT_HOST) {
        let token = url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .unwrap_or_default();
        return VideoId::parse(token, reference);
    }

    if host_matches(&host, LONG_HOST) {
        let token = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        return VideoId::parse(&token, reference);
    }

    Err(Error::unrecognized(
        reference,
        format!("host {host:?} is not a recognized video host"),
    ))
}

/// `host` equals `known` or is a subdomain of it.
fn host_matches(host: &str, known: &str) -> bool {
    host == known
        || host
            .strip_suffix(known)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(reference: &str) -> String {
        parse_video_id(reference).unwrap().as_str().to_string()
    }

    #[test]
    fn short_form() {
        assert_eq!(id("https://youtu.be/abc123"), "abc123");
    }

    #[test]
    fn short_form_with_trailing_query() {
        assert_eq!(id("https://youtu.be/abc123?t=42"), "abc123");
        assert_eq!(id("https://youtu.be/abc123?si=xyz&t=1"), "abc123");
    }

    #[test]
    fn query_form() {
        assert_eq!(id("https://www.youtube.com/watch?v=abc123"), "abc123");
        assert_eq!(id("https://youtube.com/watch?v=abc123"), "abc123");
        assert_eq!(id("https://m.youtube.com/watch?v=abc123"), "abc123");
    }

    #[test]
    fn query_form_with_extra_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?list=PL1&v=abc123&t=5s"),
            "abc123"
        );
    }

    #[test]
    fn fragment_is_ignored() {
        assert_eq!(id("https://youtu.be/abc123#frag"), "abc123");
        assert_eq!(id("https://www.youtube.com/watch?v=abc123#t=3"), "abc123");
    }

    #[test]
    fn unknown_hosts_are_rejected() {
        for reference in [
            "https://vimeo.com/12345",
            "https://notyoutube.com/watch?v=abc123",
            "https://youtu.be.evil.example/abc123",
        ] {
            let err = parse_video_id(reference).unwrap_err();
            assert!(
                matches!(err, Error::UnrecognizedReference { .. }),
                "{reference} should be rejected"
            );
        }
    }

    #[test]
    fn missing_token_is_rejected() {
        assert!(parse_video_id("https://youtu.be/").is_err());
        assert!(parse_video_id("https://www.youtube.com/watch").is_err());
        assert!(parse_video_id("https://www.youtube.com/watch?v=").is_err());
    }

    #[test]
    fn non_uri_is_rejected() {
        let err = parse_video_id("not a url").unwrap_err();
        assert!(err.to_string().contains("failed to parse URL"));
    }
}
