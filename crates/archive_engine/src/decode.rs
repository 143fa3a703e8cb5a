use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::types::{FailureKind, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub text: String,
    pub encoding: &'static str,
}

/// Decodes a response body to UTF-8. Charset precedence: byte order mark,
/// then the Content-Type header, then a `chardetng` guess.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedPage, FetchError> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(header_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(FetchError::new(
            FailureKind::Decode,
            format!("malformed {} body", used.name()),
        ));
    }
    Ok(DecodedPage {
        text: text.into_owned(),
        encoding: used.name(),
    })
}

fn header_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\''))
    })
}

#[cfg(test)]
mod tests {
    use super::header_charset;

    #[test]
    fn charset_parameter_is_case_insensitive_and_unquoted() {
        assert_eq!(header_charset("text/html; Charset=\"utf-8\""), Some("utf-8"));
        assert_eq!(header_charset("text/html;charset=ISO-8859-1"), Some("ISO-8859-1"));
        assert_eq!(header_charset("application/json"), None);
    }
}
