//! Archive part content-type gate, applied before the pipeline runs.

use regex::Regex;
use std::sync::OnceLock;

fn gzip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^application/(x-gzip|gzip)(; charset=binary)?$").expect("valid pattern")
    })
}

fn vendor_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^application/vnd\.redhat\.([a-z0-9-]+)\.([a-z0-9-]+).*").expect("valid pattern")
    })
}

/// A content type is acceptable if it is explicitly allow-listed, a generic
/// gzip type, or a vendor service media type.
pub fn is_acceptable_content_type(content_type: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a == content_type)
        || gzip_pattern().is_match(content_type)
        || vendor_pattern().is_match(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["application/vnd.redhat.hccm.upload".to_string()]
    }

    #[test]
    fn test_allow_list_match() {
        assert!(is_acceptable_content_type(
            "application/vnd.redhat.hccm.upload",
            &allowed()
        ));
    }

    #[test]
    fn test_gzip_variants() {
        assert!(is_acceptable_content_type("application/gzip", &allowed()));
        assert!(is_acceptable_content_type("application/x-gzip", &allowed()));
        assert!(is_acceptable_content_type(
            "application/gzip; charset=binary",
            &allowed()
        ));
        assert!(!is_acceptable_content_type(
            "application/gzip; charset=utf-8",
            &allowed()
        ));
    }

    #[test]
    fn test_vendor_media_types() {
        assert!(is_acceptable_content_type(
            "application/vnd.redhat.hccm.filename+tgz",
            &allowed()
        ));
        assert!(!is_acceptable_content_type(
            "application/vnd.other.hccm.upload",
            &allowed()
        ));
    }

    #[test]
    fn test_plain_types_rejected() {
        assert!(!is_acceptable_content_type("text/plain", &allowed()));
        assert!(!is_acceptable_content_type("application/json", &allowed()));
    }
}
