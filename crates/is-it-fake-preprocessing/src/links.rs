//! URL extraction and per-link credibility scoring.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use regex::Regex;
use tracing::debug;

/// News outlets whose links count as trusted sources.
pub const TRUSTED_DOMAINS: &[&str] = &[
    "bbc.com",
    "nytimes.com",
    "wsj.com",
    "reuters.com",
    "apnews.com",
    "npr.org",
    "cnn.com",
    "abcnews.go.com",
    "cbsnews.com",
    "nbcnews.com",
    "theguardian.com",
    "washingtonpost.com",
    "bloomberg.com",
    "forbes.com",
    "time.com",
    "newsweek.com",
    "politico.com",
    "theatlantic.com",
    "economist.com",
    "usatoday.com",
    "latimes.com",
    "chicagotribune.com",
];

/// Top-level domains of institutional hosts.
pub const TRUSTED_TLDS: &[&str] = &["gov", "edu", "mil"];

/// Words that mark a URL as suspicious when they appear anywhere in it.
pub const SUSPICIOUS_TERMS: &[&str] = &[
    "fake",
    "hoax",
    "conspiracy",
    "truth",
    "exposed",
    "leaked",
    "secret",
    "hidden",
    "shocking",
    "unbelievable",
    "click",
    "viral",
];

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

// One pass over both forms so `https://www.x` is a single match.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:https?://|\bwww\.)[^\s<>"']+"#).expect("URL pattern is a valid regex")
});

static DOMAIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"://(?:www\.)?([^/]+)").expect("domain pattern is a valid regex"));

static TRUSTED: LazyLock<AhoCorasick> =
    LazyLock::new(|| AhoCorasick::new(TRUSTED_DOMAINS).expect("Unable to build trusted-domain matcher"));

static SUSPICIOUS: LazyLock<AhoCorasick> =
    LazyLock::new(|| AhoCorasick::new(SUSPICIOUS_TERMS).expect("Unable to build suspicious-term matcher"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credibility {
    Trusted,
    Suspicious,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Link {
    pub url: String,
    pub domain: String,
    pub credibility: Credibility,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinkSummary {
    pub total: usize,
    pub trusted: usize,
    pub suspicious: usize,
    pub unknown: usize,
}

impl LinkSummary {
    fn record(&mut self, credibility: Credibility) {
        self.total += 1;
        match credibility {
            Credibility::Trusted => self.trusted += 1,
            Credibility::Suspicious => self.suspicious += 1,
            Credibility::Unknown => self.unknown += 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinkReport {
    pub links: Vec<Link>,
    pub summary: LinkSummary,
}

/// URLs found in `text`, deduplicated, in order of first occurrence.
///
/// Bare `www.` addresses are returned with an `http://` prefix.
pub fn extract_links(text: &str) -> Vec<String> {
    let mut seen = ahash::HashSet::default();
    URL_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            let url = if raw.len() >= 4 && raw[..4].eq_ignore_ascii_case("www.") {
                format!("http://{raw}")
            } else {
                raw.to_string()
            };
            let has_host = url.split_once("://").is_some_and(|(_, rest)| !rest.is_empty());
            has_host.then_some(url)
        })
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Host part of `url`, without a leading `www.`; the whole URL when no scheme is present.
pub fn domain_of(url: &str) -> String {
    DOMAIN_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| url.to_string(), |m| m.as_str().to_string())
}

pub fn classify(url: &str) -> Link {
    let domain = domain_of(url);
    let lowered = url.to_lowercase();

    let credibility = if TRUSTED.is_match(&lowered) || has_trusted_tld(&domain) {
        Credibility::Trusted
    } else if SUSPICIOUS.is_match(&lowered) {
        Credibility::Suspicious
    } else {
        Credibility::Unknown
    };

    Link {
        url: url.to_string(),
        domain,
        credibility,
    }
}

/// `domain` may still carry a port, query or fragment; the TLD is read from the bare host.
fn has_trusted_tld(domain: &str) -> bool {
    let host = domain
        .split(['?', '#', ':'])
        .next()
        .unwrap_or(domain)
        .to_lowercase();
    host.rsplit('.')
        .next()
        .is_some_and(|tld| TRUSTED_TLDS.contains(&tld))
}

pub fn analyze_links(text: &str) -> LinkReport {
    let mut report = LinkReport::default();
    for url in extract_links(text) {
        let link = classify(&url);
        report.summary.record(link.credibility);
        report.links.push(link);
    }
    debug!(
        total = report.summary.total,
        trusted = report.summary.trusted,
        suspicious = report.summary.suspicious,
        "Analyzed links"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_links_example() {
        let report = analyze_links("Visit http://bbc.com/news and www.fakehoaxsite.com");
        assert_eq!(
            report.links,
            vec![
                Link {
                    url: "http://bbc.com/news".to_string(),
                    domain: "bbc.com".to_string(),
                    credibility: Credibility::Trusted,
                },
                Link {
                    url: "http://www.fakehoaxsite.com".to_string(),
                    domain: "fakehoaxsite.com".to_string(),
                    credibility: Credibility::Suspicious,
                },
            ]
        );
        assert_eq!(
            report.summary,
            LinkSummary {
                total: 2,
                trusted: 1,
                suspicious: 1,
                unknown: 0
            }
        );
    }

    #[test]
    fn test_scheme_with_www_is_one_link() {
        let links = extract_links("See https://www.reuters.com/world.");
        assert_eq!(links, vec!["https://www.reuters.com/world".to_string()]);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let links = extract_links("a http://x.org b http://y.org c http://x.org!");
        assert_eq!(links, vec!["http://x.org".to_string(), "http://y.org".to_string()]);
    }

    #[test]
    fn test_no_links() {
        let report = analyze_links("Nothing to see here, move along.");
        assert!(report.links.is_empty());
        assert_eq!(report.summary, LinkSummary::default());
    }

    #[test]
    fn test_institutional_tld_is_trusted() {
        assert_eq!(classify("https://www.cdc.gov/flu").credibility, Credibility::Trusted);
        assert_eq!(classify("http://mit.edu").credibility, Credibility::Trusted);
        assert_eq!(classify("http://army.mil:8080/x").credibility, Credibility::Trusted);
    }

    #[test]
    fn test_institutional_tld_with_query_or_fragment_is_trusted() {
        let link = classify("https://www.whitehouse.gov?utm_source=x");
        assert_eq!(link.domain, "whitehouse.gov?utm_source=x");
        assert_eq!(link.credibility, Credibility::Trusted);
        assert_eq!(classify("http://nasa.gov#top").credibility, Credibility::Trusted);

        let report = analyze_links("Statement at https://www.whitehouse.gov?ref=tw today");
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.trusted, 1);
    }

    #[test]
    fn test_trusted_takes_precedence_over_suspicious() {
        let link = classify("https://www.nytimes.com/secret-documents-leaked");
        assert_eq!(link.credibility, Credibility::Trusted);
    }

    #[test]
    fn test_unknown_domain() {
        let link = classify("https://example.com/article");
        assert_eq!(link.domain, "example.com");
        assert_eq!(link.credibility, Credibility::Unknown);
    }

    #[test]
    fn test_domain_falls_back_to_whole_url() {
        assert_eq!(domain_of("no-scheme-here"), "no-scheme-here");
    }

    #[test]
    fn test_credibility_serializes_lowercase() {
        let json = serde_json::to_string(&Credibility::Suspicious).expect("serializable");
        assert_eq!(json, "\"suspicious\"");
    }
}
