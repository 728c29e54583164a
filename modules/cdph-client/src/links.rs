use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;

/// A recall link from the CDPH page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecallLink {
    pub text: String,
    pub url: String,
}

/// An anchor as found in the page: visible text and the raw href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

/// Every `<a>` with an `href`, in document order. Text is the concatenated
/// text of the anchor's descendants with entities decoded.
pub fn extract_anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(Anchor {
                text: element.text().collect(),
                href: href.to_string(),
            })
        })
        .collect()
}

/// Case-insensitive whole-word matcher for a literal term. `None` for a
/// blank term.
pub fn word_matcher(term: &str) -> Result<Option<Regex>, regex::Error> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term))).map(Some)
}

/// Keep anchors whose text or href matches any of `matchers`, resolving
/// hrefs against `base`.
pub fn filter_links(anchors: Vec<Anchor>, matchers: &[Regex], base: &url::Url) -> Vec<RecallLink> {
    anchors
        .into_iter()
        .filter(|a| {
            matchers
                .iter()
                .any(|re| re.is_match(&a.text) || re.is_match(&a.href))
        })
        .filter_map(|a| {
            let url = base.join(a.href.trim()).ok()?;
            Some(RecallLink {
                text: a.text.trim().to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> url::Url {
        url::Url::parse("https://www.cdph.ca.gov").unwrap()
    }

    #[test]
    fn anchors_keep_document_order_and_strip_markup() {
        let html = r#"
            <p><a href="/recalls/one.pdf"><span>Acme</span> Pump &amp; Co</a></p>
            <a class="x" href='https://other.org/two'>Second</a>
            <a name="anchor-only">No href</a>
        "#;
        let anchors = extract_anchors(html);
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].text, "Acme Pump & Co");
        assert_eq!(anchors[0].href, "/recalls/one.pdf");
        assert_eq!(anchors[1].href, "https://other.org/two");
    }

    #[test]
    fn matches_whole_words_only() {
        let re = word_matcher("pump").unwrap().unwrap();
        assert!(re.is_match("Infusion PUMP recall"));
        assert!(!re.is_match("Pumpkin spice"));
    }

    #[test]
    fn blank_term_has_no_matcher() {
        assert!(word_matcher("  ").unwrap().is_none());
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let re = word_matcher("a.b").unwrap().unwrap();
        assert!(re.is_match("device a.b recall"));
        assert!(!re.is_match("device axb recall"));
    }

    #[test]
    fn matches_on_href_and_resolves_relative_urls() {
        let anchors = vec![
            Anchor {
                text: "Recall notice".into(),
                href: "/docs/acme-recall.pdf".into(),
            },
            Anchor {
                text: "Unrelated".into(),
                href: "/docs/other.pdf".into(),
            },
        ];
        let matchers = vec![word_matcher("acme").unwrap().unwrap()];
        let links = filter_links(anchors, &matchers, &base());
        assert_eq!(
            links,
            vec![RecallLink {
                text: "Recall notice".into(),
                url: "https://www.cdph.ca.gov/docs/acme-recall.pdf".into(),
            }]
        );
    }

    #[test]
    fn absolute_hrefs_are_kept() {
        let anchors = vec![Anchor {
            text: "  Acme  ".into(),
            href: "https://example.com/acme".into(),
        }];
        let matchers = vec![word_matcher("Acme").unwrap().unwrap()];
        let links = filter_links(anchors, &matchers, &base());
        assert_eq!(links[0].url, "https://example.com/acme");
        assert_eq!(links[0].text, "Acme");
    }

    #[test]
    fn attributes_and_entities_are_parsed_like_a_browser() {
        let html = r#"
            <a title="Pump > recall" href="/docs/acme-pump.pdf">Acme Pump Recall</a>
            <a href="/docs/jj.pdf">Johnson &#38; Johnson Recall</a>
            <a href="/docs/quote.pdf">Acme&rsquo;s Pump</a>
            <A HREF=/docs/unquoted.pdf>Unquoted</A>
        "#;
        let anchors = extract_anchors(html);
        assert_eq!(anchors.len(), 4);
        assert_eq!(anchors[0].href, "/docs/acme-pump.pdf");
        assert_eq!(anchors[1].text, "Johnson & Johnson Recall");
        assert_eq!(anchors[2].text, "Acme\u{2019}s Pump");
        assert_eq!(anchors[3].href, "/docs/unquoted.pdf");

        let matchers = vec![word_matcher("Johnson & Johnson").unwrap().unwrap()];
        let links = filter_links(anchors, &matchers, &base());
        assert_eq!(
            links,
            vec![RecallLink {
                text: "Johnson & Johnson Recall".into(),
                url: "https://www.cdph.ca.gov/docs/jj.pdf".into(),
            }]
        );
    }
}
