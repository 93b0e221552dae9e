//! Text the tools hand back to the model

use crate::news::NewsArticle;
use crate::retriever::{Retrieval, RetrievalMode};
use supply_core::ScoredSegment;

pub const NO_NEWS_FOUND: &str = "No relevant news articles found.";

pub const NO_SUPPLY_MATCH: &str = "No relevant information found in the supply chain database.";

/// One `Title: <title>, URL: <url>` line per article
pub fn format_headlines(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return NO_NEWS_FOUND.to_string();
    }
    articles
        .iter()
        .map(|a| format!("Title: {}, URL: {}", a.title, a.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_best_match(matched: &ScoredSegment) -> String {
    format!(
        "Found Match: {}\nCriticality Level: {}",
        matched.segment.content,
        matched.segment.metadata.criticality_label()
    )
}

pub fn format_retrieval(retrieval: &Retrieval, mode: RetrievalMode) -> String {
    match (retrieval, mode) {
        (Retrieval::NoMatches, _) => NO_SUPPLY_MATCH.to_string(),
        (Retrieval::Matches(matches), RetrievalMode::BestMatch) => matches
            .first()
            .map_or_else(|| NO_SUPPLY_MATCH.to_string(), format_best_match),
        (Retrieval::Matches(matches), RetrievalMode::Broad { .. }) => matches
            .iter()
            .map(|m| m.segment.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supply_core::{Criticality, SegmentMetadata, TextSegment};

    fn scored(content: &str, level: Option<Criticality>) -> ScoredSegment {
        ScoredSegment {
            segment: TextSegment {
                content: content.to_string(),
                metadata: SegmentMetadata {
                    criticality_level: level,
                    ..SegmentMetadata::default()
                },
            },
            score: 0.5,
        }
    }

    #[test]
    fn test_headlines() {
        let articles = vec![
            NewsArticle::new("Quake hits Hsinchu", "https://news.example/1"),
            NewsArticle::new("Fab output resumes", "https://news.example/2"),
        ];
        assert_eq!(
            format_headlines(&articles),
            "Title: Quake hits Hsinchu, URL: https://news.example/1\n\
             Title: Fab output resumes, URL: https://news.example/2"
        );
        assert_eq!(format_headlines(&[]), NO_NEWS_FOUND);
    }

    #[test]
    fn test_best_match_reports_criticality() {
        let retrieval = Retrieval::Matches(vec![scored("Chip from Taiwan", Some(Criticality::High))]);
        assert_eq!(
            format_retrieval(&retrieval, RetrievalMode::BestMatch),
            "Found Match: Chip from Taiwan\nCriticality Level: High"
        );
    }

    #[test]
    fn test_missing_criticality_is_unknown() {
        let retrieval = Retrieval::Matches(vec![scored("Seal kit", None)]);
        assert!(format_retrieval(&retrieval, RetrievalMode::BestMatch).ends_with("Criticality Level: Unknown"));
    }

    #[test]
    fn test_broad_joins_contents() {
        let retrieval = Retrieval::Matches(vec![scored("one", None), scored("two", None)]);
        assert_eq!(format_retrieval(&retrieval, RetrievalMode::Broad { k: 3 }), "one\n\ntwo");
    }

    #[test]
    fn test_no_matches_sentinel_is_distinct() {
        let text = format_retrieval(&Retrieval::NoMatches, RetrievalMode::Broad { k: 3 });
        assert_eq!(text, NO_SUPPLY_MATCH);
        assert!(!text.starts_with("Found Match"));
    }
}
