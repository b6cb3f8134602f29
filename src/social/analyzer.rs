use async_trait::async_trait;
use log::{info, warn};

use super::sentiment::{mean_polarity, SentimentScorer};
use super::text::{word_frequencies, StopWords};
use super::twitter::SocialPlatform;
use crate::models::{SentimentSample, SocialReport};

/// Produces the social read used alongside each buy decision
#[async_trait]
pub trait SocialSignals: Send + Sync {
    async fn analyze(&self) -> SocialReport;
}

/// Sentiment and word frequencies across the posts of a monitored list
pub struct SocialSignalAnalyzer {
    platform: Box<dyn SocialPlatform>,
    list_id: String,
    max_posts_per_handle: usize,
    scorer: SentimentScorer,
    stop_words: StopWords,
}

impl SocialSignalAnalyzer {
    pub fn new(platform: Box<dyn SocialPlatform>, list_id: &str, max_posts_per_handle: usize) -> Self {
        Self {
            platform,
            list_id: list_id.to_string(),
            max_posts_per_handle,
            scorer: SentimentScorer::default(),
            stop_words: StopWords::english(),
        }
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Score a fixed set of posts
    pub fn report_for_posts(&self, posts: Vec<String>) -> SocialReport {
        let word_frequencies = word_frequencies(&posts, &self.stop_words);
        let samples: Vec<SentimentSample> = posts
            .into_iter()
            .map(|text| {
                let polarity = self.scorer.polarity(&text);
                SentimentSample { text, polarity }
            })
            .collect();

        let polarities: Vec<f64> = samples.iter().map(|s| s.polarity).collect();
        SocialReport {
            average_sentiment: mean_polarity(&polarities),
            samples,
            word_frequencies,
        }
    }
}

#[async_trait]
impl SocialSignals for SocialSignalAnalyzer {
    async fn analyze(&self) -> SocialReport {
        info!("Fetching members of list {}...", self.list_id);
        let members = match self.platform.list_members(&self.list_id).await {
            Ok(members) => members,
            Err(e) => {
                warn!("Failed to fetch members of list {}: {}", self.list_id, e);
                return SocialReport::default();
            }
        };
        info!("Found {} members in the list", members.len());

        let mut posts = Vec::new();
        for member in &members {
            match self.platform.recent_posts(member, self.max_posts_per_handle).await {
                Ok(member_posts) => posts.extend(member_posts),
                Err(e) => warn!("Error fetching posts for {}: {}", member.username, e),
            }
        }
        info!("Fetched {} posts", posts.len());

        let report = self.report_for_posts(posts);
        match report.average_sentiment {
            Some(average) => info!("Average sentiment: {:.4}", average),
            None => warn!("No posts fetched, average sentiment unavailable"),
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::twitter::{SocialAccount, SocialError};
    use std::collections::HashMap;

    struct FakePlatform {
        members: Result<Vec<SocialAccount>, u16>,
        posts: HashMap<String, Vec<String>>,
    }

    fn account(id: &str, username: &str) -> SocialAccount {
        SocialAccount { id: id.to_string(), username: username.to_string() }
    }

    #[async_trait]
    impl SocialPlatform for FakePlatform {
        async fn list_members(&self, _list_id: &str) -> Result<Vec<SocialAccount>, SocialError> {
            self.members.clone().map_err(SocialError::Status)
        }

        async fn recent_posts(&self, account: &SocialAccount, limit: usize) -> Result<Vec<String>, SocialError> {
            match self.posts.get(&account.id) {
                Some(posts) => Ok(posts.iter().take(limit).cloned().collect()),
                None => Err(SocialError::Status(404)),
            }
        }
    }

    #[tokio::test]
    async fn skips_failing_handles() {
        let mut posts = HashMap::new();
        posts.insert("1".to_string(), vec!["Great Project!!".to_string(), "project to the moon".to_string()]);
        posts.insert("3".to_string(), vec!["MOON moon".to_string()]);
        let platform = FakePlatform {
            members: Ok(vec![account("1", "alice"), account("2", "protected"), account("3", "carol")]),
            posts,
        };

        let analyzer = SocialSignalAnalyzer::new(Box::new(platform), "list", 100)
            .with_stop_words(StopWords::from_words(["to", "the"]));
        let report = analyzer.analyze().await;

        assert_eq!(report.samples.len(), 3);
        assert_eq!(report.word_frequencies.get("moon"), Some(&3));
        assert_eq!(report.word_frequencies.get("project"), Some(&2));
        assert_eq!(report.word_frequencies.get("great"), Some(&1));
        assert!(report.average_sentiment.unwrap() > 0.0);
    }

    #[tokio::test]
    async fn list_failure_yields_empty_report() {
        let platform = FakePlatform { members: Err(503), posts: HashMap::new() };
        let report = SocialSignalAnalyzer::new(Box::new(platform), "list", 100).analyze().await;
        assert!(report.samples.is_empty());
        assert_eq!(report.average_sentiment, None);
    }

    #[tokio::test]
    async fn respects_post_limit() {
        let mut posts = HashMap::new();
        posts.insert("1".to_string(), vec!["gm".to_string(); 10]);
        let platform = FakePlatform { members: Ok(vec![account("1", "alice")]), posts };
        let report = SocialSignalAnalyzer::new(Box::new(platform), "list", 4).analyze().await;
        assert_eq!(report.samples.len(), 4);
    }
}
