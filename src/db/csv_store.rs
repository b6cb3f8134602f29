use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::{BuySignal, SentimentSample, TokenRecord};

const TOKENS_FILE: &str = "tokens.csv";
const SENTIMENT_FILE: &str = "tweets_analysis.csv";
const WORD_FREQUENCY_FILE: &str = "word_frequencies.csv";
const BUY_SIGNALS_FILE: &str = "buy_signals.csv";

const TOKEN_HEADER: [&str; 4] = ["name", "symbol", "mint_address", "social_media_links"];
const SENTIMENT_HEADER: [&str; 2] = ["Tweet", "Sentiment"];
const WORD_FREQUENCY_HEADER: [&str; 2] = ["Token", "Count"];
const BUY_SIGNAL_HEADER: [&str; 6] = [
    "Token Name",
    "Mint Address",
    "Symbol",
    "Sentiment Score",
    "SOL Amount",
    "Sent At",
];

#[derive(Debug, Serialize)]
struct TokenRow<'a> {
    name: Option<&'a str>,
    symbol: Option<&'a str>,
    mint_address: Option<&'a str>,
    social_media_links: String,
}

/// One line of the buy signal history
#[derive(Debug, Clone, Serialize)]
pub struct BuySignalRow {
    pub token_name: Option<String>,
    pub mint_address: String,
    pub symbol: Option<String>,
    pub sentiment_score: Option<f64>,
    pub sol_amount: f64,
    pub sent_at: String,
}

impl BuySignalRow {
    pub fn new(token: &TokenRecord, signal: &BuySignal, sentiment_score: Option<f64>, sent_at: DateTime<Utc>) -> Self {
        Self {
            token_name: token.name.clone(),
            mint_address: signal.mint_address.clone(),
            symbol: token.symbol.clone(),
            sentiment_score,
            sol_amount: signal.sol_amount,
            sent_at: sent_at.to_rfc3339(),
        }
    }
}

/// Flat CSV files, one per concern
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {:?}", dir))?;
        Ok(Self { dir })
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn write_table<W: Write, R: Serialize>(writer: W, header: &[&str], rows: impl IntoIterator<Item = R>) -> Result<()> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn rewrite<R: Serialize>(&self, file: &str, header: &[&str], rows: impl IntoIterator<Item = R>) -> Result<()> {
        let path = self.path(file);
        let handle = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
        Self::write_table(handle, header, rows).with_context(|| format!("Failed to write {:?}", path))
    }

    /// Replace the token snapshot of the last scrape
    pub fn save_tokens(&self, tokens: &[TokenRecord]) -> Result<()> {
        let rows = tokens.iter().map(|token| TokenRow {
            name: token.name.as_deref(),
            symbol: token.symbol.as_deref(),
            mint_address: token.mint_address.as_deref(),
            social_media_links: token.social_links.join(" "),
        });
        self.rewrite(TOKENS_FILE, &TOKEN_HEADER, rows)
    }

    /// Replace the per-post sentiment table
    pub fn save_sentiment(&self, samples: &[SentimentSample]) -> Result<()> {
        let rows = samples.iter().map(|s| (s.text.as_str(), s.polarity));
        self.rewrite(SENTIMENT_FILE, &SENTIMENT_HEADER, rows)
    }

    /// Replace the word frequency table, most frequent first
    pub fn save_word_frequencies(&self, frequencies: &HashMap<String, usize>) -> Result<()> {
        let mut rows: Vec<(&str, usize)> = frequencies.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        self.rewrite(WORD_FREQUENCY_FILE, &WORD_FREQUENCY_HEADER, rows)
    }

    /// Append to the buy signal history, writing the header only for a new file
    pub fn append_buy_signal(&self, row: &BuySignalRow) -> Result<()> {
        let path = self.path(BUY_SIGNALS_FILE);
        let is_new = !path.exists();

        let handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {:?}", path))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(handle);
        if is_new {
            writer.write_record(BUY_SIGNAL_HEADER)?;
        }
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> (tempfile::TempDir, CsvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data")).unwrap();
        (dir, store)
    }

    fn read(store: &CsvStore, file: &str) -> String {
        fs::read_to_string(store.path(file)).unwrap()
    }

    fn row(mint: &str) -> BuySignalRow {
        let token = TokenRecord {
            name: Some("Moon Cat".to_string()),
            symbol: Some("MCAT".to_string()),
            mint_address: Some(mint.to_string()),
            social_links: vec![],
        };
        let signal = BuySignal { mint_address: mint.to_string(), sol_amount: 1.0 };
        let sent_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        BuySignalRow::new(&token, &signal, Some(0.25), sent_at)
    }

    #[test]
    fn token_snapshot_is_replaced() {
        let (_dir, store) = store();
        let token = TokenRecord {
            name: Some("Moon Cat".to_string()),
            symbol: None,
            mint_address: Some("Mint111".to_string()),
            social_links: vec!["https://x.com/a".to_string(), "https://t.me/a".to_string()],
        };
        store.save_tokens(&[token.clone(), token]).unwrap();
        store.save_tokens(&[]).unwrap();
        assert_eq!(read(&store, TOKENS_FILE), "name,symbol,mint_address,social_media_links\n");
    }

    #[test]
    fn writes_tokens_with_empty_optional_fields() {
        let (_dir, store) = store();
        let token = TokenRecord {
            name: Some("Moon Cat".to_string()),
            symbol: None,
            mint_address: Some("Mint111".to_string()),
            social_links: vec!["https://x.com/a".to_string(), "https://t.me/a".to_string()],
        };
        store.save_tokens(&[token]).unwrap();
        assert_eq!(
            read(&store, TOKENS_FILE),
            "name,symbol,mint_address,social_media_links\nMoon Cat,,Mint111,https://x.com/a https://t.me/a\n"
        );
    }

    #[test]
    fn word_frequencies_sorted_by_count() {
        let (_dir, store) = store();
        let frequencies: HashMap<String, usize> =
            [("great", 1), ("moon", 3), ("project", 2)].into_iter().map(|(w, c)| (w.to_string(), c)).collect();
        store.save_word_frequencies(&frequencies).unwrap();
        assert_eq!(read(&store, WORD_FREQUENCY_FILE), "Token,Count\nmoon,3\nproject,2\ngreat,1\n");
    }

    #[test]
    fn sentiment_rows_quote_text() {
        let (_dir, store) = store();
        let samples = vec![SentimentSample { text: "gm, frens".to_string(), polarity: 0.2 }];
        store.save_sentiment(&samples).unwrap();
        assert_eq!(read(&store, SENTIMENT_FILE), "Tweet,Sentiment\n\"gm, frens\",0.2\n");
    }

    #[test]
    fn buy_signals_append_with_single_header() {
        let (_dir, store) = store();
        store.append_buy_signal(&row("Mint111")).unwrap();

        // A fresh store over the same directory behaves like a restart
        let reopened = CsvStore::new(store.path("")).unwrap();
        reopened.append_buy_signal(&row("Mint222")).unwrap();

        let contents = read(&store, BUY_SIGNALS_FILE);
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Token Name,Mint Address,Symbol,Sentiment Score,SOL Amount,Sent At");
        assert_eq!(lines[1], "Moon Cat,Mint111,MCAT,0.25,1.0,2024-05-01T12:00:00+00:00");
        assert!(lines[2].starts_with("Moon Cat,Mint222,"));
    }
}
