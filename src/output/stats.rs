//! Statistics generation from the article database
//!
//! This module provides functionality for extracting and displaying
//! article statistics from the storage layer, and for printing the
//! summary of a finished harvest run.

use crate::crawler::RunSummary;
use crate::storage::{ArticleRecord, ArticleStore};
use crate::Result;

/// Number of recent articles listed by `--stats`
pub const RECENT_ARTICLE_LIMIT: usize = 5;

/// Article statistics summary
#[derive(Debug, Clone)]
pub struct ArticleStatistics {
    /// Total number of stored articles
    pub total_articles: u64,

    /// Number of articles with a downloaded lead image
    pub articles_with_images: u64,

    /// The most recently stored articles, newest first
    pub recent: Vec<ArticleRecord>,
}

impl ArticleStatistics {
    /// Percentage of articles that have a local image
    pub fn image_coverage(&self) -> f64 {
        if self.total_articles == 0 {
            0.0
        } else {
            (self.articles_with_images as f64 / self.total_articles as f64) * 100.0
        }
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn ArticleStore) -> Result<ArticleStatistics> {
    Ok(ArticleStatistics {
        total_articles: storage.count_articles()?,
        articles_with_images: storage.count_articles_with_images()?,
        recent: storage.recent_articles(RECENT_ARTICLE_LIMIT)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ArticleStatistics) {
    println!("=== Article Statistics ===\n");

    println!("Overview:");
    println!("  Stored articles: {}", stats.total_articles);
    println!(
        "  With lead image: {} ({:.1}%)",
        stats.articles_with_images,
        stats.image_coverage()
    );
    println!();

    if !stats.recent.is_empty() {
        println!("Most Recently Stored:");
        for article in &stats.recent {
            println!(
                "  #{} [{}] {}",
                article.id,
                article.article_date_and_time.format("%Y-%m-%d %H:%M %:z"),
                article.title
            );
            println!("      {}", article.news_source_url);
        }
        println!();
    }
}

/// Prints the counters of a finished run to stdout
pub fn print_run_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");
    println!("  Sites visited:        {}", summary.sites_visited);
    println!("  Sitemaps visited:     {}", summary.sections_visited);
    println!("  Articles stored:      {}", summary.articles_stored);
    println!("  Images saved:         {}", summary.images_saved);
    println!("  Duplicates skipped:   {}", summary.duplicates_skipped);
    println!("  Incomplete skipped:   {}", summary.incomplete_skipped);
    println!("  Failures:             {}", summary.failures);
}
