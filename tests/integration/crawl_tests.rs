//! Integration tests for the harvester
//!
//! These tests use wiremock to stand up a fake news site (robots.txt,
//! sitemap index, section sitemaps, article pages, images) and run the
//! full pipeline end-to-end against a temporary database and image folder.

use news_harvest::config::Config;
use news_harvest::crawler::Harvester;
use news_harvest::storage::{ArticleStore, NewArticle, SqliteStorage};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock site and temp paths
fn create_test_config(site: &str, workdir: &TempDir) -> Config {
    let mut config = Config::default();
    config.harvest.sites = vec![site.to_string()];
    config.harvest.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.database_path = workdir
        .path()
        .join("articles.db")
        .to_string_lossy()
        .into_owned();
    config.output.image_dir = workdir.path().join("images").to_string_lossy().into_owned();
    config
}

fn article_html(title: &str, with_byline: bool) -> String {
    let byline = if with_byline {
        r#"<div class="abp-article-byline-author">Desk Reporter</div>"#
    } else {
        ""
    };
    format!(
        r#"<html><body>
        <h1 class="abp-article-title">{title}</h1>
        <h2 class="abp-article-slug">Summary of {title}</h2>
        <div class="lead-image"><img src="/img/{title}.png"></div>
        {byline}
        <div class="abp-story-detail"><p>Story of {title}.</p><div class="readMore">More</div></div>
        </body></html>"#
    )
}

fn urlset(base: &str, entries: &[(&str, &str)]) -> String {
    let urls: String = entries
        .iter()
        .map(|(p, lastmod)| {
            format!(
                "<url><loc>{}{}</loc><lastmod>{}</lastmod></url>",
                base, p, lastmod
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        urls
    )
}

async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

async fn mount_article(server: &MockServer, at: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a complete fake site with three sections of three articles each
async fn mount_news_site(server: &MockServer) {
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /admin\nSitemap: {}/sitemap-index.xml\n",
            base
        )))
        .mount(server)
        .await;

    mount_xml(
        server,
        "/sitemap-index.xml",
        format!(
            r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sitemap><loc>{base}/sitemaps/news.xml</loc><lastmod>2024-05-01</lastmod></sitemap>
            <sitemap><loc>{base}/sitemaps/sports.xml</loc><lastmod>2024-05-02</lastmod></sitemap>
            <sitemap><loc>{base}/sitemaps/extra.xml</loc><lastmod>2024-05-03</lastmod></sitemap>
            </sitemapindex>"#
        ),
    )
    .await;

    mount_xml(
        server,
        "/sitemaps/news.xml",
        urlset(
            &base,
            &[
                ("/news/one", "2024-05-01T09:00:00+05:30"),
                ("/news/two", "2024-05-01T10:00:00+05:30"),
                ("/news/three", "2024-05-01T11:00:00+05:30"),
            ],
        ),
    )
    .await;

    mount_xml(
        server,
        "/sitemaps/sports.xml",
        urlset(
            &base,
            &[
                ("/sports/one", "2024-05-02"),
                ("/sports/incomplete", "2024-05-02T12:00:00Z"),
            ],
        ),
    )
    .await;

    // Beyond the two-section limit: must never be requested
    Mock::given(method("GET"))
        .and(path("/sitemaps/extra.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset></urlset>"))
        .expect(0)
        .mount(server)
        .await;

    // Beyond the two-article limit: must never be requested
    Mock::given(method("GET"))
        .and(path("/news/three"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("three", true)))
        .expect(0)
        .mount(server)
        .await;

    mount_article(server, "/news/one", article_html("one", true)).await;
    mount_article(server, "/news/two", article_html("two", true)).await;
    mount_article(server, "/sports/one", article_html("sportsone", true)).await;
    mount_article(server, "/sports/incomplete", article_html("incomplete", false)).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/img/.+\.png$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG fake".to_vec()))
        .mount(server)
        .await;
}

/// Counts files in every daily folder under the image root
fn count_image_files(root: &Path) -> usize {
    let Ok(days) = std::fs::read_dir(root) else {
        return 0;
    };
    days.filter_map(Result::ok)
        .filter(|day| day.path().is_dir())
        .map(|day| std::fs::read_dir(day.path()).unwrap().count())
        .sum()
}

#[tokio::test]
async fn test_full_harvest_respects_limits() {
    let server = MockServer::start().await;
    mount_news_site(&server).await;

    let workdir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), &workdir);
    let image_root = config.output.image_dir.clone();
    let db_path = config.output.database_path.clone();

    let mut harvester = Harvester::new(config).expect("Failed to create harvester");
    let summary = harvester.run().await.expect("Harvest failed");

    assert_eq!(summary.sites_visited, 1);
    assert_eq!(summary.sections_visited, 2);
    assert_eq!(summary.articles_stored, 3);
    assert_eq!(summary.images_saved, 3);
    assert_eq!(summary.incomplete_skipped, 1);
    assert_eq!(summary.duplicates_skipped, 0);
    assert_eq!(summary.failures, 0);

    drop(harvester);

    let storage = SqliteStorage::new(Path::new(&db_path)).expect("Failed to open DB");
    assert_eq!(storage.count_articles().unwrap(), 3);
    assert_eq!(storage.count_articles_with_images().unwrap(), 3);
    assert_eq!(count_image_files(Path::new(&image_root)), 3);

    let one = storage
        .get_article_by_url(&format!("{}/news/one", server.uri()))
        .unwrap()
        .expect("news/one should be stored");
    assert_eq!(one.id, 1);
    assert_eq!(one.title, "one");
    assert_eq!(one.slug, "Summary of one");
    assert_eq!(one.byline_author, "Desk Reporter");
    assert_eq!(one.article_detail, "Story of one.");
    assert_eq!(one.article_date.as_deref(), Some("2024-05-01"));
    assert_eq!(
        one.article_date_and_time.to_rfc3339(),
        "2024-05-01T09:00:00+05:30"
    );

    let sports = storage
        .get_article_by_url(&format!("{}/sports/one", server.uri()))
        .unwrap()
        .expect("sports/one should be stored");
    assert_eq!(sports.article_date.as_deref(), Some("2024-05-02"));
    assert_eq!(
        sports.article_date_and_time.to_rfc3339(),
        "2024-05-02T00:00:00+00:00"
    );

    assert!(!storage
        .article_exists(&format!("{}/sports/incomplete", server.uri()))
        .unwrap());
}

#[tokio::test]
async fn test_second_run_skips_duplicates() {
    let server = MockServer::start().await;
    mount_news_site(&server).await;

    let workdir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), &workdir);
    let image_root = config.output.image_dir.clone();

    let mut first = Harvester::new(config.clone()).unwrap();
    first.run().await.unwrap();
    drop(first);

    let mut second = Harvester::new(config).unwrap();
    let summary = second.run().await.unwrap();

    assert_eq!(summary.articles_stored, 0);
    assert_eq!(summary.duplicates_skipped, 3);
    assert_eq!(summary.incomplete_skipped, 1);
    assert_eq!(second.storage().count_articles().unwrap(), 3);
    assert_eq!(count_image_files(Path::new(&image_root)), 3);
}

#[tokio::test]
async fn test_preseeded_article_is_not_refetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("Sitemap: {}/index.xml", base)),
        )
        .mount(&server)
        .await;
    mount_xml(
        &server,
        "/index.xml",
        format!(
            "<sitemapindex><sitemap><loc>{}/section.xml</loc><lastmod>2024-06-01</lastmod></sitemap></sitemapindex>",
            base
        ),
    )
    .await;
    mount_xml(
        &server,
        "/section.xml",
        urlset(&base, &[("/seeded", "2024-06-01T08:00:00Z")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/seeded"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("seeded", true)))
        .expect(0)
        .mount(&server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let config = create_test_config(&base, &workdir);

    {
        let mut storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
        storage
            .insert_article(&NewArticle {
                news_source_url: format!("{}/seeded", base),
                title: "Seeded title".to_string(),
                slug: "seeded".to_string(),
                image_path: None,
                byline_author: "Archive".to_string(),
                article_detail: "Seeded body".to_string(),
                article_date: None,
                article_date_and_time: chrono::DateTime::parse_from_rfc3339(
                    "2024-06-01T08:00:00Z",
                )
                .unwrap(),
            })
            .unwrap();
    }

    let mut harvester = Harvester::new(config).unwrap();
    let summary = harvester.run().await.unwrap();

    assert_eq!(summary.duplicates_skipped, 1);
    assert_eq!(summary.articles_stored, 0);

    let record = harvester
        .storage()
        .get_article_by_url(&format!("{}/seeded", base))
        .unwrap()
        .unwrap();
    assert_eq!(record.title, "Seeded title");
}

#[tokio::test]
async fn test_robots_without_sitemap_is_noop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow:"))
        .mount(&server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let mut harvester = Harvester::new(create_test_config(&server.uri(), &workdir)).unwrap();
    let summary = harvester.run().await.unwrap();

    assert_eq!(summary.sites_visited, 1);
    assert_eq!(summary.sections_visited, 0);
    assert_eq!(summary.failures, 0);
    assert_eq!(harvester.storage().count_articles().unwrap(), 0);
}

#[tokio::test]
async fn test_missing_robots_is_logged_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let mut harvester = Harvester::new(create_test_config(&server.uri(), &workdir)).unwrap();
    let summary = harvester.run().await.expect("run should not fail");

    assert_eq!(summary.failures, 1);
    assert_eq!(summary.articles_stored, 0);
}

#[tokio::test]
async fn test_bad_section_does_not_stop_the_next() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("Sitemap: {}/index.xml", base)),
        )
        .mount(&server)
        .await;
    mount_xml(
        &server,
        "/index.xml",
        format!(
            "<sitemapindex>\
             <sitemap><loc>{base}/broken.xml</loc><lastmod>2024-06-01</lastmod></sitemap>\
             <sitemap><loc>{base}/good.xml</loc><lastmod>2024-06-02</lastmod></sitemap>\
             </sitemapindex>"
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_xml(
        &server,
        "/good.xml",
        urlset(
            &base,
            &[("/bad-date", "not a date"), ("/fine", "2024-06-02T07:30:00Z")],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/bad-date"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("baddate", true)))
        .expect(0)
        .mount(&server)
        .await;
    mount_article(&server, "/fine", article_html("fine", true)).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/img/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
        .mount(&server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let mut harvester = Harvester::new(create_test_config(&base, &workdir)).unwrap();
    let summary = harvester.run().await.unwrap();

    // broken section + malformed date
    assert_eq!(summary.failures, 2);
    assert_eq!(summary.sections_visited, 1);
    assert_eq!(summary.articles_stored, 1);
    assert!(harvester
        .storage()
        .article_exists(&format!("{}/fine", base))
        .unwrap());
}
