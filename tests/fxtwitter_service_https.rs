use std::time::Duration;
use xpost::ident::PostRef;
use xpost::twitter::{ExtractMode, FxTwitterService, PostClient, extract};

// Talks to the live FxTwitter API; run with `--ignored`.

#[tokio::test]
#[ignore]
async fn it_fetches_a_live_article() {
    let service = FxTwitterService::new(FxTwitterService::DEFAULT_BASE, Duration::from_secs(30))
        .expect("could not create service");
    let post = PostRef::parse("https://x.com/RianSweetDoris/status/2019833629233324539").unwrap();
    let resolved = PostClient::new(service)
        .fetch_post(&post)
        .await
        .expect("could not fetch post");
    let markdown = extract(resolved.post(), ExtractMode::ArticleFull);
    assert!(!markdown.trim().is_empty());
}
