use recfix_core::resolver::{resolve, resolve_all, resolve_with_kind, UrlKind};

#[test]
fn test_watch_urls() {
    let id = resolve("https://www.youtube.com/watch?v=abc123").unwrap();
    assert_eq!(id.as_str(), "abc123");

    // extra parameters, other subdomains, missing scheme
    assert_eq!(
        resolve("https://m.youtube.com/watch?t=42&v=dQw4w9WgXcQ&list=PL1")
            .unwrap()
            .as_str(),
        "dQw4w9WgXcQ"
    );
    assert_eq!(
        resolve("music.youtube.com/watch?v=xyz").unwrap().as_str(),
        "xyz"
    );
    assert_eq!(
        resolve_with_kind("https://youtube.com/watch?v=abc").unwrap().1,
        UrlKind::Watch
    );
}

#[test]
fn test_short_links() {
    let (id, kind) = resolve_with_kind("https://youtu.be/abc123").unwrap();
    assert_eq!(id.as_str(), "abc123");
    assert_eq!(kind, UrlKind::ShortLink);

    assert_eq!(
        resolve("https://youtu.be/abc123?si=tracking").unwrap().as_str(),
        "abc123"
    );
}

#[test]
fn test_rejections() {
    assert!(resolve("https://example.com/x").is_none());
    assert!(resolve("https://www.youtube.com/feed/subscriptions").is_none());
    assert!(resolve("https://www.youtube.com/watch?v=").is_none());
    assert!(resolve("https://youtu.be/").is_none());
    assert!(resolve("https://notyoutube.com/watch?v=abc").is_none());
    assert!(resolve("").is_none());
    assert!(resolve("::::").is_none());
}

#[test]
fn test_batch_resolution() {
    let inputs = [
        "https://www.youtube.com/watch?v=aaaaaaaaaaa",
        "not a url",
        "https://youtu.be/aaaaaaaaaaa",
        "bbbbbbbbbbb",
        "",
    ];

    let strict = resolve_all(inputs, false);
    assert_eq!(strict.ids.len(), 1);
    assert_eq!(strict.rejected, vec!["not a url", "bbbbbbbbbbb"]);

    let lenient = resolve_all(inputs, true);
    let ids: Vec<&str> = lenient.ids.iter().map(|i| i.as_str()).collect();
    assert_eq!(ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb"]);
    assert_eq!(lenient.rejected, vec!["not a url"]);
}
