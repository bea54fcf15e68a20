//! Release discovery integration tests

mod helper;

use std::fs;

use godotkit::feed::{self, DiscoverError, FetchError, SkipReason};
use godotkit::project::{self, FieldChange, ProjectFile, ProjectKeys, ProjectUpdater};
use helper::{GODOT_4_PROJECT, MemoryFeed, atom_feed, create_project, rss_feed};

#[tokio::test]
async fn discover_orders_releases_and_reports_skipped_entries() {
    let source = MemoryFeed::new(rss_feed(&[
        ("Dev snapshot: Godot 4.4 dev 3", "Fri, 04 Oct 2024 12:00:00 +0000"),
        ("Godot Showcase - Dome Keeper", "Thu, 03 Oct 2024 12:00:00 +0000"),
        ("Maintenance release: Godot 4.3.1", "Wed, 02 Oct 2024 12:00:00 +0000"),
        ("Release candidate: Godot 4.3 RC 3", "Tue, 06 Aug 2024 12:00:00 +0000"),
        ("Godot 4.3 is out!", "Thu, 15 Aug 2024 12:00:00 +0000"),
    ]));

    let resolution = feed::discover(&source).await.unwrap();

    let versions: Vec<&str> = resolution.candidates.iter().map(|c| c.version.raw()).collect();
    assert_eq!(versions, vec!["4.4-dev3", "4.3.1", "4.3", "4.3-rc3"]);
    assert_eq!(resolution.skipped.len(), 1);
    assert_eq!(resolution.skipped[0].index, 1);
    assert!(matches!(resolution.skipped[0].reason, SkipReason::NoVersion(_)));

    assert_eq!(resolution.latest(false).map(|c| c.version.raw()), Some("4.3.1"));
    assert_eq!(resolution.latest(true).map(|c| c.version.raw()), Some("4.4-dev3"));
}

#[tokio::test]
async fn discover_reads_atom_feeds() {
    let source = MemoryFeed::new(atom_feed(&[
        ("4.2.2-stable", "2024-04-17T10:00:00Z"),
        ("4.2.1-stable", "2023-12-12T10:00:00Z"),
    ]));

    let resolution = feed::discover(&source).await.unwrap();

    assert_eq!(resolution.latest(false).map(|c| c.version.raw()), Some("4.2.2-stable"));
}

#[tokio::test]
async fn discover_propagates_fetch_failures() {
    let source = MemoryFeed::not_found("https://godotengine.org/rss.xml");

    let result = feed::discover(&source).await;

    assert!(matches!(
        result,
        Err(DiscoverError::Fetch(FetchError::NotFound(_)))
    ));
}

#[tokio::test]
async fn latest_release_updates_project() {
    let (_dir, path) = create_project(GODOT_4_PROJECT);
    let source = MemoryFeed::new(rss_feed(&[
        ("Maintenance release: Godot 4.3.1", "Wed, 02 Oct 2024 12:00:00 +0000"),
        ("Godot 4.2.2", "Tue, 16 Apr 2024 12:00:00 +0000"),
    ]));

    let resolution = feed::discover(&source).await.unwrap();
    let release = resolution.latest(false).unwrap();
    let current = ProjectFile::open(&path).unwrap().metadata(&ProjectKeys::default()).compatibility_version.unwrap();
    assert!(release.version > current);

    let report =
        project::update_file(&path, &ProjectUpdater::default(), Some(&release.version), None).unwrap();

    assert_eq!(report.engine_version, Some(FieldChange::Updated));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        GODOT_4_PROJECT.replace("PackedStringArray(\"4.2\",", "PackedStringArray(\"4.3\",")
    );
}
