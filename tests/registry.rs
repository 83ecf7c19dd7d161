// tests/registry.rs

use std::sync::Arc;

use publisher_runner::config::PublisherInstallation;
use publisher_runner::registry::InstallationRegistry;
use publisher_runner_test_utils::builders::ConfigFileBuilder;

#[test]
fn find_returns_exact_match_or_none() {
    let registry = InstallationRegistry::new(vec![
        PublisherInstallation::new("pub", "/opt/pub.sh"),
        PublisherInstallation::new("pub-legacy", "/opt/legacy.sh"),
    ]);

    assert_eq!(registry.find("pub").unwrap().home, "/opt/pub.sh");
    assert_eq!(registry.find("pub-legacy").unwrap().home, "/opt/legacy.sh");
    assert!(registry.find("PUB").is_none());
    assert!(registry.find("").is_none());
}

#[test]
fn from_config_preserves_order() {
    let cfg = ConfigFileBuilder::new()
        .with_installation(PublisherInstallation::new("b", "/b"))
        .with_installation(PublisherInstallation::new("a", "/a"))
        .build();

    let registry = InstallationRegistry::from_config(&cfg);
    let names: Vec<_> = registry.installations().iter().map(|i| i.name.clone()).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn readers_keep_their_snapshot_across_updates() {
    let registry = Arc::new(InstallationRegistry::new(vec![PublisherInstallation::new(
        "pub", "/old",
    )]));

    let before = registry.installations();
    registry.set_installations(vec![PublisherInstallation::new("pub", "/new")]);

    assert_eq!(before[0].home, "/old");
    assert_eq!(registry.find("pub").unwrap().home, "/new");
}

#[test]
fn concurrent_readers_see_whole_snapshots() {
    let registry = Arc::new(InstallationRegistry::new(vec![
        PublisherInstallation::new("a", "/1"),
        PublisherInstallation::new("b", "/1"),
    ]));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let snap = registry.installations();
                    assert_eq!(snap.len(), 2);
                    assert_eq!(snap[0].home, snap[1].home);
                }
            })
        })
        .collect();

    for i in 0..50 {
        let home = format!("/{i}");
        registry.set_installations(vec![
            PublisherInstallation::new("a", home.clone()),
            PublisherInstallation::new("b", home),
        ]);
    }

    for r in readers {
        r.join().unwrap();
    }
}
