//! Whole-manifest tests
//!
//! Applies the built-in families to a JSON manifest fixture and runs the
//! batch mode over a temporary directory.

use mpd_inherit::config::EffectiveConfig;
use mpd_inherit::document::{load_document, parse_document};
use mpd_inherit::{apply_families, resolve_dir, resolve_file, ResolverOptions};
use mpd_schema::builtin_families;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const LIVE_MANIFEST: &str = include_str!("fixtures/live_manifest.json");

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_manifest_fully_resolved() {
    let document = parse_document(LIVE_MANIFEST).unwrap();
    let resolution =
        apply_families(&builtin_families(), &document, ResolverOptions::default()).unwrap();

    // One Period for the segment family, two AdaptationSets for the other.
    assert_eq!(resolution.roots_resolved, 3);
    assert_eq!(resolution.root.node_count(), document.node_count());

    let video_low = resolution.root.descend(&[0, 0, 0]).unwrap();
    assert_eq!(video_low.property("id"), Some(&json!("v0")));
    assert_eq!(video_low.property("mimeType"), Some(&json!("video/mp4")));
    assert_eq!(video_low.property("codecs"), Some(&json!("avc1.4d401f")));
    assert_eq!(
        video_low.property("SegmentTemplate").and_then(|t| t.get("timescale")),
        Some(&json!(1000))
    );
    assert!(video_low.property("ContentProtection").is_some());

    let video_high = resolution.root.descend(&[0, 0, 1]).unwrap();
    assert_eq!(video_high.property("codecs"), Some(&json!("avc1.64001f")));

    let sub = resolution.root.descend(&[0, 0, 1, 0]).unwrap();
    assert_eq!(sub.property("codecs"), Some(&json!("avc1.64001f")));
    assert_eq!(sub.property("width"), Some(&json!(1280)));
    assert!(sub.property("SegmentTemplate").is_none());

    let audio = resolution.root.descend(&[0, 1, 0]).unwrap();
    assert_eq!(audio.property("mimeType"), Some(&json!("audio/mp4")));
    assert!(audio.property("codecs").is_none());
    assert!(audio.property("lang").is_none());

    // Element nested where the schema has no rule stays as parsed.
    let channels = resolution.root.descend(&[0, 1, 0, 0]).unwrap();
    assert_eq!(channels.properties.len(), 1);
    assert_eq!(channels.property("value"), Some(&json!("2")));

    // Manifest-level attributes are untouched.
    assert_eq!(resolution.root.property("type"), Some(&json!("static")));
    assert!(resolution.root.descend(&[0]).unwrap().property("mimeType").is_none());
}

#[test]
fn test_manifest_codecs_override_warns() {
    let resolution = resolve_file(
        &fixture_path("live_manifest.json"),
        &builtin_families(),
        ResolverOptions::default(),
    )
    .unwrap();

    assert_eq!(resolution.warnings.len(), 1);
    let warning = &resolution.warnings[0];
    assert_eq!(warning.family, "AdaptationSet");
    assert_eq!(warning.diagnostic.key, "codecs");
    assert_eq!(
        warning.diagnostic.path,
        "MPD/Period[0]/AdaptationSet[0]/Representation[1]"
    );
}

#[test]
fn test_manifest_strict_rejected() {
    let err = resolve_file(
        &fixture_path("live_manifest.json"),
        &builtin_families(),
        ResolverOptions::strict(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("codecs"));
}

#[test]
fn test_config_drives_family_selection() {
    let cli = json!({"families": ["representation-base"]});
    let config = EffectiveConfig::build(None, None, Some(cli)).unwrap();

    let document = load_document(&fixture_path("live_manifest.json")).unwrap();
    let resolution =
        apply_families(&config.families(), &document, config.resolver_options()).unwrap();

    assert_eq!(resolution.roots_resolved, 2);
    let video_low = resolution.root.descend(&[0, 0, 0]).unwrap();
    assert!(video_low.property("SegmentTemplate").is_none());
    assert_eq!(video_low.property("mimeType"), Some(&json!("video/mp4")));
}

#[test]
fn test_batch_reports_each_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a_good.json"), LIVE_MANIFEST).unwrap();
    fs::write(dir.path().join("b_broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(
        dir.path().join("nested/c_plain.json"),
        r#"{"tag": "MPD", "properties": {"type": "dynamic"}}"#,
    )
    .unwrap();

    let outcomes =
        resolve_dir(dir.path(), &builtin_families(), ResolverOptions::default()).unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].path.ends_with("a_good.json"));
    assert!(outcomes[0].ok);
    assert_eq!(outcomes[0].warnings, 1);

    assert!(outcomes[1].path.ends_with("b_broken.json"));
    assert!(!outcomes[1].ok);
    assert!(outcomes[1].error.as_deref().unwrap().contains("Parse error"));

    assert!(outcomes[2].path.ends_with("c_plain.json"));
    assert!(outcomes[2].ok);
}

#[test]
fn test_missing_document() {
    let err = load_document(&fixture_path("absent.json")).unwrap_err();
    assert!(err.to_string().starts_with("IO error"));
}
