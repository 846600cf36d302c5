use std::path::Path;

use revmark::source::write_files;
use revmark::{
    FileRecord, JsonFormat, Manifest, ManifestFormat, ManifestOptions, ManifestStage, Pipeline,
    RevStage, YamlFormat,
};
use tempfile::TempDir;

/// Rename `files` (relative path, contents) under `<cwd>/src`, build the
/// manifest, and write it to `cwd`. Returns the manifest on disk.
async fn run(cwd: &Path, options: ManifestOptions, files: &[(&str, &str)]) -> Option<String> {
    let base = cwd.join("src");
    let records: Vec<FileRecord> = files
        .iter()
        .map(|(path, contents)| {
            FileRecord::with_contents(cwd, base.clone(), base.join(path), *contents)
        })
        .collect();

    let out = Pipeline::new()
        .pipe(RevStage::new())
        .pipe(ManifestStage::new(options.cwd(cwd)))
        .run_all(records)
        .await
        .unwrap();
    write_files(cwd, &out).await.unwrap();

    std::fs::read_to_string(cwd.join("rev-manifest.json")).ok()
}

fn parse(text: &str) -> Manifest {
    JsonFormat.parse(text).unwrap()
}

#[tokio::test]
async fn merge_unions_disjoint_runs() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();

    run(cwd, ManifestOptions::new().merge(true), &[("a.js", "a")]).await;
    let text = run(cwd, ManifestOptions::new().merge(true), &[("b.js", "b")])
        .await
        .unwrap();

    let manifest = parse(&text);
    assert_eq!(manifest.len(), 2);
    assert!(manifest.contains_key("a.js"));
    assert!(manifest.contains_key("b.js"));
}

#[tokio::test]
async fn merge_with_identical_input_matches_single_run() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();
    let inputs = [("a.js", "a"), ("css/site.css", "body{}")];

    let once = run(cwd, ManifestOptions::new().merge(true), &inputs)
        .await
        .unwrap();
    let twice = run(cwd, ManifestOptions::new().merge(true), &inputs)
        .await
        .unwrap();
    assert_eq!(once, twice);
}

#[tokio::test]
async fn merge_new_value_overrides_old() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();

    run(cwd, ManifestOptions::new().merge(true), &[("a.js", "v1")]).await;
    let text = run(cwd, ManifestOptions::new().merge(true), &[("a.js", "v2")])
        .await
        .unwrap();

    let manifest = parse(&text);
    assert_eq!(manifest.len(), 1);
    assert_eq!(
        manifest.get("a.js"),
        Some(&format!("{}-a.js", revmark::fingerprint("v2")))
    );
}

#[tokio::test]
async fn without_merge_previous_entries_are_dropped() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();

    run(cwd, ManifestOptions::new(), &[("a.js", "a")]).await;
    let text = run(cwd, ManifestOptions::new(), &[("b.js", "b")])
        .await
        .unwrap();

    let manifest = parse(&text);
    assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["b.js"]);
}

#[tokio::test]
async fn malformed_manifest_on_disk_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();
    std::fs::write(cwd.join("rev-manifest.json"), "not json at all").unwrap();

    let text = run(cwd, ManifestOptions::new().merge(true), &[("a.js", "a")])
        .await
        .unwrap();
    assert_eq!(parse(&text).len(), 1);
}

#[tokio::test]
async fn empty_run_leaves_existing_manifest_alone() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();
    std::fs::write(cwd.join("rev-manifest.json"), "{\"keep\": \"me\"}").unwrap();

    let text = run(cwd, ManifestOptions::new().merge(true), &[]).await.unwrap();
    assert_eq!(text, "{\"keep\": \"me\"}");
}

#[tokio::test]
async fn yaml_format_round_trips_through_merge() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();
    let options = || {
        ManifestOptions::from_path("rev-manifest.json")
            .merge(true)
            .format(YamlFormat)
    };

    run(cwd, options(), &[("a.js", "a")]).await;
    let text = run(cwd, options(), &[("b.js", "b")]).await.unwrap();

    let manifest = YamlFormat.parse(&text).unwrap();
    assert_eq!(manifest.len(), 2);
}
