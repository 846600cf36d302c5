use std::path::PathBuf;

use revmark::{fingerprint, FileRecord, Pipeline, RevStage};

fn file(path: &str, contents: &str) -> FileRecord {
    FileRecord::with_contents("/work", "/work", path, contents)
}

async fn rev(files: Vec<FileRecord>) -> Vec<FileRecord> {
    Pipeline::new()
        .pipe(RevStage::new())
        .run_all(files)
        .await
        .unwrap()
}

#[tokio::test]
async fn map_embeds_parent_fingerprint_not_its_own() {
    let map_contents = r#"{"version":3,"file":"app.js","mappings":""}"#;
    let out = rev(vec![
        file("app.js.map", map_contents),
        file("app.js", "function a() {}"),
    ])
    .await;

    let parent = fingerprint("function a() {}");
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].path, PathBuf::from(format!("{}-app.js", parent)));
    assert_eq!(out[1].path, PathBuf::from(format!("{}-app.js.map", parent)));
    assert_ne!(parent, fingerprint(map_contents));

    let revision = out[1].revision.as_ref().unwrap();
    assert_eq!(revision.original_path, PathBuf::from("app.js.map"));
    assert_eq!(revision.original_base, PathBuf::from("/work"));
}

#[tokio::test]
async fn unmatched_map_fingerprints_itself() {
    let map_contents = r#"{"version":3,"file":"gone.js"}"#;
    let out = rev(vec![file("app.js", "x"), file("gone.js.map", map_contents)]).await;

    assert_eq!(
        out[1].path,
        PathBuf::from(format!("{}-gone.js.map", fingerprint(map_contents)))
    );
    assert_eq!(
        out[1].revision.as_ref().unwrap().fingerprint,
        fingerprint(map_contents)
    );
}

#[tokio::test]
async fn maps_follow_all_regular_files() {
    let out = rev(vec![
        file("/work/js/a.js.map", r#"{"file":"/work/js/a.js"}"#),
        file("/work/js/a.js", "a"),
        file("/work/js/b.js.map", r#"{"file":"/work/js/b.js"}"#),
        file("/work/js/b.js", "b"),
        file("/work/css/c.css", "c"),
    ])
    .await;

    let names: Vec<String> = out
        .iter()
        .map(|f| f.revision.as_ref().unwrap().original_path.display().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "/work/js/a.js",
            "/work/js/b.js",
            "/work/css/c.css",
            "/work/js/a.js.map",
            "/work/js/b.js.map",
        ]
    );
    assert_eq!(
        out[4].path,
        PathBuf::from(format!("/work/js/{}-b.js.map", fingerprint("b")))
    );
}

#[tokio::test]
async fn minified_parent_keeps_compound_suffix() {
    let out = rev(vec![
        file("app.min.js", "min"),
        file("app.min.js.map", "{\"file\":\"app.min.js\"}"),
    ])
    .await;

    let fp = fingerprint("min");
    assert_eq!(out[0].path, PathBuf::from(format!("{}-app.min.js", fp)));
    assert_eq!(out[1].path, PathBuf::from(format!("{}-app.min.js.map", fp)));
}

#[tokio::test]
async fn declared_file_must_match_the_original_path_exactly() {
    let map_contents = r#"{"file":"app.js"}"#;
    let out = rev(vec![
        file("/work/js/app.js", "x"),
        file("/work/js/app.js.map", map_contents),
    ])
    .await;

    assert_eq!(
        out[1].path,
        PathBuf::from(format!("/work/js/{}-app.js.map", fingerprint(map_contents)))
    );
}

#[tokio::test]
async fn separate_runs_do_not_share_state() {
    let first = rev(vec![file("app.js", "one")]).await;
    assert_eq!(first.len(), 1);

    // The parent was renamed in a different run, so the map hashes itself.
    let map_contents = r#"{"file":"app.js"}"#;
    let second = rev(vec![file("app.js.map", map_contents)]).await;
    assert_eq!(
        second[0].path,
        PathBuf::from(format!("{}-app.js.map", fingerprint(map_contents)))
    );
}
