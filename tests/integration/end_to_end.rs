use std::path::PathBuf;

use revmark::source::{read_tree, write_files};
use revmark::{
    fingerprint, Contents, FileRecord, JsonFormat, ManifestFormat, ManifestOptions,
    ManifestStage, Pipeline, RevError, RevStage,
};
use tempfile::TempDir;

fn text(file: &FileRecord) -> String {
    String::from_utf8(file.contents.as_bytes().unwrap().to_vec()).unwrap()
}

#[tokio::test]
async fn css_file_is_renamed_and_manifested() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path().to_path_buf();
    let base = cwd.join("src");
    let input = FileRecord::with_contents(
        cwd.clone(),
        base.clone(),
        base.join("css/main.css"),
        "body{color:red}",
    );
    let fp = fingerprint("body{color:red}");

    let mut renamed = Pipeline::new()
        .pipe(RevStage::new())
        .run_all(vec![input])
        .await
        .unwrap();
    assert_eq!(renamed.len(), 1);
    assert_eq!(renamed[0].path, base.join(format!("css/{}-main.css", fp)));
    assert_eq!(renamed[0].relative(), format!("css/{}-main.css", fp));

    let mut manifest_pipeline = Pipeline::new().pipe(ManifestStage::new(
        ManifestOptions::new().cwd(cwd.clone()),
    ));
    let out = manifest_pipeline.run_all(renamed.drain(..)).await.unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].path, cwd.join("rev-manifest.json"));
    assert_eq!(
        text(&out[0]),
        format!("{{\n  \"css/main.css\": \"css/{}-main.css\"\n}}", fp)
    );
}

#[tokio::test]
async fn chained_stages_emit_only_the_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path().to_path_buf();
    let base = cwd.join("src");
    let files = vec![
        FileRecord::with_contents(cwd.clone(), base.clone(), base.join("a.js"), "a"),
        FileRecord::with_contents(cwd.clone(), base.clone(), base.join("b.js"), "b"),
    ];

    let out = Pipeline::new()
        .pipe(RevStage::new())
        .pipe(ManifestStage::new(ManifestOptions::new().cwd(cwd.clone())))
        .run_all(files)
        .await
        .unwrap();

    assert_eq!(out.len(), 1);
    let manifest = JsonFormat.parse(&text(&out[0])).unwrap();
    assert_eq!(
        manifest.get("a.js"),
        Some(&format!("{}-a.js", fingerprint("a")))
    );
    assert_eq!(
        manifest.get("b.js"),
        Some(&format!("{}-b.js", fingerprint("b")))
    );
}

#[tokio::test]
async fn nothing_renamed_means_no_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path().to_path_buf();

    let out = Pipeline::new()
        .pipe(RevStage::new())
        .pipe(ManifestStage::new(ManifestOptions::new().cwd(cwd.clone())))
        .run_all(vec![FileRecord::new(cwd.join("src/dir"))])
        .await
        .unwrap();

    assert!(out.is_empty());
    assert!(!cwd.join("rev-manifest.json").exists());
}

#[tokio::test]
async fn null_files_pass_through_rename_unchanged() {
    let out = Pipeline::new()
        .pipe(RevStage::new())
        .run_all(vec![FileRecord::new("/work/src/dir")])
        .await
        .unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].path, PathBuf::from("/work/src/dir"));
    assert!(out[0].is_null());
    assert!(out[0].revision.is_none());
}

#[tokio::test]
async fn streaming_input_aborts_the_run() {
    let mut streamed = FileRecord::new("/work/src/big.bin");
    streamed.contents = Contents::Stream(Box::new(tokio::io::empty()));

    let err = Pipeline::new()
        .pipe(RevStage::new())
        .run_all(vec![streamed])
        .await
        .unwrap_err();
    assert!(matches!(err, RevError::StreamingNotSupported { .. }));
}

#[tokio::test]
async fn disk_tree_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let dist = temp_dir.path().join("dist");
    std::fs::create_dir_all(src.join("js")).unwrap();
    std::fs::write(src.join("js/app.js"), "console.log(1)").unwrap();
    let map_contents = "{\"version\":3,\"file\":\"app.js\"}";
    std::fs::write(src.join("js/app.js.map"), map_contents).unwrap();

    let files = read_tree(&src).unwrap();
    let renamed = Pipeline::new()
        .pipe(RevStage::new())
        .run_all(files)
        .await
        .unwrap();
    write_files(&dist, &renamed).await.unwrap();

    // Records from disk carry absolute paths, so the map's relative `file`
    // finds no parent and the map is hashed on its own contents.
    let fp = fingerprint("console.log(1)");
    let map_fp = fingerprint(map_contents);
    assert!(dist.join(format!("js/{}-app.js", fp)).exists());
    assert!(dist.join(format!("js/{}-app.js.map", map_fp)).exists());

    let manifest = Pipeline::new()
        .pipe(ManifestStage::new(ManifestOptions::new().cwd(dist.clone())))
        .run_all(renamed)
        .await
        .unwrap();
    write_files(&dist, &manifest).await.unwrap();

    let written = std::fs::read_to_string(dist.join("rev-manifest.json")).unwrap();
    let parsed = JsonFormat.parse(&written).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(
        parsed.get("js/app.js.map"),
        Some(&format!("js/{}-app.js.map", map_fp))
    );
}
