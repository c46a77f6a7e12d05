//! End-to-end republishing tests.
//!
//! Each test builds a small notebook export in a temp dir, runs the
//! republisher and inspects the output folder.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use nbpress::republish::{IMG_PREFIX, inline_filename};
use nbpress::{Error, Republisher, republish};
use tempfile::TempDir;

const ADDR: &str = "https://cdn.example.com";

/// Temp workspace with `src/` for input and `out/` for output.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(dir.path().join("src")).unwrap();
        Self { dir }
    }

    fn src(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn write_page(&self, name: &str, body: &str) -> PathBuf {
        let path = self.src().join(name);
        let html = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <script type=\"text/x-mathjax-config\">MathJax.Hub.Config({{}});</script>\n\
             </head>\n<body>\n{body}\n</body>\n</html>\n"
        );
        fs::write(&path, html).unwrap();
        path
    }

    fn write_asset(&self, rel: &str, data: &[u8]) {
        let path = self.src().join("assets").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }
}

fn list_dir(path: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_inline_image_scenario() {
    let ws = Workspace::new();
    let input = ws.write_page("page.html", r#"<img src="data:image/png;base64,QUJD">"#);

    republish(&input, ADDR, ws.out()).expect("republish failed");

    let filename = inline_filename("png", "QUJD");
    let html = fs::read_to_string(ws.out().join("page.html")).unwrap();
    assert!(html.contains(&format!(r#"<img src="{ADDR}/page/img/{filename}">"#)));

    let image = fs::read(ws.out().join("page/img").join(&filename)).unwrap();
    assert_eq!(image, b"ABC");
}

#[test]
fn test_asset_image_scenario() {
    let ws = Workspace::new();
    let pixels = b"\x89PNG\r\n\x1a\nfake image data";
    ws.write_asset("diagrams/fig1.png", pixels);
    let input = ws.write_page("page.html", r#"<img src="/assets/diagrams/fig1.png">"#);

    republish(&input, ADDR, ws.out()).expect("republish failed");

    let html = fs::read_to_string(ws.out().join("page.html")).unwrap();
    assert!(html.contains(&format!(r#"<img src="{ADDR}/page/img/diagrams/fig1.png">"#)));

    let copied = fs::read(ws.out().join("page/img/diagrams/fig1.png")).unwrap();
    assert_eq!(copied, pixels);
}

#[test]
fn test_unrecognized_source_passes_through() {
    let ws = Workspace::new();
    let input = ws.write_page("page.html", r#"<img src="https://example.com/pic.jpg">"#);

    let report = republish(&input, ADDR, ws.out()).unwrap();

    let html = fs::read_to_string(ws.out().join("page.html")).unwrap();
    assert!(html.contains(r#"<img src="https://example.com/pic.jpg">"#));
    assert!(list_dir(&ws.out().join("page/img")).is_empty());
    assert_eq!(report.copied_files().count(), 0);
}

#[test]
fn test_output_is_a_div_fragment() {
    let ws = Workspace::new();
    let input = ws.write_page("page.html", "<h1>Title</h1><p>Some $x^2$ math.</p>");

    republish(&input, ADDR, ws.out()).unwrap();

    let html = fs::read_to_string(ws.out().join("page.html")).unwrap();
    assert!(html.starts_with("<div>\n"));
    assert!(!html.contains("<body"));
    assert!(!html.contains("<head"));
    assert!(!html.contains("<meta"));
    assert!(html.contains(
        " <script type=\"text/x-mathjax-config\">\nMathJax.Hub.Config({});\n </script>\n"
    ));
    assert!(html.contains(" <h1>\n  Title\n </h1>\n"));
}

// ============================================================================
// Filesystem behaviour
// ============================================================================

#[test]
fn test_creates_directories_and_reports() {
    let ws = Workspace::new();
    let input = ws.write_page(
        "lecture.html",
        r#"<img src="data:image/png;base64,QUJD"><img src="assets/a.png">"#,
    );
    ws.write_asset("a.png", b"a");

    let report = republish(&input, ADDR, ws.out()).unwrap();

    let created: Vec<_> = report.created_dirs().map(Path::to_path_buf).collect();
    assert_eq!(created, vec![ws.out(), ws.out().join("lecture").join("img")]);
    assert_eq!(report.removed_files().count(), 0);

    let written: Vec<_> = report.written_files().map(Path::to_path_buf).collect();
    assert_eq!(
        written,
        vec![
            ws.out().join("lecture.html"),
            ws.out()
                .join("lecture")
                .join("img")
                .join(inline_filename("png", "QUJD")),
        ]
    );
    assert_eq!(report.copied_files().count(), 1);

    let messages: Vec<_> = report.actions.iter().map(|a| a.to_string()).collect();
    assert!(messages[0].starts_with("Creating directory: "));
    assert!(messages.last().unwrap().starts_with("Copying file: "));
}

#[test]
fn test_rerun_is_idempotent() {
    let ws = Workspace::new();
    let payload = STANDARD.encode(b"\x89PNG\r\n\x1a\nsome pixels");
    let input = ws.write_page(
        "page.html",
        &format!(r#"<p>Plot:</p><img src="data:image/png;base64,{payload}">"#),
    );

    republish(&input, ADDR, ws.out()).unwrap();
    let first_html = fs::read(ws.out().join("page.html")).unwrap();
    let first_files = list_dir(&ws.out().join("page/img"));

    let report = republish(&input, ADDR, ws.out()).unwrap();
    let second_html = fs::read(ws.out().join("page.html")).unwrap();
    let second_files = list_dir(&ws.out().join("page/img"));

    assert_eq!(first_html, second_html);
    assert_eq!(first_files, second_files);
    assert_eq!(report.created_dirs().count(), 0);
    // The previous image is purged and written again.
    assert_eq!(report.removed_files().count(), 1);

    let filename = inline_filename("png", &payload);
    let data = fs::read(ws.out().join("page/img").join(filename)).unwrap();
    assert_eq!(STANDARD.encode(data), payload);
}

#[test]
fn test_stale_inline_images_are_purged() {
    let ws = Workspace::new();
    let input = ws.write_page("page.html", r#"<img src="data:image/gif;base64,R0lGODlh">"#);

    let img_dir = ws.out().join("page").join("img");
    fs::create_dir_all(&img_dir).unwrap();
    let stale = format!("{IMG_PREFIX}ffffffffffffffff.png");
    fs::write(img_dir.join(&stale), b"old").unwrap();
    fs::write(img_dir.join("notes.txt"), b"keep me").unwrap();

    let report = republish(&input, ADDR, ws.out()).unwrap();

    assert_eq!(
        report.removed_files().collect::<Vec<_>>(),
        vec![img_dir.join(&stale).as_path()]
    );
    let files = list_dir(&img_dir);
    assert!(!files.contains(&stale));
    assert!(files.contains(&"notes.txt".to_string()));
    assert!(files.contains(&inline_filename("gif", "R0lGODlh")));
}

/// Asset copies are never purged: a removed asset survives in the output.
#[test]
fn test_stale_asset_copies_are_kept() {
    let ws = Workspace::new();
    ws.write_asset("old.png", b"old");
    let input = ws.write_page("page.html", r#"<img src="assets/old.png">"#);
    republish(&input, ADDR, ws.out()).unwrap();

    ws.write_asset("new.png", b"new");
    let input = ws.write_page("page.html", r#"<img src="assets/new.png">"#);
    republish(&input, ADDR, ws.out()).unwrap();

    let files = list_dir(&ws.out().join("page/img"));
    assert_eq!(files, vec!["new.png", "old.png"]);
}

#[test]
fn test_asset_copy_overwrites() {
    let ws = Workspace::new();
    ws.write_asset("fig.png", b"v1");
    let input = ws.write_page("page.html", r#"<img src="assets/fig.png">"#);
    republish(&input, ADDR, ws.out()).unwrap();

    ws.write_asset("fig.png", b"version two");
    republish(&input, ADDR, ws.out()).unwrap();

    assert_eq!(
        fs::read(ws.out().join("page/img/fig.png")).unwrap(),
        b"version two"
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_input() {
    let ws = Workspace::new();
    let err = republish(ws.src().join("nope.html"), ADDR, ws.out()).unwrap_err();
    assert!(matches!(err, Error::InputNotFound(_)));
    assert!(!ws.out().exists());
}

#[test]
fn test_missing_asset_fails_before_writing() {
    let ws = Workspace::new();
    let input = ws.write_page("page.html", r#"<img src="assets/missing.png">"#);

    let err = republish(&input, ADDR, ws.out()).unwrap_err();
    match err {
        Error::InputNotFound(path) => assert!(path.ends_with("assets/missing.png")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!ws.out().exists());
}

#[test]
fn test_absolute_asset_path_leaves_file_intact() {
    let ws = Workspace::new();
    let victim = ws.dir.path().join("victim.txt");
    fs::write(&victim, b"precious data").unwrap();
    let input = ws.write_page(
        "page.html",
        &format!(r#"<img src="assets/{}">"#, victim.display()),
    );

    let err = republish(&input, ADDR, ws.out()).unwrap_err();
    assert!(matches!(err, Error::UnsafeAssetPath(_)));
    assert_eq!(fs::read(&victim).unwrap(), b"precious data");
    assert!(!ws.out().exists());
}

#[test]
fn test_parent_dir_asset_path_is_rejected() {
    let ws = Workspace::new();
    fs::write(ws.dir.path().join("secret.png"), b"secret").unwrap();
    let input = ws.write_page("page.html", r#"<img src="assets/../../secret.png">"#);

    let err = republish(&input, ADDR, ws.out()).unwrap_err();
    assert!(matches!(err, Error::UnsafeAssetPath(path) if path == "../../secret.png"));
    assert!(!ws.out().exists());
}

#[test]
fn test_img_without_src_fails() {
    let ws = Workspace::new();
    let input = ws.write_page("page.html", r#"<img alt="no source">"#);

    let err = republish(&input, ADDR, ws.out()).unwrap_err();
    assert!(matches!(err, Error::MissingSource(0)));
}

#[test]
fn test_plan_does_not_touch_disk() {
    let ws = Workspace::new();
    let input = ws.write_page("page.html", r#"<img src="assets/fig.png">"#);

    let publication = Republisher::new(ADDR).plan(&input).unwrap();
    assert_eq!(publication.asset_images, vec!["fig.png"]);
    assert_eq!(publication.assets_dir(), ws.src().join("assets"));
    assert!(!ws.out().exists());
}
