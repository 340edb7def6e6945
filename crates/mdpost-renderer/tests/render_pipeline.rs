//! End-to-end tests for the rendering pipeline against a real
//! on-disk post layout.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use mdpost_renderer::{MediaStrategy, PostRenderer, RemoteBase, substitute};

/// Build a project tree with a post and two images:
///
/// ```text
/// root/
///   posts/
///     hello.md
///     images/shot.png
///   attachments/clip.png
/// ```
fn project() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("posts/images")).unwrap();
    fs::create_dir_all(tmp.path().join("attachments")).unwrap();
    fs::write(tmp.path().join("posts/images/shot.png"), b"png").unwrap();
    fs::write(tmp.path().join("attachments/clip.png"), b"png").unwrap();
    tmp
}

const POST: &str = "\
# My Post

Intro with **bold** text.

![[shot.png]]

- one
- two

![[clip.png|400]]

![remote](https://example.com/r.png)

![[gone.png]]

Done.
";

#[test]
fn upload_placeholder_end_to_end() {
    let tmp = project();
    fs::write(tmp.path().join("posts/hello.md"), POST).unwrap();

    let renderer = PostRenderer::new(tmp.path())
        .with_attachment_dir(tmp.path().join("attachments"))
        .with_strategy(MediaStrategy::UploadPlaceholder);
    let result = renderer
        .render_file(&tmp.path().join("posts/hello.md"))
        .unwrap();

    assert_eq!(result.title, "My Post");
    assert_eq!(
        result.html,
        "<h1>My Post</h1>\n\
         <p>Intro with <strong>bold</strong> text.</p>\n\
         ASSET_PLACEHOLDER_0\n\
         <ul>\n<li>one</li>\n<li>two</li>\n</ul>\n\
         ASSET_PLACEHOLDER_1\n\
         <p><img src=\"https://example.com/r.png\" alt=\"remote\"></p>\n\
         <p>Done.</p>"
    );

    // shot.png found next to the post's images/ dir, clip.png via the
    // attachment dir; gone.png is a diagnostic, not a job.
    assert_eq!(result.jobs.len(), 2);
    assert_eq!(result.jobs[0].token, "ASSET_PLACEHOLDER_0");
    assert_eq!(result.jobs[0].display_name, "shot.png");
    assert!(result.jobs[0].path.is_absolute());
    assert_eq!(result.jobs[1].token, "ASSET_PLACEHOLDER_1");
    assert_eq!(result.jobs[1].display_name, "clip.png");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].reference, "gone.png");

    // The publish adapter substitutes uploaded fragments by token.
    let resolved = HashMap::from([
        ("ASSET_PLACEHOLDER_0".to_owned(), "<img src=\"u0\">".to_owned()),
        ("ASSET_PLACEHOLDER_1".to_owned(), "<img src=\"u1\">".to_owned()),
    ]);
    let final_html = substitute(&result.html, &resolved);
    assert!(final_html.contains("<img src=\"u0\">"));
    assert!(final_html.contains("<img src=\"u1\">"));
    assert!(!final_html.contains("ASSET_PLACEHOLDER"));
}

#[test]
fn repeated_image_gets_fresh_token_per_occurrence() {
    let tmp = project();
    let post = "![[shot.png]]\n![[clip.png]]\n![[shot.png]]\n";
    fs::write(tmp.path().join("posts/rep.md"), post).unwrap();

    let renderer = PostRenderer::new(tmp.path())
        .with_attachment_dir(tmp.path().join("attachments"));
    let result = renderer
        .render_file(&tmp.path().join("posts/rep.md"))
        .unwrap();

    let names: Vec<&str> = result
        .jobs
        .iter()
        .map(|j| j.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["shot.png", "clip.png", "shot.png"]);
    let tokens: Vec<&str> = result.jobs.iter().map(|j| j.token.as_str()).collect();
    assert_eq!(
        tokens,
        vec![
            "ASSET_PLACEHOLDER_0",
            "ASSET_PLACEHOLDER_1",
            "ASSET_PLACEHOLDER_2"
        ]
    );
}

#[test]
fn remote_rewrite_builds_project_relative_urls() {
    let tmp = project();
    fs::write(
        tmp.path().join("posts/rw.md"),
        "![shot](images/shot.png)\n",
    )
    .unwrap();

    let renderer = PostRenderer::new(tmp.path()).with_strategy(MediaStrategy::RemoteRewrite(
        RemoteBase {
            host: "https://raw.githubusercontent.com".to_owned(),
            user: "u".to_owned(),
            repo: "r".to_owned(),
            branch: "main".to_owned(),
        },
    ));
    let result = renderer
        .render_file(&tmp.path().join("posts/rw.md"))
        .unwrap();

    assert_eq!(
        result.html,
        "<p><img src=\"https://raw.githubusercontent.com/u/r/main/posts/images/shot.png\" alt=\"shot\"></p>"
    );
    assert!(result.jobs.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn drop_strategy_produces_text_only_post() {
    let tmp = project();
    fs::write(
        tmp.path().join("posts/text.md"),
        "# T\n\n![[shot.png]]\n\nbody\n",
    )
    .unwrap();

    let renderer = PostRenderer::new(tmp.path()).with_strategy(MediaStrategy::Drop);
    let result = renderer
        .render_file(&tmp.path().join("posts/text.md"))
        .unwrap();

    assert_eq!(result.html, "<h1>T</h1>\n<p>body</p>");
    assert!(result.jobs.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn title_falls_back_to_filename_stem() {
    let tmp = project();
    fs::write(tmp.path().join("posts/note.md"), "plain body\n").unwrap();

    let renderer = PostRenderer::new(tmp.path()).with_strategy(MediaStrategy::Drop);
    let result = renderer
        .render_file(&tmp.path().join("posts/note.md"))
        .unwrap();
    assert_eq!(result.title, "note");
}

#[test]
fn markdown_image_resolves_relative_to_document() {
    let tmp = project();
    fs::write(tmp.path().join("posts/rel.md"), "![s](images/shot.png)\n").unwrap();

    let renderer = PostRenderer::new(tmp.path());
    let result = renderer
        .render_file(&tmp.path().join("posts/rel.md"))
        .unwrap();
    assert_eq!(result.html, "ASSET_PLACEHOLDER_0");
    assert_eq!(result.jobs.len(), 1);
    assert!(
        result.jobs[0]
            .path
            .ends_with(Path::new("posts/images/shot.png"))
    );
}
