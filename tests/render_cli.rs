use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const POSTS: &str = "\
title,path,topics,excerpt,draft
Attention notes,posts/Attention Notes.html,ml | nlp,Transformers from scratch,no
Edge detection,posts/edges.html,cv,Sobel and friends,no
Tokenizers,https://example.com/tok,nlp|,<script>alert(1)</script>,yes
Gradient tricks,posts/grad.html,ml,,no
Rust for ML,posts/rust ml.html,ml|rust,Ownership meets tensors,no
";

fn site() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(dir.path().join("data/blog_posts.csv"), POSTS).unwrap();
    fs::write(
        dir.path().join("config.yaml"),
        format!(
            "source:\n  site_root: {}\ndisplay:\n  cap: 2\n  primary_topics: 2\n  excerpt_placeholder: More soon\n",
            dir.path().display()
        ),
    )
    .unwrap();
    dir
}

fn blog_cards(site: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blog-cards").unwrap();
    cmd.arg("--config")
        .arg(site.join("config.yaml"))
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn renders_default_source_truncated() {
    let site = site();
    blog_cards(site.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("posts/Attention%20Notes.html"))
        .stdout(predicate::str::contains("Click here to see all 5 blog posts"))
        .stdout(predicate::str::contains("data-action=\"expand\""))
        .stdout(predicate::str::contains("Gradient tricks").not());
}

#[test]
fn topic_and_expand_flags() {
    let site = site();
    blog_cards(site.path())
        .args(["--topic", "ml", "--expand"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gradient tricks"))
        .stdout(predicate::str::contains("Rust for ML"))
        .stdout(predicate::str::contains("More soon"))
        .stdout(predicate::str::contains("Tokenizers").not())
        .stdout(predicate::str::contains("data-action=\"expand\"").not());
}

#[test]
fn overflow_selection_highlights_menu() {
    let site = site();
    blog_cards(site.path())
        .args(["--topic", "cv", "--overflow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dropdown-toggle active"))
        .stdout(predicate::str::contains(
            "class=\"dropdown-item active\" href=\"#\" data-topic=\"cv\"",
        ))
        .stdout(predicate::str::contains("Edge detection"));
}

#[test]
fn escapes_source_text() {
    let site = site();
    blog_cards(site.path())
        .args(["--topic", "nlp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("&lt;script&gt;alert(1)&lt;/script&gt;"))
        .stdout(predicate::str::contains("<script>").not());
}

#[test]
fn missing_source_renders_placeholder() {
    let site = site();
    let output = site.path().join("out.html");
    blog_cards(site.path())
        .args(["--source", "data/absent.csv", "--output"])
        .arg(&output)
        .assert()
        .success();
    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("No posts found for this topic."));
    assert!(html.contains("data-csv-path=\"data/absent.csv\""));
}
