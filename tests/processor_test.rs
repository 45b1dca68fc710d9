use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wp_theme_kit::error::Error;
use wp_theme_kit::patterns::DEFAULT_COPY_PATTERNS;
use wp_theme_kit::processor::{mirror_operations, FileOperation, Processor};
use wp_theme_kit::renderer::TokenRenderer;
use wp_theme_kit::resolver::{resolve, BuildPlan, PathSettings};
use wp_theme_kit::site::parse_site_config;

const STYLESHEET: &str = "/*\nTheme Name: Demo\nVersion: {{version}}\n*/\n.demo::before { content: \"v{{version}} {{other}} {version}\"; }\n";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A theme project three levels below the site root, like in a WordPress
/// project repository.
fn theme_fixture() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("site").join("content").join("themes-src").join("demo");
    write(&root, "package.json", r#"{"name": "demo", "version": "2.3.4"}"#);
    write(&root, "src/style.css", STYLESHEET);
    write(&root, "src/assets/js/main.js", "console.log('demo');\n");
    write(&root, "src/composer.json", "{}\n");
    write(&root, "src/functions.php", "<?php\n");
    write(&root, "src/functions_php/functions-core.php", "<?php\n// core\n");
    (temp_dir, root)
}

fn localhost_plan() -> BuildPlan {
    let site = parse_site_config(
        r#"{"environments": [{"name": "localhost", "wp_config": {"content_url": {"value": "/wp-content"}}}]}"#,
    )
    .unwrap();
    resolve(None, &site.environments, &PathSettings::default()).unwrap()
}

#[test]
fn test_stylesheet_version_substitution() {
    let (_temp_dir, root) = theme_fixture();
    let renderer = TokenRenderer::new();
    let processor = Processor::new(&renderer, &root);

    let operations = processor.plan_operations(&localhost_plan(), "2.3.4").unwrap();
    let content = operations
        .iter()
        .find_map(|op| match op {
            FileOperation::Write { target, content } if target.ends_with("style.css") => {
                Some(content.clone())
            }
            _ => None,
        })
        .expect("stylesheet operation");

    assert_eq!(content, STYLESHEET.replace("{{version}}", "2.3.4"));
    assert!(content.contains("{{other}}"));
    assert!(content.contains(" {version}"));
}

#[test]
fn test_planned_targets() {
    let (_temp_dir, root) = theme_fixture();
    let renderer = TokenRenderer::new();
    let processor = Processor::new(&renderer, &root);
    let plan = localhost_plan();

    let dist = root.join("dist");
    let targets: Vec<PathBuf> = processor
        .plan_operations(&plan, "2.3.4")
        .unwrap()
        .iter()
        .map(|op| op.target().to_path_buf())
        .collect();

    assert_eq!(
        targets,
        vec![
            dist.join("style.css"),
            dist.join("assets/js/main.js"),
            dist.join("composer.json"),
            dist.join("functions.php"),
            dist.join("functions_php/functions-core.php"),
        ]
    );
}

#[test_log::test]
fn test_build_mirrors_dist_into_wordpress() {
    let (temp_dir, root) = theme_fixture();
    let renderer = TokenRenderer::new();
    let processor = Processor::new(&renderer, &root);
    let plan = localhost_plan();

    let report = processor.build(&plan, "2.3.4").unwrap();
    assert_eq!(report.version, "2.3.4");
    assert_eq!(report.written.len(), 5);
    assert_eq!(report.mirrored.len(), 5);

    let dist = root.join("dist");
    assert!(dist.join("assets/js/main.js").is_file());
    assert!(fs::read_to_string(dist.join("style.css")).unwrap().contains("Version: 2.3.4"));

    let wordpress_theme = temp_dir
        .path()
        .join("site")
        .join("wordpress")
        .join("wp-content")
        .join("themes")
        .join("aheadlabs");
    assert!(wordpress_theme.join("style.css").is_file());
    assert!(!dir_diff::is_different(&dist, &wordpress_theme).unwrap());
}

#[test]
fn test_build_cleans_dist() {
    let (_temp_dir, root) = theme_fixture();
    write(&root, "dist/stale.js", "old");
    let renderer = TokenRenderer::new();

    Processor::new(&renderer, &root).build(&localhost_plan(), "2.3.4").unwrap();
    assert!(!root.join("dist/stale.js").exists());
}

#[test]
fn test_optional_assets_may_be_missing() {
    let (_temp_dir, root) = theme_fixture();
    let dist = root.join("dist");

    for pattern in DEFAULT_COPY_PATTERNS.iter().filter(|p| p.optional) {
        assert_eq!(pattern.evaluate(&root, &dist).unwrap(), Vec::new());
    }

    let renderer = TokenRenderer::new();
    Processor::new(&renderer, &root).build(&localhost_plan(), "2.3.4").unwrap();
    assert!(!dist.join("assets/images").exists());
    assert!(!dist.join("assets/fonts").exists());
}

#[test]
fn test_images_fonts_and_screenshot_are_copied() {
    let (_temp_dir, root) = theme_fixture();
    write(&root, "screenshot.png", "png");
    write(&root, "src/assets/images/logo.png", "png");
    write(&root, "src/assets/images/icons/menu.svg", "<svg/>");
    write(&root, "src/assets/images/notes.txt", "not an image");
    write(&root, "src/assets/fonts/body.woff2", "font");

    let renderer = TokenRenderer::new();
    Processor::new(&renderer, &root).build(&localhost_plan(), "2.3.4").unwrap();

    let dist = root.join("dist");
    assert!(dist.join("screenshot.png").is_file());
    assert!(dist.join("assets/images/logo.png").is_file());
    assert!(dist.join("assets/images/icons/menu.svg").is_file());
    assert!(!dist.join("assets/images/notes.txt").exists());
    assert!(dist.join("assets/fonts/body.woff2").is_file());
}

#[test]
fn test_required_pattern_missing() {
    let (_temp_dir, root) = theme_fixture();
    fs::remove_file(root.join("src/composer.json")).unwrap();
    let renderer = TokenRenderer::new();

    let err = Processor::new(&renderer, &root)
        .build(&localhost_plan(), "2.3.4")
        .unwrap_err();
    match err {
        Error::MissingAssetError { pattern } => assert_eq!(pattern, "src/composer.json"),
        other => panic!("Expected MissingAssetError, got {:?}", other),
    }
    assert!(!root.join("dist").exists());
}

#[test]
fn test_missing_stylesheet() {
    let (_temp_dir, root) = theme_fixture();
    write(&root, "dist/keep.txt", "kept");
    fs::remove_file(root.join("src/style.css")).unwrap();
    let renderer = TokenRenderer::new();

    let err = Processor::new(&renderer, &root)
        .build(&localhost_plan(), "2.3.4")
        .unwrap_err();
    assert!(matches!(err, Error::MissingAssetError { ref pattern } if pattern == "src/style.css"));
    // A failed plan leaves the previous output alone
    assert!(root.join("dist/keep.txt").exists());
}

#[test]
fn test_mirror_operations() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("dist");
    write(&source, "a.txt", "a");
    write(&source, "nested/b.txt", "b");
    let destination = temp_dir.path().join("mirror");

    let operations = mirror_operations(&source, &destination).unwrap();
    assert_eq!(
        operations,
        vec![
            FileOperation::Copy { source: source.join("a.txt"), target: destination.join("a.txt") },
            FileOperation::Copy {
                source: source.join("nested").join("b.txt"),
                target: destination.join("nested").join("b.txt"),
            },
        ]
    );
}
