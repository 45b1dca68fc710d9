//! Command implementations.
//! Each function backs one CLI subcommand and ties the configuration, the
//! resolver and the processors together.

use std::path::PathBuf;

use log::{debug, error, info};

use crate::archive::{archive_path, zip_directory};
use crate::cli::{BuildArgs, ScaffoldArgs, ThemeArgs, WatchArgs};
use crate::constants::{
    BROWSERSYNC_CONFIG, DEFAULT_DEV_PROXY, DEFAULT_PROJECT_VERSION, DEFAULT_SITE_CONFIG,
    PACKAGE_MANIFEST,
};
use crate::error::Result;
use crate::manifest::read_package_manifest;
use crate::processor::{apply_operation, BuildReport, FileOperation, Processor};
use crate::prompt::Prompter;
use crate::renderer::{TemplateRenderer, TokenRenderer};
use crate::resolver::{resolve, BuildPlan, PathSettings};
use crate::scaffold::{default_file, render_default_file, ScaffoldOptions, ScaffoldReport, Scaffolder};
use crate::site::{load_site_config, EnvironmentType, SiteConfig};
use crate::watch::watch as watch_sources;

/// Site configuration location for a theme project.
pub fn site_config_path(theme: &ThemeArgs) -> PathBuf {
    theme
        .site_config
        .clone()
        .unwrap_or_else(|| theme.theme_path.join(DEFAULT_SITE_CONFIG))
}

pub fn path_settings(theme: &ThemeArgs) -> PathSettings {
    PathSettings {
        wordpress_path: theme.wordpress_path.clone(),
        theme_slug: theme.theme_slug.clone(),
    }
}

/// Loads the site configuration and resolves the requested environment.
pub fn resolve_plan(args: &BuildArgs) -> Result<BuildPlan> {
    let site = load_site_config(site_config_path(&args.theme))?;
    resolve(args.environment.as_deref(), &site.environments, &path_settings(&args.theme))
}

/// Builds with the version currently declared in the package manifest,
/// then zips `dist` when `--zip` is set.
fn build_with_plan(
    renderer: &dyn TemplateRenderer,
    args: &BuildArgs,
    plan: &BuildPlan,
) -> Result<BuildReport> {
    let theme_root = &args.theme.theme_path;
    let manifest = read_package_manifest(theme_root.join(PACKAGE_MANIFEST))?;
    let version = manifest.version()?;
    let processor = Processor::new(renderer, theme_root);
    let mut report = processor.build(plan, version)?;

    if args.zip {
        let target = archive_path(theme_root, &args.theme.theme_slug);
        let entries = zip_directory(&processor.dist_root(plan), &target)?;
        info!("Packed {} files into {}", entries.len(), target.display());
        report.archive = Some(target);
    }
    Ok(report)
}

/// `build`: resolve, build into `dist`, mirror into WordPress.
pub fn build(args: &BuildArgs) -> Result<BuildReport> {
    let plan = resolve_plan(args)?;
    println!("Environment: {}", plan.environment);
    println!("Mode: {}", plan.mode);

    let renderer = TokenRenderer::new();
    let report = build_with_plan(&renderer, args, &plan)?;
    println!(
        "Theme '{}' {} built: {} files in '{}', mirrored to '{}'.",
        args.theme.theme_slug,
        report.version,
        report.written.len(),
        plan.dist_path,
        plan.wordpress_dist_path
    );
    if let Some(archive) = &report.archive {
        println!("Archive: '{}'", archive.display());
    }
    Ok(report)
}

/// `plan`: the resolved build plan as pretty JSON.
pub fn plan(args: &BuildArgs) -> Result<String> {
    let plan = resolve_plan(args)?;
    Ok(serde_json::to_string_pretty(&plan)?)
}

/// `watch`: optional Browsersync configuration, initial build, then rebuild
/// on every source change. Build failures do not end the session.
pub fn watch(args: &WatchArgs) -> Result<()> {
    let plan = resolve_plan(&args.build)?;
    println!("Environment: {}", plan.environment);
    println!("Mode: {}", plan.mode);

    let theme = &args.build.theme;
    let renderer = TokenRenderer::new();

    if let Some(proxy) = &args.dev_proxy {
        let target = write_browsersync_config(&renderer, theme, &plan, proxy.as_str())?;
        println!("Browsersync configuration written to '{}'.", target.display());
    }

    let rebuild = || -> Result<()> {
        let report = build_with_plan(&renderer, &args.build, &plan)?;
        println!("Rebuilt {} files.", report.written.len());
        Ok(())
    };

    if let Err(e) = build_with_plan(&renderer, &args.build, &plan) {
        error!("{}", e);
    }
    watch_sources(&theme.theme_path, rebuild)
}

/// Writes `browsersync.config.js` proxying `proxy` and watching the mirror.
pub fn write_browsersync_config(
    renderer: &dyn TemplateRenderer,
    theme: &ThemeArgs,
    plan: &BuildPlan,
    proxy: &str,
) -> Result<PathBuf> {
    let options = ScaffoldOptions {
        theme_slug: theme.theme_slug.clone(),
        project_name: theme.theme_slug.clone(),
        project_version: DEFAULT_PROJECT_VERSION.to_string(),
        dev_proxy: proxy.to_string(),
        wordpress_theme_path: plan.wordpress_dist_path.clone(),
        src_theme: None,
    };
    let content = render_default_file(renderer, default_file(BROWSERSYNC_CONFIG)?, &options)?;
    apply_operation(&FileOperation::Write {
        target: theme.theme_path.join(BROWSERSYNC_CONFIG),
        content,
    })
}

/// Scaffold values from the CLI, falling back to the site configuration when
/// one exists and to fixed defaults otherwise.
pub fn scaffold_options(args: &ScaffoldArgs, site: Option<&SiteConfig>) -> ScaffoldOptions {
    let theme = &args.theme;
    let settings = path_settings(theme);

    let dev_proxy = args
        .dev_proxy
        .as_ref()
        .map(|url| url.to_string())
        .or_else(|| {
            site.and_then(|s| s.environment_by_type(EnvironmentType::Development).ok())
                .and_then(|e| e.base_url.clone())
        })
        .unwrap_or_else(|| DEFAULT_DEV_PROXY.to_string());

    let wordpress_theme_path = site
        .and_then(|s| resolve(None, &s.environments, &settings).ok())
        .map(|plan| plan.wordpress_dist_path)
        .unwrap_or_else(|| {
            format!(
                "{}/wp-content/themes/{}",
                settings.wordpress_path.trim_end_matches('/'),
                settings.theme_slug
            )
        });

    ScaffoldOptions {
        theme_slug: theme.theme_slug.clone(),
        project_name: site
            .and_then(|s| s.project_name())
            .unwrap_or(&theme.theme_slug)
            .to_string(),
        project_version: site
            .and_then(|s| s.project_version())
            .unwrap_or(DEFAULT_PROJECT_VERSION)
            .to_string(),
        dev_proxy,
        wordpress_theme_path,
        src_theme: site.and_then(|s| s.src_theme()).cloned(),
    }
}

/// `scaffold`: write the default theme files.
pub fn scaffold(args: &ScaffoldArgs, prompt: &dyn Prompter) -> Result<ScaffoldReport> {
    let site_path = site_config_path(&args.theme);
    let site = if site_path.is_file() {
        Some(load_site_config(&site_path)?)
    } else {
        debug!("No site configuration at {}", site_path.display());
        None
    };

    let options = scaffold_options(args, site.as_ref());
    info!("Scaffolding theme '{}' in {}", options.theme_slug, args.theme.theme_path.display());

    let renderer = TokenRenderer::new();
    let scaffolder = Scaffolder::new(
        &renderer,
        prompt,
        &args.theme.theme_path,
        args.skip_overwrite_check,
    );
    let report = scaffolder.scaffold(&options)?;

    for path in &report.written {
        println!("Created: '{}'", path.display());
    }
    for path in &report.skipped {
        println!("Skipped: '{}'", path.display());
    }
    Ok(report)
}
