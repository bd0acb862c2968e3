//! `weft plan`: resolve a build plan against a module graph.

use std::fs;

use owo_colors::{OwoColorize, Stream};
use weft_pipeline::{BuildPlan, FileKind, ModuleGraph};

use crate::cli::PlanArgs;
use crate::commands::Project;
use crate::error::{CliError, Result};
use crate::ui;

pub fn execute(project: &Project, args: PlanArgs) -> Result<()> {
    let descriptor = project.descriptor()?;

    let graph_path = project.root.join(&args.graph);
    if !graph_path.is_file() {
        return Err(CliError::FileNotFound(graph_path));
    }
    let graph = ModuleGraph::load(&graph_path)?;

    let mut plan = BuildPlan::resolve(&descriptor, &project.root, &graph)?;
    if !args.no_copy {
        plan = plan.with_static_copies(&descriptor, &project.root)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else if args.html {
        render_html(project, &plan)?;
    } else {
        print_summary(&plan);
    }
    Ok(())
}

fn render_html(project: &Project, plan: &BuildPlan) -> Result<()> {
    let Some(page) = &plan.html else {
        ui::warning("No html page configured");
        return Ok(());
    };

    let template = match &page.template {
        Some(path) => {
            let path = project.root.join(path);
            if !path.is_file() {
                return Err(CliError::FileNotFound(path));
            }
            Some(fs::read_to_string(&path)?)
        }
        None => None,
    };
    println!("{}", page.render(template.as_deref()));
    Ok(())
}

fn kind_label(kind: FileKind) -> &'static str {
    match kind {
        FileKind::EntryBundle => "entry",
        FileKind::Chunk => "chunk",
        FileKind::SharedChunk => "shared",
        FileKind::Stylesheet => "css",
        FileKind::Asset => "asset",
        FileKind::Html => "html",
        FileKind::Favicon => "favicon",
        FileKind::Static => "static",
    }
}

fn print_summary(plan: &BuildPlan) {
    println!(
        "{} {} ({} modules, {} chunks)",
        "Build plan".if_supports_color(Stream::Stdout, |s| s.bold()),
        plan.mode,
        plan.routes.len(),
        plan.chunks.len()
    );

    let width = plan
        .files
        .iter()
        .map(|file| file.location.write_path.to_string_lossy().len())
        .max()
        .unwrap_or(0);

    println!();
    for file in &plan.files {
        let path = ui::pad(&file.location.write_path.to_string_lossy(), width);
        let size = match file.kind {
            FileKind::Html | FileKind::Favicon => String::new(),
            _ => ui::format_size(file.size),
        };
        println!(
            "  {}  {path}  {:>10}  {}",
            ui::pad(kind_label(file.kind), 7),
            size,
            file.location
                .public_url
                .if_supports_color(Stream::Stdout, |s| s.dimmed())
        );
    }

    if !plan.split.groups.is_empty() {
        println!();
        for group in &plan.split.groups {
            println!(
                "  split {} <- {} ({} modules, {})",
                group.name.if_supports_color(Stream::Stdout, |s| s.cyan()),
                group.source_chunks.join(", "),
                group.modules.len(),
                ui::format_size(group.size)
            );
        }
    }

    if let Some(page) = &plan.html {
        println!();
        println!("  page scripts: {}", page.scripts.join(", "));
        if !page.stylesheets.is_empty() {
            println!("  page styles:  {}", page.stylesheets.join(", "));
        }
    }

    for advisory in &plan.advisories {
        ui::warning(&advisory.to_string());
    }
}
