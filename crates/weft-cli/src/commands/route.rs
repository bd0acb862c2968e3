//! `weft route`: which rule transforms each path.

use owo_colors::{OwoColorize, Stream};
use weft_pipeline::{ModuleRoute, RuleTable};

use crate::cli::RouteArgs;
use crate::commands::Project;
use crate::error::Result;
use crate::ui;

pub fn execute(project: &Project, args: RouteArgs) -> Result<()> {
    let descriptor = project.descriptor()?;
    let table = RuleTable::compile(&descriptor.rules, &project.root)?;

    let routes: Vec<ModuleRoute> = args
        .paths
        .into_iter()
        .map(|path| {
            let route = table.resolve(&path);
            ModuleRoute::new(path, &route)
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
        return Ok(());
    }

    let width = routes
        .iter()
        .map(|route| route.path.to_string_lossy().len())
        .max()
        .unwrap_or(0);

    for route in &routes {
        let path = ui::pad(&route.path.to_string_lossy(), width);
        match route.rule.and_then(|index| table.get(index)) {
            Some(rule) => println!(
                "{path}  -> rule {} ({}): {}",
                rule.index(),
                rule.label().if_supports_color(Stream::Stdout, |s| s.cyan()),
                route.transforms.join(" -> ")
            ),
            None => println!(
                "{path}  -> {}",
                "pass-through".if_supports_color(Stream::Stdout, |s| s.dimmed())
            ),
        }
    }
    Ok(())
}
