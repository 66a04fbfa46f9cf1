//! `prerender routes`: print the resolved catalog without rendering.

use crate::config::SiteConfig;
use crate::output::output_path;
use crate::page::{PageMetadata, Route};
use crate::pipeline::Plan;
use crate::utils::path::display_relative;
use crate::utils::plural_count;
use crate::log;
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::{Value, json};

pub fn list_routes(config: &SiteConfig, as_json: bool) -> Result<()> {
    let plan = Plan::new(config);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&routes_json(config, &plan))?);
        return Ok(());
    }

    plan.report_warnings();
    for (route, meta) in plan.iter() {
        print_route(config, route, meta);
    }
    log!("routes"; "{}", plural_count(plan.catalog.len(), "route"));
    Ok(())
}

fn print_route(config: &SiteConfig, route: &Route, meta: &PageMetadata) {
    let flag = if meta.robots.is_indexable() {
        String::new()
    } else {
        format!(" {}", meta.robots.content().dimmed())
    };
    println!(
        "{} {:<8} {:.1}  {}{}",
        format!("{:<32}", route.path.as_str()).cyan(),
        route.kind.as_str(),
        route.priority.value(),
        meta.title,
        flag
    );
    crate::debug!("routes"; "  -> {}", display_relative(&output_path(config.output_dir(), &route.path), config.get_root()));
}

fn routes_json(config: &SiteConfig, plan: &Plan) -> Value {
    let routes: Vec<Value> = plan
        .iter()
        .map(|(route, meta)| {
            json!({
                "path": route.path.as_str(),
                "kind": route.kind.as_str(),
                "title": meta.title,
                "description": meta.description,
                "canonical": meta.canonical_url,
                "robots": meta.robots.content(),
                "priority": route.priority.value(),
                "changefreq": route.changefreq.as_str(),
                "lastmod": route.last_modified.map(|d| d.to_iso_date()),
                "output": display_relative(&output_path(config.output_dir(), &route.path), config.get_root()),
            })
        })
        .collect();
    let warnings: Vec<String> = plan.catalog.warnings.iter().map(ToString::to_string).collect();

    json!({ "routes": routes, "warnings": warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use tempfile::TempDir;

    #[test]
    fn test_routes_json() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(
            dir.path(),
            r#"
[content]
source = "missing.json"

[[routes]]
path = "/"

[[routes]]
path = "/contact/"
title = "Contact"
noindex = true
"#,
        );
        let value = routes_json(&config, &Plan::new(&config));

        let routes = value["routes"].as_array().unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0]["path"], "/");
        assert_eq!(routes[0]["output"], "dist/index.html");
        assert_eq!(routes[1]["path"], "/contact");
        assert_eq!(routes[1]["robots"], "noindex, nofollow");
        assert_eq!(routes[1]["canonical"], "https://mardenseo.com/contact");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
    }
}
