//! List command

use std::path::PathBuf;

use clap::Args;
use ptcheck_core::{OsmPrimitive, PrimitiveId};
use serde::Serialize;

use super::load_source;
use crate::output::{to_json, OutputFormat, Table};
use crate::AppContext;

#[derive(Args)]
pub struct ListArgs {
    /// OSM JSON file (API 0.6 or Overpass output)
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct RouteSummary {
    id: PrimitiveId,
    route: Option<String>,
    name: Option<String>,
    members: usize,
}

pub async fn run(args: &ListArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let source = load_source(&args.file).await?;
    let routes: Vec<RouteSummary> = source
        .route_relations()?
        .iter()
        .map(|r| RouteSummary {
            id: r.id(),
            route: r.get("route").map(str::to_string),
            name: r.get("name").map(str::to_string),
            members: r.members().len(),
        })
        .collect();

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(&routes)?),
        OutputFormat::Table => {
            if routes.is_empty() {
                println!("No route relations found in {}", args.file.display());
                return Ok(());
            }
            let mut table = Table::new(["ID", "ROUTE", "NAME", "MEMBERS"]);
            for route in &routes {
                table.push([
                    route.id.to_string(),
                    route.route.clone().unwrap_or_default(),
                    route.name.clone().unwrap_or_default(),
                    route.members.to_string(),
                ]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
