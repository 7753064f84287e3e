//! Output formatting for analysis results.
//!
//! Two formats are supported:
//! - JSON: structured output matching the data contract of the upstream
//!   aggregation tooling (camelCase field names, one document per analysis)
//! - Pretty: colored terminal output for human readability

use std::fs;
use std::path::Path;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analyze::{ComponentGraph, ConsumeDescription, OfferDescription};

/// File names used when writing reports into a directory.
pub const COMPONENTS_FILE: &str = "componentInformation";
pub const API_FILE: &str = "apiInformation";
pub const CONSUMPTION_FILE: &str = "apiConsumption";

/// One component and the components it depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    pub name: String,
    pub depends_on: Vec<String>,
}

/// Component dependency report for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    pub module_name: String,
    pub components: Vec<ComponentEntry>,
}

/// Offered API report for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    pub microservice_name: String,
    pub api: Vec<OfferDescription>,
}

/// API consumption report for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionReport {
    pub microservice_name: String,
    pub consumes: Vec<ConsumeDescription>,
}

/// All three reports of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub components: ComponentReport,
    pub api: ApiReport,
    pub consumption: ConsumptionReport,
}

/// Assemble the full report from analyzer results.
pub fn build(
    service: &str,
    graph: &ComponentGraph,
    offers: Vec<OfferDescription>,
    consumes: Vec<ConsumeDescription>,
) -> AnalysisReport {
    let components = graph
        .iter()
        .map(|(name, depends_on)| ComponentEntry {
            name: name.clone(),
            depends_on: depends_on.iter().cloned().collect(),
        })
        .collect();

    AnalysisReport {
        components: ComponentReport {
            module_name: service.to_string(),
            components,
        },
        api: ApiReport {
            microservice_name: service.to_string(),
            api: offers,
        },
        consumption: ConsumptionReport {
            microservice_name: service.to_string(),
            consumes,
        },
    }
}

/// Print the combined report as one JSON document to stdout.
pub fn write_json(report: &AnalysisReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

/// Write the three reports as separate JSON files into a directory,
/// mirroring the layout the upstream aggregation tooling consumes.
pub fn write_json_files(dir: &Path, report: &AnalysisReport) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;
    for (file_name, json) in [
        (
            COMPONENTS_FILE,
            serde_json::to_string_pretty(&report.components)?,
        ),
        (API_FILE, serde_json::to_string_pretty(&report.api)?),
        (
            CONSUMPTION_FILE,
            serde_json::to_string_pretty(&report.consumption)?,
        ),
    ] {
        let path = dir.join(format!("{}.json", file_name));
        fs::write(&path, json)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// Write a human-readable summary.
pub fn write_pretty(path: &str, report: &AnalysisReport) {
    println!();
    print!("  ");
    print!("{}", "archmap".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Source:  ".dimmed());
    println!("{}", path);
    print!("  {}", "Service: ".dimmed());
    println!("{}", report.components.module_name);
    println!();

    write_components(&report.components);
    write_api(&report.api);
    write_consumption(&report.consumption);
}

fn write_components(report: &ComponentReport) {
    println!("  {} ({}):", "Components".bold(), report.components.len());
    for component in &report.components {
        print!("    {}", component.name.blue());
        if component.depends_on.is_empty() {
            println!();
        } else {
            println!(" {} {}", "->".dimmed(), component.depends_on.join(", "));
        }
    }
    println!();
}

fn write_api(report: &ApiReport) {
    let endpoint_count: usize = report
        .api
        .iter()
        .map(|offer| offer.path_to_method_mappings.len())
        .sum();
    println!("  {} ({} paths):", "Offered API".bold(), endpoint_count);
    for offer in &report.api {
        println!("    {}", offer.package_name.blue());
        for (path, methods) in &offer.path_to_method_mappings {
            let methods: Vec<&str> = methods.iter().map(|m| m.as_str()).collect();
            println!("      {:<40} {}", path, methods.join(", ").dimmed());
        }
    }
    println!();
}

fn write_consumption(report: &ConsumptionReport) {
    println!(
        "  {} ({} services):",
        "Consumed API".bold(),
        report.consumes.len()
    );
    for consume in &report.consumes {
        println!(
            "    {} {}",
            consume.service_name.blue(),
            format!("(from {})", consume.package_name).dimmed()
        );
        for (path, methods) in &consume.path_to_methods {
            let methods: Vec<&str> = methods.iter().map(String::as_str).collect();
            println!("      {:<40} {}", path, methods.join(", ").dimmed());
        }
    }
    println!();
}
