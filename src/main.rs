// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

use clap::Parser;
use sdf_matter_converter::{io, map_matter_to_sdf, map_sdf_to_matter, validate};
use std::path::PathBuf;

/// Bidirectional translator between OneDM SDF and Matter cluster/device-type definitions.
#[derive(Parser)]
#[command(name = "sdf-matter-converter")]
#[command(about = "Translate between OneDM SDF device descriptions and Matter cluster/device-type XML")]
#[command(version)]
struct Cli {
    /// Convert Matter XML to SDF.
    #[arg(long, conflicts_with = "sdf_to_matter")]
    matter_to_sdf: bool,

    /// Convert SDF to Matter XML.
    #[arg(long, conflicts_with = "matter_to_sdf")]
    sdf_to_matter: bool,

    /// SDF model JSON file (sdf-to-matter input).
    #[arg(long, value_name = "FILE")]
    sdf_model: Option<PathBuf>,

    /// SDF mapping ("side-car") JSON file (sdf-to-matter input).
    #[arg(long, value_name = "FILE")]
    sdf_mapping: Option<PathBuf>,

    /// Matter device type XML file (matter-to-sdf input).
    #[arg(long, value_name = "FILE")]
    device_xml: Option<PathBuf>,

    /// Matter cluster XML file (matter-to-sdf input).
    #[arg(long, value_name = "FILE")]
    cluster_xml: Option<PathBuf>,

    /// Run structural pre- and post-conversion validation.
    #[arg(long)]
    validate: bool,

    /// Convert, then convert the result back and report drift against the input.
    #[arg(long)]
    round_trip: bool,

    /// Output path (extension is replaced per produced artifact).
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.matter_to_sdf == cli.sdf_to_matter {
        anyhow::bail!("exactly one of --matter-to-sdf or --sdf-to-matter must be given");
    }

    if cli.sdf_to_matter {
        run_sdf_to_matter(&cli)
    } else {
        run_matter_to_sdf(&cli)
    }
}

fn run_sdf_to_matter(cli: &Cli) -> anyhow::Result<()> {
    let model_path = cli.sdf_model.as_ref().ok_or_else(|| anyhow::anyhow!("--sdf-model is required"))?;
    let mapping_path = cli.sdf_mapping.as_ref().ok_or_else(|| anyhow::anyhow!("--sdf-mapping is required"))?;

    println!("[INFO] Loading SDF documents...");
    let model = io::load_sdf_model(model_path)?;
    let mapping = io::load_sdf_mapping(mapping_path)?;
    println!("[OK] Loaded {} and {}", model_path.display(), mapping_path.display());

    if cli.validate {
        report_validation("input", validate::check_sdf_model(&model))?;
    }

    println!("[INFO] Converting sdf -> matter...");
    let (device, clusters) = map_sdf_to_matter(&model, &mapping).map_err(|e| anyhow::anyhow!("{e}"))?;
    println!(
        "[OK] Converted to {} cluster(s){}",
        clusters.len(),
        device.as_ref().map(|d| format!(" and device type '{}'", d.name)).unwrap_or_default()
    );

    if cli.validate {
        report_validation("output", validate::check_matter_xml(device.as_ref(), &clusters))?;
    }

    println!("[INFO] Saving Matter XML...");
    if let Some(device) = &device {
        let device_path = cli.output.with_extension("device.xml");
        io::write_device_xml(&device_path, device)?;
        println!("[OK] Device type written to: {}", device_path.display());
    }
    let cluster_path = cli.output.with_extension("cluster.xml");
    io::write_cluster_xml(&cluster_path, &clusters)?;
    println!("[OK] Cluster definitions written to: {}", cluster_path.display());

    if cli.round_trip {
        println!("[INFO] Round-tripping matter -> sdf...");
        let (back_model, _back_mapping) = map_matter_to_sdf(device.as_ref(), &clusters).map_err(|e| anyhow::anyhow!("{e}"))?;
        report_sdf_round_trip(&model, &back_model);
    }

    Ok(())
}

fn run_matter_to_sdf(cli: &Cli) -> anyhow::Result<()> {
    let cluster_path = cli.cluster_xml.as_ref().ok_or_else(|| anyhow::anyhow!("--cluster-xml is required"))?;

    println!("[INFO] Loading Matter XML...");
    let clusters = io::load_cluster_xml(cluster_path)?;
    let device = match &cli.device_xml {
        Some(path) => Some(io::load_device_xml(path)?),
        None => None,
    };
    println!(
        "[OK] Loaded {} cluster(s){}",
        clusters.len(),
        cli.device_xml.as_ref().map(|p| format!(" and {}", p.display())).unwrap_or_default()
    );

    if cli.validate {
        report_validation("input", validate::check_matter_xml(device.as_ref(), &clusters))?;
    }

    println!("[INFO] Converting matter -> sdf...");
    let (model, mapping) = map_matter_to_sdf(device.as_ref(), &clusters).map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("[OK] Converted to SDF model with {} thing(s)/object(s)", model.sdf_thing.len() + model.sdf_object.len());

    if cli.validate {
        report_validation("output", validate::check_sdf_model(&model))?;
    }

    println!("[INFO] Saving SDF documents...");
    let model_path = cli.output.with_extension("sdfmodel.json");
    let mapping_path = cli.output.with_extension("sdfmapping.json");
    io::save_sdf_model(&model_path, &model)?;
    io::save_sdf_mapping(&mapping_path, &mapping)?;
    println!("[OK] Model written to: {}", model_path.display());
    println!("[OK] Mapping written to: {}", mapping_path.display());

    if cli.round_trip {
        println!("[INFO] Round-tripping sdf -> matter...");
        let (back_device, back_clusters) = map_sdf_to_matter(&model, &mapping).map_err(|e| anyhow::anyhow!("{e}"))?;
        report_matter_round_trip(&clusters, &back_clusters, device.as_ref(), back_device.as_ref());
    }

    Ok(())
}

fn report_validation(stage: &str, errors: Vec<validate::ValidationError>) -> anyhow::Result<()> {
    if errors.is_empty() {
        println!("[OK] {stage} validation passed with no findings");
        return Ok(());
    }
    let critical = errors.iter().filter(|e| e.is_critical()).count();
    println!("[WARN] {stage} validation found {} issue(s) ({critical} critical):", errors.len());
    for (idx, error) in errors.iter().enumerate() {
        println!("  {}. {error}", idx + 1);
    }
    if critical > 0 {
        anyhow::bail!("{stage} validation failed with {critical} critical issue(s)");
    }
    Ok(())
}

/// Fidelity score for an SDF round trip: start at 100, deduct per
/// structural mismatch between the original and the round-tripped model.
fn report_sdf_round_trip(original: &sdf_matter_converter::sdf::SdfModel, round_tripped: &sdf_matter_converter::sdf::SdfModel) {
    let mut score: i32 = 100;
    let mut notes = Vec::new();

    let original_objects: usize = original.sdf_object.len()
        + original.sdf_thing.values().map(|t| t.sdf_object.len()).sum::<usize>();
    let round_tripped_objects: usize = round_tripped.sdf_object.len()
        + round_tripped.sdf_thing.values().map(|t| t.sdf_object.len()).sum::<usize>();
    if original_objects != round_tripped_objects {
        score -= 15;
        notes.push(format!("object count drifted: {original_objects} -> {round_tripped_objects}"));
    }

    if original.sdf_thing.keys().collect::<std::collections::BTreeSet<_>>()
        != round_tripped.sdf_thing.keys().collect::<std::collections::BTreeSet<_>>()
    {
        score -= 10;
        notes.push("sdfThing key set changed".to_string());
    }

    print_round_trip_score(score, &notes);
}

fn report_matter_round_trip(
    original_clusters: &[sdf_matter_converter::matter::MatterCluster],
    round_tripped_clusters: &[sdf_matter_converter::matter::MatterCluster],
    original_device: Option<&sdf_matter_converter::matter::MatterDevice>,
    round_tripped_device: Option<&sdf_matter_converter::matter::MatterDevice>,
) {
    let mut score: i32 = 100;
    let mut notes = Vec::new();

    if original_clusters.len() != round_tripped_clusters.len() {
        score -= 15;
        notes.push(format!(
            "cluster count drifted: {} -> {}",
            original_clusters.len(),
            round_tripped_clusters.len()
        ));
    }

    let original_attrs: usize = original_clusters.iter().map(|c| c.attributes.len()).sum();
    let round_tripped_attrs: usize = round_tripped_clusters.iter().map(|c| c.attributes.len()).sum();
    if original_attrs != round_tripped_attrs {
        score -= 10;
        notes.push(format!("attribute count drifted: {original_attrs} -> {round_tripped_attrs}"));
    }

    if original_device.map(|d| d.clusters.len()) != round_tripped_device.map(|d| d.clusters.len()) {
        score -= 10;
        notes.push("device cluster count drifted".to_string());
    }

    print_round_trip_score(score, &notes);
}

fn print_round_trip_score(score: i32, notes: &[String]) {
    let score = score.max(0);
    let tag = match score {
        95..=100 => "lossless",
        80..=94 => "high-fidelity",
        60..=79 => "acceptable",
        30..=59 => "degraded",
        _ => "lossy",
    };
    println!(
        "[SCORE] Round-trip fidelity: {score}/100 (tag: {tag}) at {}",
        chrono::Utc::now().to_rfc3339()
    );
    for note in notes {
        println!("  - {note}");
    }
}
