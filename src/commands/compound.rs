//! Compound command handlers: show, spectra, gc.

use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};
use webbook::{CompoundRecord, Resolution, SpectrumKind, WebBookClient};

use crate::cli::{GcArgs, ShowArgs, SpectraArgs};
use crate::commands::{print_json, progress_bar, spinner};

pub async fn run_show_command(
    client: &WebBookClient,
    args: &ShowArgs,
    show_progress: bool,
) -> Result<()> {
    let pending = spinner(show_progress, &format!("Resolving {}...", args.identifier));
    let resolution = CompoundRecord::resolve(client, &args.identifier).await;
    pending.finish_and_clear();

    let mut record = match resolution? {
        Resolution::Found(record) => *record,
        Resolution::NotFound => bail!("No compound found for '{}'", args.identifier),
        Resolution::Ambiguous(candidates) => bail!(
            "'{}' matches {} compounds: {}",
            args.identifier,
            candidates.len(),
            candidates.join(", ")
        ),
    };

    if args.coordinates {
        record.fetch_coordinates_2d(client).await?;
        record.fetch_coordinates_3d(client).await?;
    }

    if args.json {
        return print_json(&record);
    }
    print_record(&record);
    Ok(())
}

fn print_record(record: &CompoundRecord) {
    println!("ID:          {}", record.id);
    println!("Name:        {}", record.name);
    if let Some(formula) = &record.formula {
        println!("Formula:     {formula}");
    }
    if let Some(weight) = record.mol_weight {
        println!("Mol. weight: {weight}");
    }
    if let Some(cas) = &record.cas_rn {
        println!("CAS RN:      {cas}");
    }
    if let Some(inchi) = &record.inchi {
        println!("InChI:       {inchi}");
    }
    if let Some(key) = &record.inchi_key {
        println!("InChIKey:    {key}");
    }
    if !record.synonyms.is_empty() {
        println!("Synonyms:    {}", record.synonyms.join("; "));
    }
    let data: Vec<&str> = record
        .references
        .webbook_data
        .keys()
        .map(String::as_str)
        .collect();
    if !data.is_empty() {
        println!("Data:        {}", data.join(", "));
    }
    for (label, slot) in [("2D MOL", record.mol_2d()), ("3D MOL", record.mol_3d())] {
        if let Some(Some(block)) = slot.as_fetched() {
            println!("{label}:\n{block}");
        }
    }
}

pub async fn run_spectra_command(
    client: &WebBookClient,
    args: &SpectraArgs,
    show_progress: bool,
) -> Result<()> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory '{}'", args.out.display()))?;
    let Some(mut record) = CompoundRecord::load(client, &args.id).await? else {
        bail!("No compound page for '{}'", args.id);
    };

    let kinds: Vec<SpectrumKind> = if args.kinds.is_empty() {
        SpectrumKind::ALL.to_vec()
    } else {
        args.kinds.clone()
    };

    let bar = progress_bar(show_progress, kinds.len(), "Fetching spectra");
    let mut saved = 0;
    for kind in kinds {
        bar.set_message(kind.label());
        let fetched = record.fetch_spectra(client, kind).await.map(<[_]>::len);
        match fetched {
            Ok(0) => info!(kind = %kind, "No spectra of this kind"),
            Ok(_) => {
                let paths = record.save_spectra(kind, &args.out)?;
                bar.suspend(|| {
                    for path in &paths {
                        println!("{}", path.display());
                    }
                });
                saved += paths.len();
            }
            Err(error) => warn!(kind = %kind, error = %error, "Failed to fetch spectra"),
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    info!(saved, dir = %args.out.display(), "Spectra saved");
    Ok(())
}

pub async fn run_gc_command(client: &WebBookClient, args: &GcArgs) -> Result<()> {
    let Some(mut record) = CompoundRecord::load(client, &args.id).await? else {
        bail!("No compound page for '{}'", args.id);
    };
    let chromatograms = record.fetch_gas_chromatography(client).await?;

    if args.json {
        return print_json(&chromatograms);
    }
    if chromatograms.is_empty() {
        info!(id = %args.id, "No gas chromatography data");
        return Ok(());
    }
    for chromatogram in chromatograms {
        println!("{chromatogram}");
        println!("  columns: {}", chromatogram.table.column_names().join(", "));
    }
    Ok(())
}
