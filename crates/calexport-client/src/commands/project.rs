//! `calexport project`: per-owner CSV files from an export document.

use crate::cli::ProjectArgs;
use crate::error::ClientResult;

/// Runs the projection and prints what was written.
pub fn run(args: ProjectArgs) -> ClientResult<()> {
    let summary =
        crate::project::project(&args.input, &args.output_dir, args.user.as_deref())?;

    println!("Read {}", args.input.display());
    println!("Found {} events", summary.total_events);
    println!("Found events for {} users", summary.owners_found);

    for file in &summary.files {
        println!("Processed {} events for {}", file.events, file.owner);
        println!("Created {}", file.path.display());
    }

    println!();
    println!("Processing complete!");
    println!(
        "Created CSV files for {} users in {}",
        summary.files.len(),
        args.output_dir.display()
    );

    Ok(())
}
