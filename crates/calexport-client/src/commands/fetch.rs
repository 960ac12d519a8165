//! `calexport fetch`: export one mailbox calendar to a JSON document.

use calexport_core::{ExportDocument, JsonStyle};
use calexport_providers::export_owner;
use calexport_providers::graph::{Authenticator, GraphClient};

use crate::cli::FetchArgs;
use crate::config::{ClientConfig, KeysFile, resolve_credentials};
use crate::error::ClientResult;
use crate::export::write_document;

/// Authenticates, walks every event page of `args.user` and writes the
/// export document.
///
/// Credential and authentication problems abort before anything is written.
/// A failed page does not: the events fetched so far are still exported.
pub async fn run(args: FetchArgs, config: &ClientConfig, debug: bool) -> ClientResult<()> {
    let keys = KeysFile::load(&args.keys_file)?;
    let credentials =
        resolve_credentials(&config.graph, keys.as_ref(), |var| std::env::var(var).ok())?;
    let graph = config.graph.to_provider_config();

    println!("Authenticating with Microsoft Graph...");
    let token = Authenticator::new(graph.clone())?
        .acquire_token(&credentials)
        .await?;
    println!("Authentication successful");

    println!("Exporting calendar for {}", args.user);
    let client = GraphClient::new(token, &graph)?;
    let export = export_owner(&client, &graph.events_url(&args.user), &args.user, debug).await;
    println!("   Found {} events", export.fetched);
    if let Some(ref e) = export.error {
        println!("   Export incomplete, keeping what was fetched: {}", e);
    }
    println!("   Exported {} events", export.events.len());

    let document = ExportDocument::new(&args.user, export.events, debug);
    let style = if args.pretty {
        JsonStyle::Pretty
    } else {
        JsonStyle::Compact
    };
    let summary = write_document(&document, &args.output, style)?;

    println!();
    println!("Export complete!");
    println!("Total events exported: {}", summary.total_events);
    println!("Output file: {}", summary.output.display());
    println!("Events with meeting URLs: {}", summary.with_meeting_url);

    Ok(())
}
