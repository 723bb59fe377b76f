use std::env;
use std::process;
use std::sync::Arc;

use boiler_room_inventory::auth::{FileSessionStore, Session};
use boiler_room_inventory::prelude::*;
use clap::{Arg, ArgMatches, Command};
use dotenv::dotenv;

const DEFAULT_SESSION_FILE: &str = ".inventory-session.json";

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();

    let matches = Command::new("inventory")
        .version(env!("CARGO_PKG_VERSION"))
        .about("List and remove parts in the Boiler Room inventory")
        .subcommand_required(true)
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .value_name("FILE")
                .takes_value(true)
                .help("Where the signed-in session is persisted"),
        )
        .subcommand(
            Command::new("list").about("Show inventory items").arg(
                Arg::new("search")
                    .short('s')
                    .long("search")
                    .value_name("TERM")
                    .takes_value(true)
                    .help("Only show items containing TERM"),
            ),
        )
        .subcommand(
            Command::new("remove")
                .about("Delete an item")
                .arg(Arg::new("id").required(true).help("Item id")),
        )
        .get_matches();

    if let Err(e) = run(&matches).await {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

async fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = FirebaseConfig::from_env()?;
    let session_file = matches
        .value_of("session-file")
        .map(str::to_string)
        .or_else(|| env::var("INVENTORY_SESSION_FILE").ok())
        .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());

    let backend = Backend::new_with_options(
        config,
        ClientOptions::default(),
        Arc::new(FileSessionStore::new(session_file)),
    )?;

    if let Ok(id_token) = env::var("FIREBASE_ID_TOKEN") {
        let refresh_token = env::var("FIREBASE_REFRESH_TOKEN").unwrap_or_default();
        backend
            .auth()
            .set_session(Session::from_id_token(&id_token, &refresh_token)?)?;
    }

    let view = backend.inventory();
    view.mount().await?;

    match matches.subcommand() {
        Some(("list", sub)) => {
            let storage = backend.storage();
            let cards = view.on_search_text_change(sub.value_of("search").unwrap_or(""));
            for card in cards {
                let card = card.resolve_image(&storage);
                println!("[{}]", card.id);
                for (label, value) in &card.fields {
                    println!("  {}: {}", label, value);
                }
                if let Some(image) = &card.image {
                    println!("  image: {}", image);
                }
            }
            Ok(())
        }
        Some(("remove", sub)) => {
            let id = sub.value_of("id").unwrap_or_default();
            view.on_remove_pressed(id).await?;
            println!("removed {}; {} items left", id, view.items().len());
            Ok(())
        }
        _ => Ok(()),
    }
}
