//! Command-line client for browsing and editing the archive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use kanahcian::api::ApiClient;
use kanahcian::config::{Config, API_URL_ENV};
use kanahcian::models::{LocationPayload, RecordDraft};
use kanahcian::search::search_locations;
use kanahcian::store::{LocationStore, RecordSelection, VillagerIdCache};
use kanahcian::tags::TagFilter;
use kanahcian::view::{surface_for, DetailContext, DetailSurface, LayoutMode};

#[derive(Parser, Debug)]
#[command(name = "mapctl")]
#[command(about = "Browse and edit the village visitation archive")]
struct Args {
    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Archive API base URL
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Log requests
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List locations, optionally restricted to one filter category
    Locations {
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Filter categories that currently have locations
    Filters,
    /// Search locations by name
    Search { text: String },
    /// Show a location with its visit records
    Show {
        id: i64,
        /// Terminal width used to pick the layout
        #[arg(long, default_value = "1280")]
        width: u32,
    },
    /// Create, update or delete locations
    #[command(subcommand)]
    Location(LocationCommand),
    /// Create, update or delete visit records
    #[command(subcommand)]
    Record(RecordCommand),
    /// Show villager details
    Villager { id: i64 },
    /// Look up a villager id by name
    VillagerId { name: String },
}

#[derive(Subcommand, Debug)]
enum LocationCommand {
    Add(LocationFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: LocationFields,
    },
    Delete { id: i64 },
}

#[derive(ClapArgs, Debug)]
struct LocationFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    brief: Option<String>,
    #[arg(long)]
    photo: Option<String>,
    /// Tag to add (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

impl LocationFields {
    fn apply(self, payload: &mut LocationPayload) {
        if let Some(name) = self.name {
            payload.name = name;
        }
        if let Some(lat) = self.lat {
            payload.latitude = lat;
        }
        if let Some(lon) = self.lon {
            payload.longitude = lon;
        }
        if let Some(address) = self.address {
            payload.address = address;
        }
        if let Some(brief) = self.brief {
            payload.brief_description = brief;
        }
        if let Some(photo) = self.photo {
            payload.photo = photo;
        }
        for tag in &self.tags {
            payload.add_tag(tag);
        }
    }
}

#[derive(Subcommand, Debug)]
enum RecordCommand {
    Add {
        #[arg(long)]
        location: i64,
        #[arg(long, default_value = "1")]
        account: i64,
        #[command(flatten)]
        fields: RecordFields,
    },
    Update {
        id: i64,
        /// Location the record belongs to
        #[arg(long)]
        location: i64,
        #[command(flatten)]
        fields: RecordFields,
    },
    Delete { id: i64 },
}

#[derive(ClapArgs, Debug)]
struct RecordFields {
    #[arg(long)]
    semester: Option<String>,
    /// Visit date, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    photo: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl RecordFields {
    fn apply(self, draft: &mut RecordDraft) {
        if let Some(semester) = self.semester {
            draft.semester = semester;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(photo) = self.photo {
            draft.photo = photo;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level.as_str())),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::resolve(args.config.as_deref(), args.api_url)?;
    let client = ApiClient::from_config(&config).context("Failed to build API client")?;
    debug!("Using archive API at {}", client.base_url());

    match args.command {
        Command::Locations { filter } => {
            let filter: TagFilter = filter.parse()?;
            let store = load_store(&client).await?;
            for marker in store.markers(filter) {
                println!(
                    "{:>5}  {:<16} {}  ({:.6}, {:.6})",
                    marker.location.id,
                    marker.category.id(),
                    marker.location.name,
                    marker.location.latitude,
                    marker.location.longitude
                );
            }
        }
        Command::Filters => {
            let store = load_store(&client).await?;
            for filter in store.available_filters() {
                println!("{} {:<16} {}", filter.icon(), filter.id(), filter.label());
            }
        }
        Command::Search { text } => {
            let store = load_store(&client).await?;
            let hits = search_locations(store.all(), &text);
            if hits.is_empty() {
                println!("找不到「{}」相關地點", text.trim());
            }
            for hit in hits {
                match hit.score {
                    Some(score) => println!("{:>5}  {}  {:.0}%", hit.location.id, hit.location.name, score),
                    None => println!("{:>5}  {}", hit.location.id, hit.location.name),
                }
            }
        }
        Command::Show { id, width } => {
            let store = load_store(&client).await?;
            let location = store
                .get(id)
                .with_context(|| format!("Location {} not found", id))?;

            let mut selection = RecordSelection::new();
            let ticket = selection.select(id);
            match client.fetch_records(id).await {
                Ok(records) => selection.apply(ticket, records),
                Err(e) => {
                    eprintln!("無法加載家訪記錄: {}", e);
                    selection.fail(ticket)
                }
            };

            let surface = surface_for(LayoutMode::for_width(width));
            println!("{}", surface.render(&DetailContext::new(location, &selection)));
        }
        Command::Location(cmd) => run_location(&client, cmd).await?,
        Command::Record(cmd) => run_record(&client, cmd).await?,
        Command::Villager { id } => {
            let villager = client.fetch_villager_details(id).await?;
            println!("{}", serde_json::to_string_pretty(&villager)?);
        }
        Command::VillagerId { name } => {
            let mut cache = VillagerIdCache::new();
            match client.find_villager_id(&mut cache, &name).await? {
                Some(id) => println!("{}", id),
                None => anyhow::bail!("No villager named '{}' found", name),
            }
        }
    }

    Ok(())
}

async fn load_store(client: &ApiClient) -> Result<LocationStore> {
    let locations = client
        .fetch_locations()
        .await
        .context("Failed to fetch locations")?;
    Ok(LocationStore::new(locations))
}

async fn run_location(client: &ApiClient, cmd: LocationCommand) -> Result<()> {
    match cmd {
        LocationCommand::Add(fields) => {
            let mut payload = LocationPayload::default();
            fields.apply(&mut payload);
            let location = client.add_location(&payload).await?;
            println!("Created location {} ({})", location.id, location.name);
        }
        LocationCommand::Update { id, fields } => {
            let store = load_store(client).await?;
            let current = store
                .get(id)
                .with_context(|| format!("Location {} not found", id))?;
            let mut payload = LocationPayload::from_location(current);
            fields.apply(&mut payload);
            let location = client.update_location(id, &payload).await?;
            println!("Updated location {} ({})", location.id, location.name);
        }
        LocationCommand::Delete { id } => {
            client.delete_location(id).await?;
            println!("Deleted location {}", id);
        }
    }
    Ok(())
}

async fn run_record(client: &ApiClient, cmd: RecordCommand) -> Result<()> {
    match cmd {
        RecordCommand::Add {
            location,
            account,
            fields,
        } => {
            let mut draft = RecordDraft::for_location(location);
            draft.account_id = account;
            fields.apply(&mut draft);
            let payload = draft.create_payload()?;
            let created = client.create_record(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        RecordCommand::Update {
            id,
            location,
            fields,
        } => {
            let records = client.fetch_records(location).await?;
            let record = records
                .iter()
                .find(|r| r.id == id)
                .with_context(|| format!("Record {} not found at location {}", id, location))?;

            let original = RecordDraft::from_record(record);
            let mut draft = original.clone();
            fields.apply(&mut draft);
            let changes = draft.changes_since(&original)?;
            let updated = client.update_record(id, &changes).await?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        RecordCommand::Delete { id } => {
            client.delete_record(id).await?;
            println!("Deleted record {}", id);
        }
    }
    Ok(())
}
