use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use database::{models, Database};
use serde::Serialize;
use tracing::{debug, info, instrument};

mod sheet;

#[derive(Debug, clap::Parser)]
#[command(version, about = "Worship team song sheets and lineups")]
enum Command {
    /// Print the lyrics and distinct chords of a text or HTML song file
    Extract { path: PathBuf },
    /// Store a PDF chord sheet as a song and register its chords
    ImportPdf {
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        tone: String,
        #[arg(long, default_value = "")]
        link: String,
        #[arg(long, env = "DATABASE_URL")]
        db: String,
    },
    /// Create or update the database schema
    Migrate {
        #[arg(long, env = "DATABASE_URL")]
        db: String,
    },
    NewLineup {
        /// Event date as dd/mm/yyyy
        #[arg(long, value_parser = parse_date)]
        date: time::Date,
        #[arg(long, default_value = "")]
        event: String,
        #[arg(long)]
        playlist_id: Option<i64>,
        #[arg(long, env = "DATABASE_URL")]
        db: String,
    },
    /// Book a member for a role they hold
    Book {
        #[arg(long)]
        lineup_id: i64,
        #[arg(long)]
        member_id: i64,
        #[arg(long)]
        role_id: i64,
        #[arg(long, env = "DATABASE_URL")]
        db: String,
    },
    /// Top 5 songs over the last 6 months
    MostPlayed {
        #[arg(long, env = "DATABASE_URL")]
        db: String,
    },
    /// Top 10 members by bookings over the last year
    MostScheduled {
        #[arg(long, env = "DATABASE_URL")]
        db: String,
    },
    /// Latest 10 bookings of a member
    History {
        #[arg(long)]
        member_id: i64,
        #[arg(long, env = "DATABASE_URL")]
        db: String,
    },
}

fn parse_date(value: &str) -> Result<time::Date, time::error::Parse> {
    time::Date::parse(
        value,
        time::macros::format_description!("[day]/[month]/[year]"),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    {
        use tracing_subscriber::prelude::*;

        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init()
    }

    if let Ok(path) = dotenvy::dotenv() {
        debug!(?path, "loaded environment file");
    }

    match Command::parse() {
        Command::Extract { path } => print_json(&sheet::read_song_file(&path)?),
        Command::ImportPdf {
            path,
            title,
            author,
            tone,
            link,
            db,
        } => import_pdf(path, title, author, tone, link, &db).await,
        Command::Migrate { db } => {
            connect(&db).await?.migrate().await?;
            info!("database is up to date");
            Ok(())
        }
        Command::NewLineup {
            date,
            event,
            playlist_id,
            db,
        } => {
            let lineup_id = connect(&db)
                .await?
                .insert_lineup(&models::NewLineup {
                    date,
                    event,
                    playlist_id,
                })
                .await?;
            println!("{lineup_id}");
            Ok(())
        }
        Command::Book {
            lineup_id,
            member_id,
            role_id,
            db,
        } => {
            let assignment = connect(&db)
                .await?
                .book_assignment(lineup_id, member_id, role_id)
                .await?;
            print_json(&assignment)
        }
        Command::MostPlayed { db } => {
            let today = today();
            let songs = connect(&db)
                .await?
                .most_played_songs(database::months_before(today, 6), today, 5)
                .await?;
            print_json(&songs)
        }
        Command::MostScheduled { db } => {
            let today = today();
            let members = connect(&db)
                .await?
                .most_scheduled_members(database::months_before(today, 12), today, 10)
                .await?;
            print_json(&members)
        }
        Command::History { member_id, db } => {
            let history = connect(&db).await?.schedule_history(member_id, 10).await?;
            print_json(&history)
        }
    }
}

async fn connect(db_url: &str) -> anyhow::Result<Database> {
    Database::connect(db_url)
        .await
        .context("failed to connect to database")
}

fn today() -> time::Date {
    time::OffsetDateTime::now_utc().date()
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct ImportedSong<'a> {
    song_id: i64,
    chords: &'a std::collections::BTreeSet<String>,
}

#[instrument(skip(db_url), level = "trace")]
async fn import_pdf(
    path: PathBuf,
    title: String,
    author: String,
    tone: String,
    link: String,
    db_url: &str,
) -> anyhow::Result<()> {
    let imported = sheet::read_pdf(&path)?;
    let song = models::NewSong {
        title,
        author,
        tone,
        body: imported.body,
        link,
    };

    let start = std::time::Instant::now();
    let song_id = connect(db_url)
        .await?
        .insert_song(&song, &imported.chords)
        .await?;
    let elapsed = start.elapsed();
    info!(?elapsed, song_id, title = %song.title, "completed insert");

    print_json(&ImportedSong {
        song_id,
        chords: &imported.chords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("07/04/2024").unwrap(),
            time::macros::date!(2024 - 04 - 07)
        );
        assert!(parse_date("2024-04-07").is_err());
    }

    #[test]
    fn test_book_arguments() {
        let command = Command::try_parse_from([
            "worship_cli",
            "book",
            "--lineup-id",
            "3",
            "--member-id",
            "7",
            "--role-id",
            "1",
            "--db",
            "postgres://localhost/worship",
        ])
        .unwrap();

        assert!(matches!(
            command,
            Command::Book {
                lineup_id: 3,
                member_id: 7,
                role_id: 1,
                ..
            }
        ));
    }
}
