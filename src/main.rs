// src/main.rs
//
// Terminal shell: loads configuration, wires AppState and drives the
// commands from stdin, one line per command.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use movie_watchlist::application::commands::*;
use movie_watchlist::application::dto::{MovieRowDto, SignUpDto};
use movie_watchlist::application::state::AppState;
use movie_watchlist::config::{AppConfig, StoreBackend};
use movie_watchlist::domain::WatchStatus;
use movie_watchlist::events::EventBus;
use movie_watchlist::integrations::{
    CatalogApi, FederatedCredentialSource, FirebaseIdentityGateway, FirestoreDocumentStore,
    LocalIdentityGateway, TmdbClient,
};
use movie_watchlist::repositories::MemoryDocumentStore;
use movie_watchlist::services::DeletionPrompter;
use movie_watchlist::{logging, AppResult, ErrorResponse};

const HELP: &str = "\
Commands:
  login <email> <password>            sign in
  signup <email> <password> <confirm> create an account
  google                              sign in with Google
  reset <email>                       send a password reset email
  logout                              sign out
  whoami                              show the signed-in user
  search <terms>                      search the catalog
  popular                             list popular movies
  tab <search|to-watch|watched>       switch tab
  list                                show the active tab
  save <id> | watched <id>            put a movie on a list
  remove <id>                         take a movie off your lists
  delete-account                      delete your account and lists
  help | quit";

type InputLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// Reads answers from the same stdin the shell reads commands from
struct TerminalPrompt {
    input: InputLines,
}

impl TerminalPrompt {
    async fn ask(&self, question: &str) -> Option<String> {
        println!("{}", question);
        match self.input.lock().await.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()).filter(|l| !l.is_empty()),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Reading answer failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl DeletionPrompter for TerminalPrompt {
    async fn confirm_deletion(&self) -> bool {
        self.ask("Delete your account and all saved movies? This cannot be undone. [y/N]")
            .await
            .map_or(false, |answer| answer.eq_ignore_ascii_case("y"))
    }

    async fn prompt_password(&self) -> Option<String> {
        self.ask("Enter your password to confirm (empty to cancel):").await
    }

    fn notify(&self, message: &str) {
        println!("! {}", message);
    }
}

#[async_trait]
impl FederatedCredentialSource for TerminalPrompt {
    async fn obtain_google_id_token(&self) -> AppResult<Option<String>> {
        Ok(self
            .ask("Paste a Google ID token (empty to cancel):")
            .await)
    }
}

fn build_state(config: &AppConfig, prompt: Arc<TerminalPrompt>) -> Result<AppState> {
    let event_bus = Arc::new(EventBus::new());

    let tmdb = match &config.tmdb_base_url {
        Some(base_url) => TmdbClient::with_base_url(config.tmdb_api_key.clone(), base_url.clone())?,
        None => TmdbClient::new(config.tmdb_api_key.clone())?,
    };
    let catalog: Arc<dyn CatalogApi> = Arc::new(tmdb);

    let state = match config.backend {
        StoreBackend::Firestore => {
            let api_key = config
                .firebase_api_key
                .clone()
                .context("FIREBASE_API_KEY is not set")?;
            let project_id = config
                .firebase_project_id
                .as_deref()
                .context("FIREBASE_PROJECT_ID is not set")?;

            let gateway = Arc::new(
                FirebaseIdentityGateway::new(api_key, Arc::clone(&event_bus))?
                    .with_federated_source(prompt),
            );
            let store = Arc::new(FirestoreDocumentStore::new(
                project_id,
                gateway.clone(),
                config.poll_interval,
            )?);
            log::info!("Using Firestore project {}", project_id);
            AppState::new(event_bus, gateway, store, catalog)
        }
        StoreBackend::Memory => {
            let gateway = Arc::new(LocalIdentityGateway::new(Arc::clone(&event_bus)));
            let store = Arc::new(MemoryDocumentStore::new(Arc::clone(&event_bus)));
            log::info!("Using the in-memory backend; lists are lost on exit");
            AppState::new(event_bus, gateway, store, catalog)
        }
    };

    Ok(state)
}

fn print_rows(rows: &[MovieRowDto]) {
    if rows.is_empty() {
        println!("(nothing here)");
        return;
    }
    for row in rows {
        let year = row.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        let status = match row.status.as_deref() {
            Some("toWatch") => " [to watch]",
            Some("watched") => " [watched]",
            _ => "",
        };
        println!("{:>8}  {}{}{}", row.id, row.title, year, status);
    }
}

fn print_error(error: &ErrorResponse) {
    println!("! {}", error.message);
}

fn parse_id(arg: &str) -> Option<u64> {
    arg.parse().ok()
}

/// Run a catalog command in the background, aborting the one it supersedes
fn spawn_catalog(
    state: &Arc<AppState>,
    in_flight: &mut Option<JoinHandle<()>>,
    query: Option<String>,
) {
    if let Some(previous) = in_flight.take() {
        previous.abort();
    }

    let state = Arc::clone(state);
    *in_flight = Some(tokio::spawn(async move {
        let result = match query {
            Some(query) => search_movies(&state, &query).await,
            None => list_popular(&state).await,
        };
        match result {
            Ok(Some(rows)) => print_rows(&rows),
            Ok(None) => {}
            Err(e) => print_error(&e),
        }
    }));
}

async fn run_shell(state: Arc<AppState>, prompt: Arc<TerminalPrompt>) -> Result<()> {
    let mut in_flight: Option<JoinHandle<()>> = None;
    println!("Movie Watchlist. Type 'help' for commands.");

    loop {
        if let Some(notice) = take_sync_notice(&state) {
            println!("! {}", notice);
        }

        let line = match prompt.input.lock().await.next_line().await? {
            Some(line) => line,
            None => break,
        };

        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(command) => command.to_lowercase(),
            None => continue,
        };
        let args: Vec<&str> = parts.collect();
        let signed_in = state.session.session().is_signed_in();

        match (command.as_str(), args.as_slice()) {
            ("help", _) => println!("{}", HELP),
            ("quit" | "exit", _) => break,

            ("login", [email, password]) => match sign_in(&state, email, password).await {
                Ok(session) => println!(
                    "Signed in as {}",
                    session
                        .user
                        .map(|u| u.email.unwrap_or(u.uid))
                        .unwrap_or_default()
                ),
                Err(e) => print_error(&e),
            },
            ("signup", [email, password, confirm]) => {
                let dto = SignUpDto {
                    email: email.to_string(),
                    password: password.to_string(),
                    confirm_password: confirm.to_string(),
                };
                match sign_up(&state, dto).await {
                    Ok(_) => println!("Account created"),
                    Err(e) => print_error(&e),
                }
            }
            ("google", []) => match sign_in_with_google(&state).await {
                Ok(_) => println!("Signed in with Google"),
                Err(e) => print_error(&e),
            },
            ("reset", _) => match reset_password(&state, args.first().copied().unwrap_or("")).await {
                Ok(notice) => println!("{}", notice),
                Err(e) => print_error(&e),
            },

            (_, _) if !signed_in && command != "whoami" => {
                println!("! Sign in first (login, signup or google)");
            }

            ("whoami", _) => {
                let session = get_session(&state);
                match session.user {
                    Some(user) => println!(
                        "{} ({})",
                        user.email.or(user.display_name).unwrap_or(user.uid),
                        user.providers.join(", ")
                    ),
                    None => println!("Not signed in"),
                }
            }
            ("logout", []) => match sign_out(&state).await {
                Ok(_) => println!("Signed out"),
                Err(e) => print_error(&e),
            },
            ("search", terms) => {
                spawn_catalog(&state, &mut in_flight, Some(terms.join(" ")));
            }
            ("popular", []) => spawn_catalog(&state, &mut in_flight, None),
            ("tab", [tab]) => match set_tab(&state, tab) {
                Ok(rows) => print_rows(&rows),
                Err(e) => print_error(&e),
            },
            ("list", []) => print_rows(&current_rows(&state)),
            ("save" | "watched", [id]) => {
                let status = if command == "save" {
                    WatchStatus::ToWatch
                } else {
                    WatchStatus::Watched
                };
                match parse_id(id) {
                    Some(id) => match save_movie(&state, id, status).await {
                        Ok(()) => println!("Saved to {}", status.label()),
                        Err(e) => print_error(&e),
                    },
                    None => println!("! Not a movie id: {}", id),
                }
            }
            ("remove", [id]) => match parse_id(id) {
                Some(id) => match remove_movie(&state, id).await {
                    Ok(()) => println!("Removed"),
                    Err(e) => print_error(&e),
                },
                None => println!("! Not a movie id: {}", id),
            },
            ("delete-account", []) => match delete_account(&state, prompt.as_ref()).await {
                Ok(result) if result.deleted => println!("Account deleted"),
                Ok(_) => {}
                Err(e) => print_error(&e),
            },

            _ => println!("! Unknown command or wrong arguments. Type 'help'."),
        }
    }

    if let Some(task) = in_flight.take() {
        task.abort();
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    logging::initialize(config.log_level, std::io::stderr().is_terminal())?;

    let input: InputLines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let prompt = Arc::new(TerminalPrompt { input });

    let state = Arc::new(build_state(&config, Arc::clone(&prompt))?);

    // Keep the saved-movie projection on the signed-in user
    let watcher = {
        let state = Arc::clone(&state);
        let mut session = state.session.subscribe();
        tokio::spawn(async move {
            state.sync_watchlist();
            while session.changed().await.is_ok() {
                state.sync_watchlist();
            }
        })
    };

    let result = run_shell(Arc::clone(&state), prompt).await;

    watcher.abort();
    state.session.deactivate();
    log::info!("Bye");
    result
}
