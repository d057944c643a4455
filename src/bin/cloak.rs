// src/bin/cloak.rs
//! file-cloak interactive console — login/signup, then hide/unhide/list

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use file_cloak::{auth, verify, CipherEngine, CloakError, Config, ConsoleSender, FileHider, Store, User};
use rpassword::read_password;
use tracing::info;

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_password(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    Ok(read_password()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load().context("failed to load configuration")?;
    config
        .ensure_roots()
        .context("open/concealed roots unavailable")?;

    let cipher = CipherEngine::from_secret(&config.keys.cipher_secret);
    let store = Store::open(&config.paths.db_path).context("failed to open metadata store")?;

    info!(db = %config.paths.db_path.display(), "file-cloak ready");

    loop {
        println!("\n=== file-cloak ===");
        println!("1. Login");
        println!("2. Signup");
        println!("3. Exit");

        match prompt("Choice")?.as_str() {
            "1" => match login_flow(&store)? {
                Some(user) => dashboard(&store, &cipher, &config, &user)?,
                None => {}
            },
            "2" => signup_flow(&store)?,
            "3" => break,
            _ => println!("Unknown choice"),
        }
    }

    store.close().context("failed to close metadata store")?;
    Ok(())
}

fn login_flow(store: &Store) -> Result<Option<User>> {
    let username = prompt("Username")?;
    let password = prompt_password("Password")?;

    match auth::login(store, &username, &password) {
        Ok(user) => {
            println!("Welcome, {}!", user.username);
            Ok(Some(user))
        }
        Err(CloakError::EmailNotVerified) => {
            println!("Email not verified.");
            if let Some(user) = store.user_by_username(&username)? {
                if prompt("Verify now? [y/N]")?.eq_ignore_ascii_case("y") {
                    verification_menu(store, &user.email)?;
                }
            }
            Ok(None)
        }
        Err(e) => {
            println!("Login failed: {e}");
            Ok(None)
        }
    }
}

fn signup_flow(store: &Store) -> Result<()> {
    let username = prompt("Username")?;
    let email = prompt("Email")?;
    let password = prompt_password("Password")?;
    let confirm = prompt_password("Confirm password")?;

    if password != confirm {
        println!("Passwords do not match");
        return Ok(());
    }

    match auth::signup(store, &username, &email, &password) {
        Ok(user) => {
            println!("Account created — a verification code is on its way.");
            verify::issue(store, &ConsoleSender, &user.email)?;
            verification_menu(store, &user.email)?;
        }
        Err(e) => println!("Signup failed: {e}"),
    }
    Ok(())
}

fn verification_menu(store: &Store, email: &str) -> Result<()> {
    loop {
        println!("\n--- Email verification ---");
        println!("1. Enter code");
        println!("2. Resend code");
        println!("3. Back");

        match prompt("Choice")?.as_str() {
            "1" => {
                let code = prompt("Code")?;
                match verify::confirm(store, email, &code) {
                    Ok(()) => {
                        println!("Email verified!");
                        return Ok(());
                    }
                    Err(e) => println!("Verification failed: {e}"),
                }
            }
            "2" => match verify::issue(store, &ConsoleSender, email) {
                Ok(()) => println!("Code resent."),
                Err(e) => println!("Could not resend: {e}"),
            },
            "3" => return Ok(()),
            _ => println!("Unknown choice"),
        }
    }
}

fn dashboard(store: &Store, cipher: &CipherEngine, config: &Config, user: &User) -> Result<()> {
    let hider = FileHider::new(
        user.id,
        &config.paths.open_root,
        &config.paths.concealed_root,
        store,
        cipher,
    );

    loop {
        println!("\n--- Dashboard ({}) ---", user.username);
        println!("1. Hide file");
        println!("2. Unhide file");
        println!("3. List hidden files");
        println!("4. Logout");

        match prompt("Choice")?.as_str() {
            "1" => {
                let path = prompt("Path of file to hide")?;
                match hider.hide(Path::new(&path)) {
                    Ok(storage_id) => println!("Hidden as {storage_id}"),
                    Err(e) => println!("Hide failed: {e}"),
                }
            }
            "2" => {
                let id = prompt("Hidden file id")?;
                match id.parse::<i64>() {
                    Ok(id) => match hider.unhide(id) {
                        Ok(restored) => println!("Restored to {}", restored.display()),
                        Err(e) => println!("Unhide failed: {e}"),
                    },
                    Err(_) => println!("Not a numeric id"),
                }
            }
            "3" => {
                let records = hider.list()?;
                if records.is_empty() {
                    println!("No hidden files.");
                }
                for record in records {
                    println!(
                        "{:>4}  {}  (hidden at {})",
                        record.id, record.original_filename, record.hidden_at
                    );
                }
            }
            "4" => return Ok(()),
            _ => println!("Unknown choice"),
        }
    }
}
