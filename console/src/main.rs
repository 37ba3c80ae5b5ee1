use account_console::{Command, Console, HttpAccountsClient, DEFAULT_API_URL};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn ask(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("account_console=info")),
        )
        .init();

    let api_url = std::env::var("ACCOUNTS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    tracing::info!(%api_url, "starting account console");
    let mut console = Console::new(HttpAccountsClient::new(api_url));
    let _ = console.refresh().await;
    println!("{}", console.render());

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    println!("{}", message);
                }
                continue;
            }
        };
        let result = match command {
            Command::List => console.refresh().await,
            Command::Add => {
                console.open_add_form();
                Ok(())
            }
            Command::Edit(id) => console.edit_account(id).await,
            Command::Name(name) => console.set_name(name),
            Command::Balance(text) => console.set_balance(&text),
            Command::Save => console.save_account().await.map(|_| ()),
            Command::Cancel => {
                console.cancel_form();
                Ok(())
            }
            Command::Delete(id) => console.delete_account(id, &mut ask).await.map(|_| ()),
            Command::Help => {
                println!("{}", account_console::commands::HELP);
                continue;
            }
            Command::Quit => break,
        };
        if let Err(e) = result {
            println!("{}", e);
        }
        println!("{}", console.render());
    }
    Ok(())
}
