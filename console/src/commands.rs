//! Line commands understood by the interactive console.

use fintech_gateway::AccountId;

pub const HELP: &str = "\
commands:
  list                 reload accounts from the gateway
  add                  open the form for a new account
  edit <id>            open the form on a copy of an account
  name <text>          set the draft name
  balance <number>     set the draft balance
  save                 create or update from the draft
  cancel               close the form, discarding the draft
  delete <id>          delete an account (asks for confirmation)
  help                 show this text
  quit                 leave";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Add,
    Edit(AccountId),
    Name(String),
    Balance(String),
    Save,
    Cancel,
    Delete(AccountId),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let id = |what: &str| -> Result<AccountId, String> {
            rest.parse()
                .map_err(|_| format!("usage: {} <id>", what))
        };
        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" | "refresh" => Ok(Command::List),
            "add" | "new" => Ok(Command::Add),
            "edit" => id("edit").map(Command::Edit),
            "name" if !rest.is_empty() => Ok(Command::Name(rest.to_string())),
            "name" => Err("usage: name <text>".into()),
            "balance" if !rest.is_empty() => Ok(Command::Balance(rest.to_string())),
            "balance" => Err("usage: balance <number>".into()),
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "delete" | "rm" => id("delete").map(Command::Delete),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(Command::parse("edit 3"), Ok(Command::Edit(3)));
        assert_eq!(Command::parse("  delete   12 "), Ok(Command::Delete(12)));
        assert_eq!(Command::parse("name Alice Smith"), Ok(Command::Name("Alice Smith".into())));
        assert_eq!(Command::parse("balance -10.5"), Ok(Command::Balance("-10.5".into())));
        assert_eq!(Command::parse("SAVE"), Ok(Command::Save));
    }

    #[test]
    fn reports_missing_or_bad_arguments() {
        assert_eq!(Command::parse("edit"), Err("usage: edit <id>".into()));
        assert_eq!(Command::parse("delete x"), Err("usage: delete <id>".into()));
        assert_eq!(Command::parse("name"), Err("usage: name <text>".into()));
        assert!(Command::parse("launch").is_err());
    }
}
