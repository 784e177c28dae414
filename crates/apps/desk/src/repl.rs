//! Line-oriented front-end over the portal controllers

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use portal::widgets::PhotoUploader;
use portal::{
    BulkReport, ChatController, ChatHistoryEntry, Folder, QueryId, SupportForm, SupportRequest,
    TicketInbox,
};

use crate::backend::{Backend, TicketChange};
use crate::surface::TerminalSurface;

const HELP: &str = "\
Tickets:
  view <folder>        inbox | sent | starred | archive | trash
  list                 show the current folder
  select <id>          toggle the checkbox of a query
  select-all           toggle every checkbox
  star <id>            toggle star
  archive <id>         toggle archive
  delete <id>          delete (permanent in trash)
  restore <id>         restore from trash
  open <id>            open the query page in a browser
  bulk-delete          delete selected queries
  bulk-archive         archive selected queries
  refresh              reload the current folder
Chat:
  chat <text>          send a message
  history              show stored conversations
  replay <n>           show conversation n from `history`
  new-chat             clear the conversation pane
  clear-history        delete stored conversations
Other:
  support <name>|<email>|<message>   contact live support
  photo <path>         upload a profile photo
  notices              notifications still on screen
  help                 this text
  quit";

pub struct Repl {
    backend: Backend,
    surface: Arc<TerminalSurface>,
    inbox: TicketInbox,
    chat: ChatController,
    support: SupportForm,
    photo: PhotoUploader,
}

impl Repl {
    pub fn new(backend: Backend, surface: Arc<TerminalSurface>, view: Folder) -> Self {
        let api = backend.api();
        let items = backend.list(view);
        Self {
            inbox: TicketInbox::new(api.clone(), surface.clone(), view, items),
            chat: ChatController::new(api.clone(), surface.clone()),
            support: SupportForm::new(api.clone(), surface.clone()),
            photo: PhotoUploader::new(api, surface.clone(), ""),
            backend,
            surface,
        }
    }

    /// Read commands until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        println!("Type `help` for commands.");
        self.print_list();

        let stdin = io::stdin();
        loop {
            print!("{}> ", self.inbox.current_view());
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(());
            }
            match self.execute(line.trim()) {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => println!("{}", e),
            }
            if self.surface.take_reload() {
                self.reload();
            }
        }
    }

    /// Run one command; `Ok(false)` means quit
    pub fn execute(&mut self, line: &str) -> Result<bool> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        debug!("Command {:?} {:?}", command, rest);

        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => return Ok(false),
            "view" => {
                let folder: Folder = rest.parse().map_err(|e: String| anyhow!(e))?;
                self.inbox.switch_view(folder, self.backend.list(folder));
                self.print_list();
            }
            "list" => self.print_list(),
            "select" => {
                self.inbox.toggle_selected(parse_id(rest)?);
                self.print_list();
            }
            "select-all" => {
                let all = !self.inbox.select_all_state();
                self.inbox.set_select_all(all);
                self.print_list();
            }
            "star" => {
                let id = parse_id(rest)?;
                if self.inbox.toggle_star(id) {
                    self.backend.record(id, TicketChange::StarToggled);
                }
            }
            "archive" => {
                let id = parse_id(rest)?;
                if self.inbox.toggle_archive(id) {
                    self.backend.record(id, TicketChange::ArchiveToggled);
                }
            }
            "delete" => {
                let id = parse_id(rest)?;
                let change = self.delete_change();
                if self.inbox.delete_query(id) {
                    self.backend.record(id, change);
                }
            }
            "restore" => {
                let id = parse_id(rest)?;
                if self.inbox.restore_query(id) {
                    self.backend.record(id, TicketChange::Restored);
                }
            }
            "open" => self.inbox.view_query(parse_id(rest)?),
            "bulk-delete" => {
                let change = self.delete_change();
                match self.inbox.delete_selected() {
                    Some(report) => self.record_all(&report, change),
                    None => println!("Nothing deleted"),
                }
            }
            "bulk-archive" => match self.inbox.archive_selected() {
                Some(report) => self.record_all(&report, TicketChange::ArchiveToggled),
                None => println!("Nothing archived"),
            },
            "refresh" => self.inbox.refresh(),
            "chat" => {
                let before = self.chat.messages().len();
                self.chat.set_input(rest);
                if self.chat.send() {
                    for message in &self.chat.messages()[before..] {
                        println!(
                            "{:>5} {}  {}",
                            format!("{:?}", message.sender).to_lowercase(),
                            message.time_label(),
                            message.text
                        );
                    }
                }
            }
            "history" => {
                self.chat.open_history();
                self.print_history();
            }
            "replay" => {
                let n: usize = rest.parse().context("usage: replay <n>")?;
                let entry = self
                    .history_entry(n)
                    .ok_or_else(|| anyhow!("no conversation {}", n))?;
                self.chat.replay(&entry);
                for message in self.chat.messages() {
                    println!("{:?}: {}", message.sender, message.text);
                }
            }
            "new-chat" => self.chat.new_chat(),
            "clear-history" => {
                self.chat.clear_history();
            }
            "support" => {
                let mut parts = rest.splitn(3, '|').map(str::trim);
                self.support.open();
                self.support.fields = SupportRequest {
                    name: parts.next().unwrap_or_default().to_string(),
                    email: parts.next().unwrap_or_default().to_string(),
                    query: parts.next().unwrap_or_default().to_string(),
                };
                self.support.submit();
            }
            "photo" => {
                if rest.is_empty() {
                    bail!("usage: photo <path>");
                }
                if self.photo.select_path(Path::new(rest))? {
                    println!("Profile photo is now {}", self.photo.src());
                }
            }
            "notices" => {
                for notification in self.surface.visible() {
                    println!("{}", notification.message);
                }
            }
            other => bail!("Unknown command `{}`; try `help`", other),
        }
        Ok(true)
    }

    /// Deleting from trash is permanent; anywhere else it moves to trash
    fn delete_change(&self) -> TicketChange {
        if self.inbox.current_view() == Folder::Trash {
            TicketChange::Deleted
        } else {
            TicketChange::Trashed
        }
    }

    fn record_all(&mut self, report: &BulkReport, change: TicketChange) {
        for &id in &report.succeeded {
            self.backend.record(id, change);
        }
    }

    fn reload(&mut self) {
        let view = self.inbox.current_view();
        self.inbox.switch_view(view, self.backend.list(view));
        self.print_list();
    }

    fn print_list(&self) {
        let items = self.inbox.items();
        if items.is_empty() {
            println!("No queries in {}", self.inbox.current_view());
            return;
        }
        for item in items {
            println!(
                "[{}] {:>4} {} {:<8} {}",
                if item.selected { "x" } else { " " },
                item.id,
                if item.starred { "*" } else { " " },
                item.status,
                item.subject
            );
        }
        let buttons = self.inbox.bulk_buttons();
        if buttons.delete_enabled {
            println!("{} selected", self.inbox.list().selected_ids().len());
        }
    }

    fn print_history(&self) {
        let mut n = 0;
        for group in self.chat.history() {
            println!("{}", group.label);
            for row in &group.rows {
                n += 1;
                println!("  {:>3}. {}  {}", n, row.time, row.message());
            }
        }
        if n == 0 {
            println!("No stored conversations");
        }
    }

    /// Entry numbered `n` (1-based) in `history` output order
    fn history_entry(&self, n: usize) -> Option<ChatHistoryEntry> {
        self.chat
            .history()
            .iter()
            .flat_map(|group| group.rows.iter())
            .nth(n.checked_sub(1)?)
            .map(|row| row.entry.clone())
    }
}

fn parse_id(arg: &str) -> Result<QueryId> {
    arg.parse()
        .with_context(|| format!("expected a query id, got `{}`", arg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::demo_tickets;
    use portal::{PortalSettings, QueryItem};
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn repl() -> Repl {
        let surface = Arc::new(TerminalSurface::new("http://127.0.0.1:5000", true));
        Repl::new(Backend::offline(demo_tickets()), surface, Folder::Inbox)
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(" 12").unwrap(), QueryId(12));
        assert!(parse_id("twelve").is_err());
    }

    #[test]
    fn test_commands_drive_inbox() {
        let mut repl = repl();
        assert!(repl.execute("select 1").unwrap());
        assert!(repl.execute("select 3").unwrap());
        assert!(repl.execute("bulk-delete").unwrap());
        assert_eq!(repl.inbox.items().len(), 1);

        repl.execute("view trash").unwrap();
        assert_eq!(repl.inbox.items().len(), 3);
        assert!(!repl.execute("quit").unwrap());
    }

    #[test]
    fn test_refresh_relists() {
        let mut repl = repl();
        repl.execute("refresh").unwrap();
        assert!(repl.surface.take_reload());
        assert!(!repl.surface.take_reload());
    }

    #[test]
    fn test_bad_input_is_an_error() {
        let mut repl = repl();
        assert!(repl.execute("view spam").is_err());
        assert!(repl.execute("star x").is_err());
        assert!(repl.execute("frobnicate").is_err());
        assert!(repl.execute("replay 4").is_err());
    }

    #[test]
    fn test_chat_and_replay() {
        let mut repl = repl();
        repl.execute("chat when are exams").unwrap();
        repl.execute("history").unwrap();
        repl.execute("replay 1").unwrap();
        assert_eq!(repl.chat.messages()[0].text, "when are exams");
    }

    /// Answer one request with `body` and hand back the raw request head
    fn serve_json_once(body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = io::BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                head.push_str(&line);
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
            head
        });
        (base_url, handle)
    }

    #[test]
    fn test_online_archive_survives_reload() {
        let (base_url, server) = serve_json_once(r#"{"success": true, "archived": true}"#);
        let settings = PortalSettings::default()
            .with_base_url(base_url.as_str())
            .with_csrf_token("tok");
        let backend = Backend::online(&settings, vec![QueryItem::new(1, "Fees")]).unwrap();
        let surface = Arc::new(TerminalSurface::new(&base_url, true));
        let mut repl = Repl::new(backend, surface, Folder::Inbox);

        repl.execute("archive 1").unwrap();
        assert!(server.join().unwrap().starts_with("POST /toggle_archive "));
        assert!(repl.inbox.items().is_empty());

        repl.reload();
        assert!(repl.inbox.items().is_empty());

        repl.execute("view archive").unwrap();
        assert_eq!(repl.inbox.items().len(), 1);
        assert!(repl.inbox.items()[0].archived);
    }
}
