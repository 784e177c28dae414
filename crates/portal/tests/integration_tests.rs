//! Integration tests for the portal crate
//!
//! These drive the page controllers end to end against the in-memory
//! backend, and the HTTP client against a throwaway local server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use portal::chat::{ChatController, group_by_date_on};
use portal::{
    ChatHistoryEntry, Folder, HttpPortal, InMemoryPortal, NotificationKind, PhotoUpload,
    PortalApi, PortalSettings, QueryId, QueryItem, RecordedRequest, RecordingSurface, RequestError, Sender,
    TicketInbox,
};
use tempfile::TempDir;

/// Helper to seed a backend and an inbox showing `view`
fn make_inbox(
    view: Folder,
    tickets: Vec<QueryItem>,
) -> (Arc<InMemoryPortal>, Arc<RecordingSurface>, TicketInbox) {
    let api = Arc::new(InMemoryPortal::with_tickets(tickets));
    let surface = Arc::new(RecordingSurface::new(true));
    let inbox = TicketInbox::new(api.clone(), surface.clone(), view, api.list(view));
    (api, surface, inbox)
}

fn make_entry(id: i64, created_at: &str) -> ChatHistoryEntry {
    ChatHistoryEntry {
        id,
        user_message: format!("question {}", id),
        bot_response: format!("answer {}", id),
        user_timestamp: created_at.to_string(),
        created_at: created_at.to_string(),
    }
}

#[test]
fn test_star_flips_one_item_only() {
    let (api, surface, mut inbox) = make_inbox(
        Folder::Inbox,
        vec![QueryItem::new(1, "Fees"), QueryItem::new(2, "Hostel")],
    );

    assert!(inbox.toggle_star(QueryId(1)));
    let starred: Vec<_> = inbox.items().iter().filter(|q| q.starred).map(|q| q.id).collect();
    assert_eq!(starred, vec![QueryId(1)]);
    assert!(api.ticket(QueryId(1)).unwrap().starred);

    api.fail_ticket(
        QueryId(2),
        RequestError::Http {
            status: 500,
            message: String::new(),
        },
    );
    assert!(!inbox.toggle_star(QueryId(2)));
    let starred: Vec<_> = inbox.items().iter().filter(|q| q.starred).map(|q| q.id).collect();
    assert_eq!(starred, vec![QueryId(1)]);

    let notes = surface.notifications();
    assert_eq!(notes[1].kind, NotificationKind::Danger);
    assert_eq!(notes[1].message, "Failed to update star status");
}

#[test]
fn test_delete_requires_confirmation() {
    let (api, surface, mut inbox) = make_inbox(Folder::Inbox, vec![QueryItem::new(1, "Fees")]);
    surface.set_answer(false);

    assert!(!inbox.delete_query(QueryId(1)));
    assert!(api.requests().is_empty());
    assert_eq!(inbox.items().len(), 1);
}

#[test]
fn test_bulk_delete_two_inbox_items() {
    let (api, surface, mut inbox) = make_inbox(
        Folder::Inbox,
        vec![
            QueryItem::new(1, "Fees"),
            QueryItem::new(2, "Hostel"),
            QueryItem::new(3, "Library"),
        ],
    );
    inbox.select(QueryId(1), true);
    inbox.select(QueryId(3), true);

    let report = inbox.delete_selected().unwrap();
    assert_eq!(report.succeeded, vec![QueryId(3), QueryId(1)]);

    let mut requests = api.requests();
    requests.sort_by_key(|r| match r {
        RecordedRequest::Delete { id, .. } => id.get(),
        _ => 0,
    });
    assert_eq!(
        requests,
        vec![
            RecordedRequest::Delete {
                id: QueryId(1),
                permanent: false
            },
            RecordedRequest::Delete {
                id: QueryId(3),
                permanent: false
            },
        ]
    );

    let left: Vec<_> = inbox.items().iter().map(|q| q.id).collect();
    assert_eq!(left, vec![QueryId(2)]);
    assert!(api.ticket(QueryId(1)).unwrap().trashed);
    assert_eq!(surface.notifications().len(), 1);
    assert!(!inbox.bulk_buttons().delete_enabled);
}

#[test]
fn test_bulk_delete_from_trash_is_permanent() {
    let (api, _, mut inbox) = make_inbox(
        Folder::Trash,
        vec![
            QueryItem::new(1, "Fees").trashed(true),
            QueryItem::new(2, "Hostel").trashed(true),
        ],
    );
    inbox.set_select_all(true);
    assert!(inbox.select_all_state());

    inbox.delete_selected().unwrap();
    assert!(api.requests().iter().all(|r| matches!(
        r,
        RecordedRequest::Delete {
            permanent: true,
            ..
        }
    )));
    assert!(api.list(Folder::Trash).is_empty());
    assert!(inbox.items().is_empty());
}

#[test]
fn test_archive_then_restore_round_through_views() {
    let (api, _, mut inbox) = make_inbox(Folder::Inbox, vec![QueryItem::new(7, "Bus pass")]);

    assert!(inbox.toggle_archive(QueryId(7)));
    assert!(inbox.items().is_empty());

    inbox.switch_view(Folder::Archive, api.list(Folder::Archive));
    assert_eq!(inbox.items().len(), 1);
    assert!(inbox.delete_query(QueryId(7)));

    inbox.switch_view(Folder::Trash, api.list(Folder::Trash));
    assert!(inbox.restore_query(QueryId(7)));
    assert!(inbox.items().is_empty());

    inbox.switch_view(Folder::Archive, api.list(Folder::Archive));
    assert_eq!(inbox.items()[0].id, QueryId(7));
}

#[test]
fn test_chat_round_trip() {
    let api = Arc::new(InMemoryPortal::new());
    api.set_chat_reply("hi", "hello");
    let surface = Arc::new(RecordingSurface::new(true));
    let mut chat = ChatController::new(api.clone(), surface);

    chat.set_input("hi");
    assert!(chat.send());

    let pane: Vec<_> = chat
        .messages()
        .iter()
        .map(|m| (m.sender, m.text.as_str()))
        .collect();
    assert_eq!(pane, vec![(Sender::User, "hi"), (Sender::Bot, "hello")]);
    assert!(!chat.typing_indicator());

    chat.open_history();
    let groups = chat.history();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label, "Today");
    assert_eq!(groups[0].rows[0].message(), "hi");
}

#[test]
fn test_history_grouping_is_stable() {
    let today = chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let entries = vec![
        make_entry(1, "2024-05-01 09:00:00"),
        make_entry(2, "2024-05-02 09:30:00"),
        make_entry(3, "2024-05-01 18:45:00"),
    ];

    let groups = group_by_date_on(&entries, today);
    let layout: Vec<(&str, Vec<i64>)> = groups
        .iter()
        .map(|g| (g.label.as_str(), g.rows.iter().map(|r| r.entry.id).collect()))
        .collect();
    assert_eq!(layout, vec![("Yesterday", vec![3, 1]), ("Today", vec![2])]);
    assert_eq!(group_by_date_on(&entries, today), groups);
}

#[test]
fn test_settings_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portal.json");
    std::fs::write(
        &path,
        r#"{"base_url": "https://portal.example.edu", "csrf_token": "abc", "timeout_secs": 5}"#,
    )
    .unwrap();

    let settings = PortalSettings::from_file(&path).unwrap();
    assert_eq!(settings.base_url, "https://portal.example.edu");
    assert_eq!(settings.csrf_token.as_deref(), Some("abc"));
    assert_eq!(settings.timeout(), Duration::from_secs(5));
    assert!(HttpPortal::new(&settings).is_ok());
}

// A one-shot HTTP server: answers the first request with `response` and
// hands back the raw request it received.
fn serve_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = String::new();
        let mut content_length = 0usize;
        let mut chunked = false;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                } else if name.eq_ignore_ascii_case("transfer-encoding") {
                    chunked = value.trim().eq_ignore_ascii_case("chunked");
                }
            }
            head.push_str(&line);
        }

        let mut body = Vec::new();
        if chunked {
            loop {
                let mut size = String::new();
                reader.read_line(&mut size).unwrap();
                let size = usize::from_str_radix(size.trim(), 16).unwrap();
                let mut chunk = vec![0u8; size + 2];
                reader.read_exact(&mut chunk).unwrap();
                if size == 0 {
                    break;
                }
                body.extend_from_slice(&chunk[..size]);
            }
        } else {
            body.resize(content_length, 0);
            reader.read_exact(&mut body).unwrap();
        }

        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        format!("{}\r\n{}", head, String::from_utf8_lossy(&body))
    });
    (base_url, handle)
}

fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    )
}

fn client(base_url: &str) -> HttpPortal {
    let settings = PortalSettings {
        timeout_secs: 2,
        session_cookie: Some("session=s3cr3t".to_string()),
        ..PortalSettings::default()
    }
    .with_base_url(base_url)
    .with_csrf_token("tok-123");
    HttpPortal::new(&settings).unwrap()
}

#[test]
fn test_http_sends_csrf_and_json_body() {
    let (base_url, server) = serve_once(http_response(
        "200 OK",
        "application/json",
        r#"{"success": true, "archived": true}"#,
    ));
    let portal = client(&base_url);

    assert_eq!(portal.toggle_archive(QueryId(42)), Ok(true));

    let request = server.join().unwrap();
    let lower = request.to_ascii_lowercase();
    assert!(request.starts_with("POST /toggle_archive "));
    assert!(lower.contains("x-csrftoken: tok-123"));
    assert!(lower.contains("cookie: session=s3cr3t"));
    assert!(request.contains(r#""query_id":42"#));
}

#[test]
fn test_http_photo_upload_is_multipart_form() {
    let (base_url, server) = serve_once(http_response(
        "200 OK",
        "application/json",
        r#"{"success": true, "photo_url": "/static/uploads/me.png"}"#,
    ));
    let portal = client(&base_url);

    let upload = PhotoUpload::new("me.png", b"PNGDATA".to_vec());
    assert_eq!(
        portal.upload_profile_photo(&upload),
        Ok("/static/uploads/me.png".to_string())
    );

    let request = server.join().unwrap();
    let lower = request.to_ascii_lowercase();
    assert!(request.starts_with("POST /upload_profile_photo "));
    assert!(lower.contains("content-type: multipart/form-data; boundary="));
    assert!(lower.contains("x-csrftoken: tok-123"));
    assert!(request.contains(r#"name="photo""#));
    assert!(request.contains(r#"filename="me.png""#));
    assert!(request.contains("PNGDATA"));
}

#[test]
fn test_http_base_url_sub_path_is_kept() {
    let (base_url, server) = serve_once(http_response(
        "200 OK",
        "application/json",
        r#"{"success": true, "archived": false}"#,
    ));
    let portal = client(&format!("{}/portal", base_url));

    assert_eq!(portal.toggle_archive(QueryId(3)), Ok(false));

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /portal/toggle_archive "));
}

#[test]
fn test_http_error_status_carries_server_message() {
    let (base_url, server) = serve_once(http_response(
        "404 Not Found",
        "application/json",
        r#"{"error": "Query not found"}"#,
    ));
    let portal = client(&base_url);

    let err = portal.toggle_star(QueryId(9)).unwrap_err();
    assert_eq!(
        err,
        RequestError::Http {
            status: 404,
            message: "Query not found".to_string()
        }
    );
    server.join().unwrap();
}

#[test]
fn test_http_non_json_is_protocol_error() {
    let (base_url, server) = serve_once(http_response(
        "200 OK",
        "text/html",
        "<html>login required</html>",
    ));
    let portal = client(&base_url);

    let err = portal.restore_query(QueryId(1)).unwrap_err();
    assert!(matches!(err, RequestError::Protocol(_)));
    server.join().unwrap();
}

#[test]
fn test_http_application_failure() {
    let (base_url, server) = serve_once(http_response(
        "200 OK",
        "application/json",
        r#"{"success": false, "message": "Mail server unavailable"}"#,
    ));
    let portal = client(&base_url);

    let request = portal::SupportRequest {
        name: "Asha".into(),
        email: "asha@example.edu".into(),
        query: "Transcript".into(),
    };
    let err = portal.send_support_email(&request).unwrap_err();
    assert_eq!(err.notice("fallback"), "Mail server unavailable");
    let raw = server.join().unwrap();
    assert!(raw.starts_with("POST /send_support_email "));
}

#[test]
fn test_http_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(4));
        drop(stream);
    });

    let settings = PortalSettings {
        timeout_secs: 1,
        ..PortalSettings::default()
    }
    .with_base_url(base_url);
    let portal = HttpPortal::new(&settings).unwrap();

    assert_eq!(portal.chat_history(), Err(RequestError::Timeout));
    server.join().unwrap();
}

#[test]
fn test_http_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let portal = client(&base_url);
    assert!(matches!(
        portal.send_chat("hi"),
        Err(RequestError::Network(_))
    ));
}

#[test]
fn test_fetch_csrf_token_from_page() {
    let (base_url, server) = serve_once(http_response(
        "200 OK",
        "text/html",
        r#"<html><head><meta content="fresh-token" name="csrf-token"></head></html>"#,
    ));
    let portal = client(&base_url);

    assert_eq!(portal.fetch_csrf_token("/chat").unwrap(), "fresh-token");
    assert_eq!(portal.csrf_token().as_deref(), Some("fresh-token"));
    server.join().unwrap();
}
