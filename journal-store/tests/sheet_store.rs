//! Sheet store against a local stand-in for the remote worksheet.
//!
//! Run with: `cargo test -p journal-store --features sheets`

#![cfg(feature = "sheets")]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use journal_domain::{Direction, Session, TradeRecord, TradeSubmission};
use journal_store::{SheetStore, StoreError, TradeStore};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Sheets {
    tabs: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

async fn read_tab(State(sheets): State<Sheets>, Path(tab): Path<String>) -> Json<Vec<Value>> {
    let tabs = sheets.tabs.lock().unwrap();
    Json(tabs.get(&tab).cloned().unwrap_or_default())
}

async fn write_tab(
    State(sheets): State<Sheets>,
    Path(tab): Path<String>,
    headers: HeaderMap,
    Json(rows): Json<Vec<Value>>,
) -> StatusCode {
    if headers.get("authorization").and_then(|h| h.to_str().ok()) != Some("Bearer secret") {
        return StatusCode::UNAUTHORIZED;
    }
    sheets.tabs.lock().unwrap().insert(tab, rows);
    StatusCode::NO_CONTENT
}

async fn spawn_sheet_server(sheets: Sheets) -> anyhow::Result<String> {
    let app = Router::new()
        .route("/sheets/:tab", get(read_tab).put(write_tab))
        .with_state(sheets);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok(format!("http://{}/sheets", addr))
}

fn create_test_record(session: Session) -> TradeRecord {
    TradeRecord::new(
        TradeSubmission {
            planned_direction: Direction::Buy,
            session,
            ..TradeSubmission::default()
        },
        dec!(58.75),
    )
}

#[tokio::test]
async fn test_append_list_delete_round_trip() -> anyhow::Result<()> {
    let sheets = Sheets::default();
    let base = spawn_sheet_server(sheets.clone()).await?;
    let store = SheetStore::new(&base, "Sheet1", Some("secret".to_string()))?;

    assert!(store.list().await?.is_empty());

    let first = create_test_record(Session::London);
    let second = create_test_record(Session::Asia);
    assert_eq!(store.append(&first).await?, 0);
    assert_eq!(store.append(&second).await?, 1);

    let listed = store.list().await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].entry.session, Session::Asia);
    assert_eq!(listed[1].confluence_score, dec!(58.75));

    // Stored with the journal's column headers
    {
        let tabs = sheets.tabs.lock().unwrap();
        let row = &tabs["Sheet1"][0];
        assert_eq!(row["Session"], "London");
        assert_eq!(row["Confluence Score"], "58.75");
    }

    let removed = store.delete(0).await?;
    assert_eq!(removed.id, first.id);
    assert_eq!(store.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_blank_rows_are_skipped() -> anyhow::Result<()> {
    let sheets = Sheets::default();
    sheets.tabs.lock().unwrap().insert(
        "Sheet1".to_string(),
        vec![
            json!({
                "DateTime": "2024-05-02 14:00:00",
                "Trade Number": 1,
                "Planned Direction": "Sell",
                "Session": "NY Open",
                "Confluence Score": 35
            }),
            json!({ "DateTime": "", "Notes": null }),
            json!({
                "Planned Direction": "Buy",
                "Session": "Asia",
                "Confluence Score": 12.5
            }),
        ],
    );
    let base = spawn_sheet_server(sheets).await?;
    let store = SheetStore::new(&base, "Sheet1", None)?;

    let listed = store.list().await?;

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].entry.planned_direction, Direction::Sell);
    assert_eq!(listed[0].entry.session, Session::NyOpen);
    // Typed by hand: no DateTime, no Id
    assert_eq!(listed[1].entry.session, Session::Asia);
    assert_eq!(listed[1].confluence_score, dec!(12.5));
    Ok(())
}

#[tokio::test]
async fn test_rejected_write_is_a_remote_error() -> anyhow::Result<()> {
    let base = spawn_sheet_server(Sheets::default()).await?;
    let store = SheetStore::new(&base, "Sheet1", None)?;

    let result = store.append(&create_test_record(Session::Asia)).await;

    assert!(matches!(result, Err(StoreError::Remote(_))));
    Ok(())
}

#[tokio::test]
async fn test_delete_past_end_is_not_found() -> anyhow::Result<()> {
    let base = spawn_sheet_server(Sheets::default()).await?;
    let store = SheetStore::new(&base, "Sheet1", Some("secret".to_string()))?;

    let result = store.delete(4).await;

    assert!(matches!(result, Err(StoreError::NotFound { position: 4, len: 0 })));
    Ok(())
}
