use crate::classify::{PathDomain, classify_domain};
use crate::cli::ListArgs;
use crate::registry::WorkspaceRecord;
use crate::session::Session;
use crate::ZedwsError;
use serde::Serialize;
use std::path::Path;

pub const ICON: &str = "assets/zed.png";
pub const OPEN_METHOD: &str = "open_workspace";

/// One row in the launcher's result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultRow {
    pub title: String,
    pub sub_title: String,
    pub ico_path: String,
    #[serde(rename = "JsonRPCAction", skip_serializing_if = "Option::is_none")]
    pub action: Option<RpcAction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context_data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcAction {
    pub method: String,
    pub parameters: Vec<String>,
}

impl RpcAction {
    fn open(path: &str) -> Self {
        Self {
            method: OPEN_METHOD.into(),
            parameters: vec![path.into()],
        }
    }
}

/// Case-insensitive substring match on the stored path. Blank matches all.
pub fn filter<'a>(records: &'a [WorkspaceRecord], query: &str) -> Vec<&'a WorkspaceRecord> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| r.path.to_lowercase().contains(&q))
        .collect()
}

pub fn title(record: &WorkspaceRecord) -> String {
    match record.domain {
        PathDomain::Foreign => format!("{}  (WSL)", record.name()),
        PathDomain::Native => record.name().to_string(),
    }
}

fn workspace_row(record: &WorkspaceRecord) -> ResultRow {
    ResultRow {
        title: title(record),
        sub_title: record.path.clone(),
        ico_path: ICON.into(),
        action: Some(RpcAction::open(&record.path)),
        context_data: vec![record.path.clone()],
    }
}

/// Placeholder row shown when the store yielded nothing at all.
pub fn empty_row(store: &Path) -> ResultRow {
    ResultRow {
        title: "No Zed workspaces found".into(),
        sub_title: store.display().to_string(),
        ico_path: ICON.into(),
        action: None,
        context_data: Vec::new(),
    }
}

/// Rows for `query` against the full workspace list.
pub fn result_rows(records: &[WorkspaceRecord], query: &str, store: &Path) -> Vec<ResultRow> {
    if records.is_empty() {
        return vec![empty_row(store)];
    }
    filter(records, query).into_iter().map(workspace_row).collect()
}

pub fn context_menu(path: &str) -> Vec<ResultRow> {
    let label = classify_domain(path).label();
    vec![ResultRow {
        title: format!("Open in Zed ({label})"),
        sub_title: path.into(),
        ico_path: ICON.into(),
        action: Some(RpcAction::open(path)),
        context_data: Vec::new(),
    }]
}

pub fn handle_list(session: &mut Session, args: &ListArgs) -> Result<(), ZedwsError> {
    let records = session.workspaces();
    if records.is_empty() {
        eprintln!("zedws: no workspaces found ({})", session.store().display());
        if args.json {
            println!("[]");
        }
        return Ok(());
    }

    let hits = filter(&records, &args.query);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        for r in hits {
            println!("{}\t{}", title(r), r.path);
        }
    }
    Ok(())
}
