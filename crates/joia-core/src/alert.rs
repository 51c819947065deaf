//! Cross-collection alert aggregation.
//!
//! The dashboard tracks three collections of monthly obligations in the
//! document store: partner revenue shares, AI tool subscriptions, and
//! client platform fees. [`aggregate`] scans all three against an injected
//! "now", keeps the items due today or tomorrow, and returns one unified
//! list ordered by urgency.
//!
//! The list is rebuilt from scratch on every call — there is no
//! "already alerted" state, so an alert reappears on every pass until its
//! due day goes by. Callers must treat the returned list as a full
//! replacement, never an incremental patch.

use chrono::DateTime;
use chrono_tz::Tz;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::recurrence::{alert_level, AlertLevel};

// ── Source collections ──────────────────────────────────────────────────────
//
// These mirror the document-store schemas, external field names included.
// The due-day field is stored as `dueDay` on partnerships but `dueDate` on
// tools and platforms; the rename is absorbed here so the inconsistency
// never reaches the aggregation logic.

/// A partner with a monthly revenue-share payout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partnership {
    pub id: String,
    pub company: String,
    #[serde(default)]
    pub monthly_value: f64,
    pub due_day: u32,
}

/// An AI tool subscription renewing monthly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub monthly_cost: f64,
    #[serde(rename = "dueDate")]
    pub due_day: u32,
}

/// A hosting/SaaS platform billed monthly, optionally tied to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub monthly_cost: f64,
    #[serde(rename = "dueDate")]
    pub due_day: u32,
    #[serde(default)]
    pub client: Option<String>,
}

// ── Normalized obligation ───────────────────────────────────────────────────

/// Which collection an obligation came from. Drives the alert id prefix,
/// the message template, and the display label — never the alert logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertSource {
    Partnership,
    AiTool,
    Platform,
}

impl AlertSource {
    /// Display label for UI grouping.
    pub fn label(self) -> &'static str {
        match self {
            AlertSource::Partnership => "Parceria",
            AlertSource::AiTool => "Ferramenta IA",
            AlertSource::Platform => "Plataforma",
        }
    }

    /// Id prefix guaranteeing global uniqueness across merged sources.
    fn prefix(self) -> &'static str {
        match self {
            AlertSource::Partnership => "part",
            AlertSource::AiTool => "tool",
            AlertSource::Platform => "plat",
        }
    }
}

/// The common shape every source record is reduced to before processing.
#[derive(Debug, Clone)]
pub struct Obligation {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub due_day: u32,
    pub source: AlertSource,
    /// Linked client name, only populated for platforms.
    pub client: Option<String>,
}

impl From<&Partnership> for Obligation {
    fn from(p: &Partnership) -> Self {
        Obligation {
            id: p.id.clone(),
            title: p.company.clone(),
            amount: p.monthly_value,
            due_day: p.due_day,
            source: AlertSource::Partnership,
            client: None,
        }
    }
}

impl From<&AiTool> for Obligation {
    fn from(t: &AiTool) -> Self {
        Obligation {
            id: t.id.clone(),
            title: t.name.clone(),
            amount: t.monthly_cost,
            due_day: t.due_day,
            source: AlertSource::AiTool,
            client: None,
        }
    }
}

impl From<&Platform> for Obligation {
    fn from(p: &Platform) -> Self {
        Obligation {
            id: p.id.clone(),
            title: p.name.clone(),
            amount: p.monthly_cost,
            due_day: p.due_day,
            source: AlertSource::Platform,
            client: p.client.clone(),
        }
    }
}

// ── Alert items ─────────────────────────────────────────────────────────────

/// One entry of the unified alert list, ready for the notification layer.
///
/// Constructed fresh each aggregation pass and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertItem {
    /// `{source prefix}-{record id}`, unique across all three collections.
    pub id: String,
    pub title: String,
    pub message: String,
    /// The obligation amount; tie-break key within an urgency level.
    pub value: f64,
    pub level: AlertLevel,
    /// Display label of the source collection.
    pub source: &'static str,
}

fn message_for(obligation: &Obligation, level: AlertLevel) -> String {
    let suffix = match level {
        AlertLevel::Red => "",
        AlertLevel::Yellow => " amanhã",
    };
    match obligation.source {
        AlertSource::Partnership => format!("Pagamento de parceiro pendente{suffix}"),
        AlertSource::AiTool => format!("Renovação da assinatura{suffix}"),
        AlertSource::Platform => match &obligation.client {
            Some(client) => format!("Mensalidade da plataforma de {client}{suffix}"),
            None => format!("Mensalidade da plataforma{suffix}"),
        },
    }
}

/// Scan the three source collections and build the ordered alert list.
///
/// Items whose due day is neither today nor tomorrow (per
/// [`alert_level`]) are skipped. The result has every red alert before
/// every yellow one, values descending within each level; ties keep their
/// encounter order (partnerships, then tools, then platforms).
///
/// An empty collection simply contributes no alerts; it never blocks the
/// other two sources.
pub fn aggregate(
    partnerships: &[Partnership],
    tools: &[AiTool],
    platforms: &[Platform],
    now: DateTime<Tz>,
) -> Vec<AlertItem> {
    let obligations = partnerships
        .iter()
        .map(Obligation::from)
        .chain(tools.iter().map(Obligation::from))
        .chain(platforms.iter().map(Obligation::from));

    let mut alerts: Vec<AlertItem> = Vec::new();
    let mut scanned = 0usize;
    for obligation in obligations {
        scanned += 1;
        let Some(level) = alert_level(obligation.due_day, now) else {
            continue;
        };
        alerts.push(AlertItem {
            id: format!("{}-{}", obligation.source.prefix(), obligation.id),
            title: obligation.title.clone(),
            message: message_for(&obligation, level),
            value: obligation.amount,
            level,
            source: obligation.source.label(),
        });
    }

    // Red before yellow, then value descending. sort_by is stable, so
    // value ties keep encounter order.
    alerts.sort_by(|a, b| a.level.cmp(&b.level).then(b.value.total_cmp(&a.value)));

    debug!(
        "aggregated {} alert(s) from {} obligation(s) at {}",
        alerts.len(),
        scanned,
        now.format("%Y-%m-%d")
    );
    alerts
}

/// The `n` most urgent alerts — a prefix of the already-sorted list, for
/// the transient toast layer.
pub fn most_urgent(alerts: &[AlertItem], n: usize) -> &[AlertItem] {
    &alerts[..alerts.len().min(n)]
}

// ── Tests ───────────────────────────────────────────────────────────────────
