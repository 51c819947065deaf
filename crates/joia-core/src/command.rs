//! Natural-language wallet commands.
//!
//! The wallet screen accepts one free-text line per command: record money
//! in, record money out, or save a Pix key. [`parse`] classifies the line,
//! extracts the amount and description, and returns a structured result —
//! every failure mode is a typed [`CommandError`], never a panic.
//!
//! Amounts are written the Brazilian way as often as not, so the scanner
//! accepts `500.00`, `5.000,00` and `500,00` and normalizes all three.
//!
//! The "now" anchor is injected; it only feeds the transaction timestamp,
//! so parsing is deterministic under a fixed clock.

use std::sync::LazyLock;

use chrono::DateTime;
use chrono_tz::Tz;
use regex::Regex;
use serde::Serialize;

use crate::error::{CommandError, Result};

// ── Intent keywords ─────────────────────────────────────────────────────────
//
// The three sets are disjoint. Detection order is a contract: inflow is
// checked before outflow before pix, so a future keyword sharing a prefix
// across sets resolves to the earlier set.

pub const INFLOW_KEYWORDS: &[&str] = &["entrada", "recebi", "ganhei", "entrou"];
pub const OUTFLOW_KEYWORDS: &[&str] = &["saida", "saída", "gastei", "paguei", "comprei", "mandei"];
pub const PIX_KEYWORDS: &[&str] = &["pix", "chave"];

/// Direction of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Flow {
    Inflow,
    Outflow,
}

/// A successfully parsed wallet command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedCommand {
    /// Record an inflow or outflow.
    Transaction {
        flow: Flow,
        amount: f64,
        description: String,
        category: String,
        /// RFC 3339, from the injected "now".
        timestamp: String,
    },
    /// Save a Pix key under a holder's name.
    PixKey { holder: String, key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Inflow,
    Outflow,
    Pix,
}

// ── Amount extraction ───────────────────────────────────────────────────────

// Optionally R$-prefixed number in one of three written forms:
// thousands-dot/decimal-comma (5.000,00), plain decimal-comma (500,00), or
// plain dot decimal (500.00). A bare integer is capped at six digits and
// bounded on both sides: Pix keys are long digit runs (phones, CPFs) and
// must not scan as amounts.
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:r\$\s*)?\b(\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+,\d{1,2}|\d+\.\d{1,2}|\d{1,6})\b",
    )
    .expect("amount pattern is valid")
});

static CATEGORY_DELIM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) em ").expect("delimiter pattern is valid"));

/// Extract the first monetary amount found in `text`, or 0 when none.
///
/// The dashboard's other screens reuse this for ad-hoc money input, so it
/// is public.
pub fn parse_amount(text: &str) -> f64 {
    extract_amount(text).0
}

/// First amount in `text` and the byte span of the full match (currency
/// prefix included) for later removal.
fn extract_amount(text: &str) -> (f64, Option<(usize, usize)>) {
    let Some(caps) = AMOUNT_RE.captures(text) else {
        return (0.0, None);
    };
    let Some(whole) = caps.get(0) else {
        return (0.0, None);
    };
    let value = caps
        .get(1)
        .map(|m| normalize_amount(m.as_str()))
        .unwrap_or(0.0);
    (value, Some((whole.start(), whole.end())))
}

/// Normalize a matched amount to a decimal number.
///
/// Both separators present: dot is the thousands separator, comma the
/// decimal point. Comma alone: decimal point. Otherwise parse as written.
fn normalize_amount(matched: &str) -> f64 {
    let normalized = if matched.contains('.') && matched.contains(',') {
        matched.replace('.', "").replace(',', ".")
    } else if matched.contains(',') {
        matched.replace(',', ".")
    } else {
        matched.to_string()
    };
    normalized.parse().unwrap_or(0.0)
}

// ── Categorization ──────────────────────────────────────────────────────────

const TRANSPORT_HINTS: &[&str] = &[
    "uber",
    "taxi",
    "táxi",
    "onibus",
    "ônibus",
    "gasolina",
    "combustivel",
    "combustível",
    "estacionamento",
];
const FOOD_HINTS: &[&str] = &[
    "ifood",
    "mercado",
    "restaurante",
    "lanche",
    "padaria",
    "almoço",
    "almoco",
    "jantar",
];
const LEISURE_HINTS: &[&str] = &["netflix", "spotify", "cinema", "show", "steam", "jogo"];

/// Vendor-hint categorization over the lowercased original text.
fn auto_category(lower: &str) -> Option<&'static str> {
    if TRANSPORT_HINTS.iter().any(|h| lower.contains(h)) {
        return Some("Transporte");
    }
    if FOOD_HINTS.iter().any(|h| lower.contains(h)) {
        return Some("Alimentação");
    }
    if LEISURE_HINTS.iter().any(|h| lower.contains(h)) {
        return Some("Lazer");
    }
    None
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse one wallet command line.
///
/// Single pass: intent from the leading keyword (inflow, then outflow,
/// then pix — first match wins), amount from the first monetary pattern in
/// the original text, then per-intent field extraction. A pix command with
/// an amount is a payment, not a key-save.
///
/// # Examples
///
/// ```
/// use joia_core::command::{parse, Flow, ParsedCommand};
/// use joia_core::recurrence::BUSINESS_TZ;
/// use chrono::TimeZone;
///
/// let now = BUSINESS_TZ.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap();
/// let parsed = parse("Entrada 500 Venda de curso", now).unwrap();
/// assert!(matches!(
///     parsed,
///     ParsedCommand::Transaction { flow: Flow::Inflow, .. }
/// ));
/// ```
pub fn parse(raw: &str, now: DateTime<Tz>) -> Result<ParsedCommand> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CommandError::Empty);
    }

    let lower = text.to_lowercase();
    let intent = detect_intent(&lower);
    let (amount, span) = extract_amount(text);

    let flow = match intent {
        Some(Intent::Pix) if amount == 0.0 => return parse_pix_key(text),
        // An amount on a pix command means a payment went out.
        Some(Intent::Pix) | Some(Intent::Outflow) => Flow::Outflow,
        Some(Intent::Inflow) => Flow::Inflow,
        None => return Err(CommandError::Unrecognized),
    };

    if amount <= 0.0 {
        return Err(CommandError::InvalidAmount);
    }

    let without_amount = match span {
        Some((start, end)) => format!("{}{}", &text[..start], &text[end..]),
        None => text.to_string(),
    };
    let remainder = strip_leading_keyword(&without_amount).trim().to_string();

    let (description, explicit_category) = split_category(&remainder);

    let category = match explicit_category {
        Some(cat) => cat,
        None => match flow {
            Flow::Inflow => "Entradas".to_string(),
            Flow::Outflow => auto_category(&lower).unwrap_or("Geral").to_string(),
        },
    };

    let description = if description.is_empty() {
        match flow {
            Flow::Inflow => "Nova Entrada".to_string(),
            Flow::Outflow => "Nova Despesa".to_string(),
        }
    } else {
        description
    };

    Ok(ParsedCommand::Transaction {
        flow,
        amount,
        description,
        category,
        timestamp: now.to_rfc3339(),
    })
}

fn detect_intent(lower: &str) -> Option<Intent> {
    if INFLOW_KEYWORDS.iter().any(|k| lower.starts_with(k)) {
        return Some(Intent::Inflow);
    }
    if OUTFLOW_KEYWORDS.iter().any(|k| lower.starts_with(k)) {
        return Some(Intent::Outflow);
    }
    if PIX_KEYWORDS.iter().any(|k| lower.starts_with(k)) {
        return Some(Intent::Pix);
    }
    None
}

/// Key-save form: "Pix <holder name...> <key>". The last whitespace token
/// is the key, everything before it the holder.
fn parse_pix_key(text: &str) -> Result<ParsedCommand> {
    let rest = strip_leading_keyword(text);
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let Some((key, holder)) = tokens.split_last() else {
        return Err(CommandError::PixFormat);
    };
    if holder.is_empty() {
        return Err(CommandError::PixFormat);
    }
    Ok(ParsedCommand::PixKey {
        holder: holder.join(" "),
        key: (*key).to_string(),
    })
}

/// Drop the first token when it starts with a known intent keyword (from
/// any of the three sets). The guard keeps a description that happens to
/// lead with an ordinary word intact.
fn strip_leading_keyword(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(first) = trimmed.split_whitespace().next() else {
        return trimmed;
    };
    let first_lower = first.to_lowercase();
    let known = INFLOW_KEYWORDS
        .iter()
        .chain(OUTFLOW_KEYWORDS)
        .chain(PIX_KEYWORDS);
    if known.into_iter().any(|k| first_lower.starts_with(k)) {
        trimmed[first.len()..].trim_start()
    } else {
        trimmed
    }
}

/// Split `remainder` on the literal " em " delimiter (case-insensitive):
/// before is the description, after is an explicit category override with
/// its first letter upper-cased.
fn split_category(remainder: &str) -> (String, Option<String>) {
    match CATEGORY_DELIM_RE.find(remainder) {
        Some(delim) => {
            let description = remainder[..delim.start()].trim().to_string();
            let category = capitalize(remainder[delim.end()..].trim());
            (description, Some(category))
        }
        None => (remainder.trim().to_string(), None),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
