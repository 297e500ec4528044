//! Ordered-rule intent classification.
//!
//! Rules are tried top to bottom and the first match wins. Order matters:
//! arithmetic-looking text and asset vocabulary are disjoint, but a query
//! like `"price of bitcoin price"` still resolves by rule order alone, not
//! by any longest-match heuristic.

use crate::asset::Asset;
use crate::error::EngineError;
use crate::query::Query;
use tracing::debug;

/// The classified purpose of a query. Produced exactly once per [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Help,
    /// Carries the raw (trimmed, un-normalized) text so the evaluator
    /// re-parses the exact characters the user typed.
    Arithmetic(String),
    PriceLookup(Asset),
    Conversion {
        amount: f64,
        from: Asset,
        to: Asset,
    },
    Unrecognized(String),
}

const CONNECTORS: &[&str] = &["to", "in", "into"];

/// Classifies a tokenized query. Fails only when an asset was grammatically
/// required and the token in that slot is not in the alias table.
pub fn classify(query: &Query) -> Result<Intent, EngineError> {
    // Rule 1: bare "help".
    if query.tokens.len() == 1 && query.tokens[0] == "help" {
        return Ok(Intent::Help);
    }

    // Rule 2: pure arithmetic character set, checked on the normalized text
    // (already de-symboled, so "$100" qualifies) while the evaluator gets
    // the exact characters the user typed minus those symbols.
    if looks_arithmetic(&query.normalized) {
        return Ok(Intent::Arithmetic(query.expression_text()));
    }

    let assets: Vec<(usize, Asset)> = query
        .tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| Asset::resolve(t).map(|a| (i, a)))
        .collect();

    // Rule 3: price lookup. One alias plus a "price"/"of" marker.
    let mentions_price = query.tokens.iter().any(|t| t == "price" || t == "of");
    if mentions_price {
        match assets.as_slice() {
            [(_, asset)] => {
                debug!(asset = %asset, "Classified as price lookup");
                return Ok(Intent::PriceLookup(*asset));
            }
            [] => {
                // "price of <token>" or "<token> price" with a token that is
                // not in the alias table.
                if let Some(token) = expected_asset_token(&query.tokens) {
                    return Err(EngineError::UnknownAsset(token));
                }
            }
            _ => {} // two aliases fall through to the conversion rule
        }
    }

    // Rule 4: conversion. Leading amount, alias, connector, alias.
    if let Some(intent) = classify_conversion(query, &assets)? {
        return Ok(intent);
    }

    Ok(Intent::Unrecognized(query.raw.clone()))
}

fn looks_arithmetic(normalized: &str) -> bool {
    !normalized.is_empty()
        && normalized.contains(|c: char| c.is_ascii_digit())
        && normalized
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-*/^().".contains(c))
}

/// Finds the token sitting in an asset slot of a price query, if any:
/// the word after "price of", or the word before a trailing "price".
fn expected_asset_token(tokens: &[String]) -> Option<String> {
    if let Some(i) = tokens.iter().position(|t| t == "price") {
        if tokens.get(i + 1).is_some_and(|t| t == "of") {
            if let Some(token) = tokens.get(i + 2) {
                return Some(token.clone());
            }
        }
        if i > 0 && i == tokens.len() - 1 {
            return Some(tokens[i - 1].clone());
        }
    }
    None
}

fn classify_conversion(
    query: &Query,
    assets: &[(usize, Asset)],
) -> Result<Option<Intent>, EngineError> {
    // f64::parse accepts "inf"/"nan"; those are not amounts.
    let Some(amount) = query
        .tokens
        .first()
        .and_then(|t| t.parse::<f64>().ok())
        .filter(|v| v.is_finite())
    else {
        return Ok(None);
    };

    let Some(connector_idx) = query
        .tokens
        .iter()
        .position(|t| CONNECTORS.contains(&t.as_str()))
    else {
        return Ok(None);
    };

    let Some(&(_, from)) = assets
        .iter()
        .find(|(i, _)| *i > 0 && *i < connector_idx)
    else {
        return Ok(None);
    };

    let Some(target) = query.tokens.get(connector_idx + 1) else {
        return Ok(None);
    };
    match Asset::resolve(target) {
        Some(to) => {
            debug!(amount, from = %from, to = %to, "Classified as conversion");
            Ok(Some(Intent::Conversion { amount, from, to }))
        }
        // The left leg parsed as a conversion, so an asset is expected here.
        None => Err(EngineError::UnknownAsset(target.clone())),
    }
}
