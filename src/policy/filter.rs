// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Query Filter Translation
//!
//! Turns a list endpoint's query string into a typed [`QueryFilter`] plus the
//! residual `select` / `sort` / `page` / `limit` directives.
//!
//! ## Query surface
//!
//! | Query string | Filter document |
//! |--------------|-----------------|
//! | `category=banquet` | `{"category": "banquet"}` |
//! | `price[gte]=10` | `{"price": {"$gte": 10}}` |
//! | `city[in]=Lahore,Karachi` | `{"city": {"$in": ["Lahore", "Karachi"]}}` |
//! | `location[city]=Lahore` | `{"location.city": "Lahore"}` |
//! | `owner=current` | `{"owner": "<acting owner id>"}` |
//!
//! Operators are recognised only as bracket suffixes, so a field literally
//! named `gte` stays a plain field.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::DateTime;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::pagination::PageRequest;
use super::{PolicyError, PolicyResult};
use crate::auth::Principal;

/// Sort applied when the client gives none.
const DEFAULT_SORT: &str = "-createdAt";

/// Comparison operators accepted as bracket suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparisonOp {
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl ComparisonOp {
    /// Parse a bracket suffix (`gte` in `price[gte]`).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    /// Key used in the document form.
    pub fn document_key(&self) -> &'static str {
        match self {
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::In => "$in",
        }
    }

    pub fn from_document_key(key: &str) -> Option<Self> {
        key.strip_prefix('$').and_then(Self::from_suffix)
    }
}

/// Condition on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(Value),
    /// Every listed comparison must hold.
    Compare(BTreeMap<ComparisonOp, Value>),
}

impl Condition {
    fn to_document(&self) -> Value {
        match self {
            Condition::Equals(value) => value.clone(),
            Condition::Compare(ops) => Value::Object(
                ops.iter()
                    .map(|(op, value)| (op.document_key().to_string(), value.clone()))
                    .collect(),
            ),
        }
    }

    fn matches(&self, actual: Option<&Value>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self {
            Condition::Equals(expected) => equals_or_contains(actual, expected),
            Condition::Compare(ops) => ops.iter().all(|(op, expected)| match op {
                ComparisonOp::In => expected
                    .as_array()
                    .is_some_and(|options| options.iter().any(|o| equals_or_contains(actual, o))),
                ComparisonOp::Gt => compare(actual, expected) == Some(Ordering::Greater),
                ComparisonOp::Gte => matches!(
                    compare(actual, expected),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                ComparisonOp::Lt => compare(actual, expected) == Some(Ordering::Less),
                ComparisonOp::Lte => matches!(
                    compare(actual, expected),
                    Some(Ordering::Less | Ordering::Equal)
                ),
            }),
        }
    }
}

/// Typed database filter: field path to condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    fields: BTreeMap<String, Condition>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.fields.get(field)
    }

    /// Add an equality condition, replacing any existing one on the field.
    pub fn with_equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .insert(field.into(), Condition::Equals(value.into()));
        self
    }

    fn add_equals(&mut self, field: String, value: Value) -> PolicyResult<()> {
        if self.fields.contains_key(&field) {
            return Err(PolicyError::InvalidQuery(format!(
                "Conflicting conditions for field '{field}'"
            )));
        }
        self.fields.insert(field, Condition::Equals(value));
        Ok(())
    }

    fn add_comparison(
        &mut self,
        field: String,
        op: ComparisonOp,
        value: Value,
    ) -> PolicyResult<()> {
        let entry = self
            .fields
            .entry(field.clone())
            .or_insert_with(|| Condition::Compare(BTreeMap::new()));
        match entry {
            Condition::Compare(ops) if !ops.contains_key(&op) => {
                ops.insert(op, value);
                Ok(())
            }
            _ => Err(PolicyError::InvalidQuery(format!(
                "Conflicting conditions for field '{field}'"
            ))),
        }
    }

    /// Mongo-style document form.
    pub fn to_document(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(field, condition)| (field.clone(), condition.to_document()))
                .collect(),
        )
    }

    /// Parse the document form.
    ///
    /// An object value whose keys are all `$`-prefixed is a comparison;
    /// anything else is an equality.
    pub fn from_document(document: &Value) -> PolicyResult<Self> {
        let object = document
            .as_object()
            .ok_or_else(|| PolicyError::InvalidQuery("Filter must be an object".to_string()))?;

        let mut filter = Self::new();
        for (field, value) in object {
            match value {
                Value::Object(ops) if !ops.is_empty() && ops.keys().all(|k| k.starts_with('$')) => {
                    for (key, operand) in ops {
                        let op = ComparisonOp::from_document_key(key).ok_or_else(|| {
                            PolicyError::InvalidQuery(format!("Unknown operator '{key}'"))
                        })?;
                        filter.add_comparison(field.clone(), op, operand.clone())?;
                    }
                }
                other => filter.add_equals(field.clone(), other.clone())?,
            }
        }
        Ok(filter)
    }

    /// Whether a document satisfies every condition.
    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(path, condition)| condition.matches(lookup(document, path)))
    }
}

impl Serialize for QueryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QueryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Value::deserialize(deserializer)?;
        QueryFilter::from_document(&document).map_err(de::Error::custom)
    }
}

/// One sort key; `-field` sorts descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.strip_prefix('-') {
                Some(field) => SortKey {
                    field: field.to_string(),
                    descending: true,
                },
                None => SortKey {
                    field: part.to_string(),
                    descending: false,
                },
            })
            .collect()
    }
}

/// A translated list query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: QueryFilter,
    /// Fields to keep; `None` keeps everything.
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self, default_limit: u64, max_limit: u64) -> PageRequest {
        PageRequest::parse(
            self.page.as_deref(),
            self.limit.as_deref(),
            default_limit,
            max_limit,
        )
    }

    /// Order documents by the sort keys. Ties keep their incoming order.
    pub fn sort_documents(&self, documents: &mut [Value]) {
        documents.sort_by(|a, b| {
            self.sort
                .iter()
                .map(|key| {
                    let ordering = order_values(lookup(a, &key.field), lookup(b, &key.field));
                    if key.descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Apply `select`, always keeping `_id`.
    pub fn project(&self, document: Value) -> Value {
        let Some(fields) = &self.select else {
            return document;
        };
        match document {
            Value::Object(mut object) => {
                let mut projected = Map::new();
                if let Some(id) = object.remove("_id") {
                    projected.insert("_id".to_string(), id);
                }
                for field in fields {
                    if let Some(value) = object.remove(field) {
                        projected.insert(field.clone(), value);
                    }
                }
                Value::Object(projected)
            }
            other => other,
        }
    }
}

/// How a listing is scoped when the caller names no owner or venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRule {
    /// Only what the query says.
    Explicit,
    /// Authenticated callers see their own (acting owner's) records.
    ImplicitOwner,
}

/// Outcome of translation.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    Query(ListQuery),
    /// The query cannot match anything for this caller.
    EmptyResult,
}

/// Translate raw query pairs for a list endpoint.
pub fn translate(
    raw: &[(String, String)],
    principal: &Principal,
    scope: ScopeRule,
) -> PolicyResult<Translation> {
    let mut filter = QueryFilter::new();
    let mut select = None;
    let mut sort = None;
    let mut page = None;
    let mut limit = None;

    for (key, value) in raw {
        match key.as_str() {
            "select" => {
                select = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
                continue;
            }
            "sort" => {
                sort = Some(SortKey::parse_list(value));
                continue;
            }
            "page" => {
                page = Some(value.clone());
                continue;
            }
            "limit" => {
                limit = Some(value.clone());
                continue;
            }
            _ => {}
        }
        let (path, op) = parse_key(key)?;
        if path == "owner" && op.is_none() && value == "current" {
            match principal.acting_owner_id() {
                Some(owner) => filter.add_equals(path, Value::String(owner.to_string()))?,
                None => return Ok(Translation::EmptyResult),
            }
            continue;
        }

        match op {
            Some(ComparisonOp::In) => {
                let options = value.split(',').map(|v| coerce(v.trim())).collect();
                filter.add_comparison(path, ComparisonOp::In, Value::Array(options))?;
            }
            Some(op) => filter.add_comparison(path, op, coerce(value))?,
            None => filter.add_equals(path, coerce(value))?,
        }
    }

    if scope == ScopeRule::ImplicitOwner
        && !filter.contains_field("owner")
        && !filter.contains_field("venue")
    {
        if let Some(owner) = principal.acting_owner_id() {
            filter.add_equals("owner".to_string(), Value::String(owner.to_string()))?;
        }
    }

    let sort = match sort {
        Some(keys) if !keys.is_empty() => keys,
        _ => SortKey::parse_list(DEFAULT_SORT),
    };

    Ok(Translation::Query(ListQuery {
        filter,
        select,
        sort,
        page,
        limit,
    }))
}

/// Split `a[b][gte]` into the dotted path `a.b` and an optional operator.
fn parse_key(key: &str) -> PolicyResult<(String, Option<ComparisonOp>)> {
    let invalid = || PolicyError::InvalidQuery(format!("Invalid query parameter '{key}'"));

    let (head, mut rest) = match key.find('[') {
        Some(index) => (&key[..index], &key[index..]),
        None => (key, ""),
    };
    if head.is_empty() || head.starts_with('$') {
        return Err(invalid());
    }

    let mut segments = vec![head.to_string()];
    while !rest.is_empty() {
        let close = rest.find(']').ok_or_else(invalid)?;
        if !rest.starts_with('[') || close < 2 {
            return Err(invalid());
        }
        segments.push(rest[1..close].to_string());
        rest = &rest[close + 1..];
    }

    let op = if segments.len() > 1 {
        segments
            .last()
            .and_then(|last| ComparisonOp::from_suffix(last))
    } else {
        None
    };
    if op.is_some() {
        segments.pop();
    }
    if segments.iter().any(|s| s.starts_with('$') || s.contains('.')) {
        return Err(invalid());
    }

    Ok((segments.join("."), op))
}

/// Coerce a query string value to the JSON type it spells.
fn coerce(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if raw.chars().any(|c| c.is_ascii_digit()) && !raw.chars().any(char::is_alphabetic) {
        if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

/// Resolve a dotted path inside a document.
fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

/// Equality with array containment on the document side.
fn equals_or_contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) if !expected.is_array() => {
            items.iter().any(|item| loosely_equal(item, expected))
        }
        _ => loosely_equal(actual, expected),
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.parse::<f64>().ok() == n.as_f64()
        }
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            // Timestamps carry a variable number of fractional digits.
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => Some(x.cmp(&y)),
                _ => Some(x.cmp(y)),
            }
        }
        _ => None,
    }
}

/// Total order for sorting: missing < null < bool < number < string.
fn order_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x @ Value::Number(_)), Some(y @ Value::Number(_)))
        | (Some(x @ Value::String(_)), Some(y @ Value::String(_))) => {
            compare(x, y).unwrap_or(Ordering::Equal)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::{StaffRole, UserRole};
    use serde_json::json;
    use uuid::Uuid;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn query(raw: &[(&str, &str)], principal: &Principal, scope: ScopeRule) -> ListQuery {
        match translate(&pairs(raw), principal, scope).unwrap() {
            Translation::Query(query) => query,
            Translation::EmptyResult => panic!("expected a query"),
        }
    }

    fn owner() -> Principal {
        Principal::Owner {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        }
    }

    #[test]
    fn operator_suffix_becomes_comparison_and_round_trips() {
        let q = query(&[("price[gte]", "10")], &Principal::Anonymous, ScopeRule::Explicit);
        let document = q.filter.to_document();
        assert_eq!(document, json!({"price": {"$gte": 10}}));

        let parsed = QueryFilter::from_document(&document).unwrap();
        assert_eq!(parsed, q.filter);
    }

    #[test]
    fn plain_fields_are_untouched() {
        let q = query(&[("category", "banquet")], &Principal::Anonymous, ScopeRule::Explicit);
        assert_eq!(q.filter.to_document(), json!({"category": "banquet"}));
    }

    #[test]
    fn field_named_like_an_operator_stays_plain() {
        let q = query(&[("gte", "5")], &Principal::Anonymous, ScopeRule::Explicit);
        assert_eq!(q.filter.to_document(), json!({"gte": 5}));
    }

    #[test]
    fn reserved_keys_are_stripped() {
        let q = query(
            &[
                ("select", "name,city"),
                ("sort", "-capacity,name"),
                ("page", "2"),
                ("limit", "5"),
                ("city", "Lahore"),
            ],
            &Principal::Anonymous,
            ScopeRule::Explicit,
        );
        assert_eq!(q.filter.to_document(), json!({"city": "Lahore"}));
        assert_eq!(q.select, Some(vec!["name".to_string(), "city".to_string()]));
        assert_eq!(
            q.sort[0],
            SortKey {
                field: "capacity".into(),
                descending: true
            }
        );
        assert_eq!(
            q.sort[1],
            SortKey {
                field: "name".into(),
                descending: false
            }
        );
        assert_eq!(q.page.as_deref(), Some("2"));
        assert_eq!(q.limit.as_deref(), Some("5"));
    }

    #[test]
    fn default_sort_is_newest_first() {
        let q = query(&[], &Principal::Anonymous, ScopeRule::Explicit);
        assert_eq!(
            q.sort,
            vec![SortKey {
                field: "createdAt".into(),
                descending: true
            }]
        );
    }

    #[test]
    fn in_operator_splits_and_coerces() {
        let q = query(&[("capacity[in]", "50,100")], &Principal::Anonymous, ScopeRule::Explicit);
        assert_eq!(q.filter.to_document(), json!({"capacity": {"$in": [50, 100]}}));
    }

    #[test]
    fn nested_bracket_key_becomes_dotted_path() {
        let q = query(
            &[("location[city]", "Lahore"), ("location[rating][gt]", "4.5")],
            &Principal::Anonymous,
            ScopeRule::Explicit,
        );
        assert_eq!(
            q.filter.to_document(),
            json!({"location.city": "Lahore", "location.rating": {"$gt": 4.5}})
        );
    }

    #[test]
    fn owner_current_resolves_to_acting_owner() {
        let principal = owner();
        let q = query(&[("owner", "current")], &principal, ScopeRule::Explicit);
        let expected = principal.acting_owner_id().unwrap().to_string();
        assert_eq!(q.filter.to_document(), json!({"owner": expected}));

        let employer = Uuid::new_v4();
        let staff = Principal::Staff {
            staff_id: Uuid::new_v4(),
            owner_id: employer,
            role: StaffRole::Host,
            permissions: StaffRole::Host.permissions(),
            venues: vec![],
        };
        let q = query(&[("owner", "current")], &staff, ScopeRule::Explicit);
        assert_eq!(q.filter.to_document(), json!({"owner": employer.to_string()}));
    }

    #[test]
    fn anonymous_owner_current_short_circuits() {
        let result = translate(
            &pairs(&[("owner", "current")]),
            &Principal::Anonymous,
            ScopeRule::ImplicitOwner,
        )
        .unwrap();
        assert_eq!(result, Translation::EmptyResult);
    }

    #[test]
    fn implicit_scope_adds_owner_for_authenticated_callers() {
        let principal = owner();
        let q = query(&[("city", "Lahore")], &principal, ScopeRule::ImplicitOwner);
        let expected = principal.acting_owner_id().unwrap().to_string();
        assert_eq!(q.filter.to_document(), json!({"city": "Lahore", "owner": expected}));
    }

    #[test]
    fn implicit_scope_skipped_when_venue_or_owner_given() {
        let principal = owner();
        let venue = Uuid::new_v4().to_string();
        let q = query(&[("venue", venue.as_str())], &principal, ScopeRule::ImplicitOwner);
        assert_eq!(q.filter.to_document(), json!({"venue": venue}));

        let q = query(&[], &Principal::Anonymous, ScopeRule::ImplicitOwner);
        assert!(q.filter.is_empty());
    }

    #[test]
    fn conflicting_and_injected_keys_are_rejected() {
        let anon = Principal::Anonymous;
        for raw in [
            vec![("price", "10"), ("price[gte]", "5")],
            vec![("city", "a"), ("city", "b")],
            vec![("$where", "1")],
            vec![("price[$gt]", "1")],
            vec![("price[", "1")],
        ] {
            let result = translate(&pairs(&raw), &anon, ScopeRule::Explicit);
            assert!(matches!(result, Err(PolicyError::InvalidQuery(_))), "{raw:?}");
        }
    }

    #[test]
    fn matching_numbers_strings_and_arrays() {
        let doc = json!({
            "name": "Skyline",
            "capacity": 120,
            "pricePerHead": 35.5,
            "tags": ["rooftop", "garden"],
            "location": {"city": "Lahore"}
        });

        let filter = QueryFilter::from_document(&json!({
            "capacity": {"$gte": 100, "$lt": 200},
            "location.city": "Lahore",
            "tags": "garden"
        }))
        .unwrap();
        assert!(filter.matches(&doc));

        let filter = QueryFilter::from_document(&json!({"pricePerHead": {"$lte": 30}})).unwrap();
        assert!(!filter.matches(&doc));

        let filter = QueryFilter::from_document(&json!({"missing": "x"})).unwrap();
        assert!(!filter.matches(&doc));

        let filter = QueryFilter::from_document(&json!({"capacity": {"$in": [50, 120]}})).unwrap();
        assert!(filter.matches(&doc));
    }

    #[test]
    fn unknown_document_operator_is_rejected() {
        let result = QueryFilter::from_document(&json!({"price": {"$regex": "x"}}));
        assert!(matches!(result, Err(PolicyError::InvalidQuery(_))));
    }

    #[test]
    fn filter_serde_uses_document_form() {
        let filter: QueryFilter = serde_json::from_str(r#"{"price":{"$gt":3}}"#).unwrap();
        assert_eq!(serde_json::to_string(&filter).unwrap(), r#"{"price":{"$gt":3}}"#);
    }

    #[test]
    fn sort_and_project() {
        let q = query(
            &[("sort", "-capacity"), ("select", "name")],
            &Principal::Anonymous,
            ScopeRule::Explicit,
        );
        let mut docs = vec![
            json!({"_id": "a", "name": "A", "capacity": 10}),
            json!({"_id": "b", "name": "B", "capacity": 30}),
            json!({"_id": "c", "name": "C"}),
        ];
        q.sort_documents(&mut docs);
        let ids: Vec<_> = docs.iter().map(|d| d["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["b", "a", "c"]);

        let projected = q.project(docs.remove(0));
        assert_eq!(projected, json!({"_id": "b", "name": "B"}));
    }

    #[test]
    fn coercion() {
        assert_eq!(coerce("42"), json!(42));
        assert_eq!(coerce("-3"), json!(-3));
        assert_eq!(coerce("2.5"), json!(2.5));
        assert_eq!(coerce("true"), json!(true));
        assert_eq!(coerce("inf"), json!("inf"));
        assert_eq!(coerce("Lahore"), json!("Lahore"));
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let q = query(&[("sort", "-createdAt")], &Principal::Anonymous, ScopeRule::Explicit);
        let mut docs = vec![
            json!({"_id": "earlier", "createdAt": "2026-03-01T10:00:00.500Z"}),
            json!({"_id": "later", "createdAt": "2026-03-01T10:00:00.500000001Z"}),
            json!({"_id": "oldest", "createdAt": "2026-02-28T23:59:59Z"}),
        ];
        q.sort_documents(&mut docs);
        let ids: Vec<_> = docs.iter().map(|d| d["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["later", "earlier", "oldest"]);
    }
}
