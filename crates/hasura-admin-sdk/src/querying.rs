//! Operation names, GraphQL variables, and documents for Hasura's
//! auto-generated root fields.
//!
//! Hasura exposes, per table `t`: `t` (list), `t_by_pk`, `t_aggregate`,
//! `insert_t`, `update_t_by_pk` and `delete_t_by_pk`. Everything here is a
//! pure function of its inputs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::HasuraError;
use crate::host::BaseProperty;
use crate::property::Property;
use crate::record::Params;

pub(crate) const TYPENAME_FIELD: &str = "__typename";

const DEFAULT_LIMIT: u64 = 10;

/// A CRUD operation of the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Find,
    FindMany,
    FindOne,
    Create,
    Update,
    Delete,
    Count,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::FindMany => "findMany",
            Self::FindOne => "findOne",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Count => "count",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

impl FromStr for Operation {
    type Err = HasuraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "find" => Ok(Self::Find),
            "findMany" => Ok(Self::FindMany),
            "findOne" => Ok(Self::FindOne),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "count" => Ok(Self::Count),
            other => Err(HasuraError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root field name of `operation` on `resource_name`. Also the key of the
/// payload in the response `data`.
pub fn operation_name(resource_name: &str, operation: Operation) -> String {
    match operation {
        Operation::Find | Operation::FindMany => resource_name.to_string(),
        Operation::FindOne => format!("{}_by_pk", resource_name),
        Operation::Create => format!("insert_{}", resource_name),
        Operation::Update => format!("update_{}_by_pk", resource_name),
        Operation::Delete => format!("delete_{}_by_pk", resource_name),
        Operation::Count => format!("{}_aggregate", resource_name),
    }
}

/// [`operation_name`] for an operation kind given by name.
pub fn query_or_mutation_name(resource_name: &str, operation: &str) -> Result<String, HasuraError> {
    Ok(operation_name(resource_name, operation.parse()?))
}

/// A typed GraphQL variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub type_name: String,
    pub value: Value,
}

impl Variable {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value,
        }
    }
}

/// Ordered set of variables for one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(Vec<Variable>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, variable: Variable) {
        self.0.push(variable);
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.0.iter().find(|v| v.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.0.iter()
    }

    /// The JSON `variables` object sent with the document.
    pub fn values(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect();
        Value::Object(map)
    }

    /// `$limit: Int, $where: person_bool_exp`
    pub fn declarations(&self) -> String {
        self.0
            .iter()
            .map(|v| format!("${}: {}", v.name, v.type_name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `limit: $limit, where: $where`
    pub fn arguments(&self) -> String {
        self.0
            .iter()
            .map(|v| format!("{}: ${}", v.name, v.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A filter entry from the host's filter form.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column the predicate applies to.
    pub path: String,
    /// Property metadata. Filters without it are not sent.
    pub property: Option<Property>,
    pub value: Value,
}

impl Filter {
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            property: None,
            value,
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = Some(property);
        self
    }
}

/// Sort direction of a list query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = HasuraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(HasuraError::InvalidOptions(format!(
                "Unknown sort direction '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    pub sort_by: Option<String>,
    pub direction: SortDirection,
}

impl Sort {
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            sort_by: Some(field.into()),
            direction,
        }
    }
}

/// Pagination and ordering of a list query. `None` leaves the value to the
/// backend's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub sort: Option<Sort>,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            offset: Some(0),
            sort: None,
        }
    }
}

impl FindOptions {
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Normalize a date or timestamp to `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Date-only values are taken as midnight UTC and zone-less timestamps as
/// UTC. Anything unparseable is passed through for the backend to reject.
pub fn to_utc_timestamp(value: &Value) -> Value {
    let Some(text) = value.as_str() else {
        return value.clone();
    };
    let parsed = DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        });
    match parsed {
        Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => value.clone(),
    }
}

/// Comparison expression for one filter value, or `None` if the value is
/// empty.
///
/// Arrays become `_in`, `{from, to}` objects on date properties become a
/// `_gte`/`_lte` range, anything else `_eq`.
pub fn shape_filter_value(value: &Value, property: Option<&Property>) -> Option<Value> {
    if is_empty_value(value) {
        return None;
    }
    if value.is_array() {
        return Some(json!({ "_in": value }));
    }
    let is_temporal = property.is_some_and(|p| p.property_type().is_temporal());
    if let (Value::Object(range), true) = (value, is_temporal) {
        let mut predicate = Map::new();
        if let Some(from) = range.get("from").filter(|v| !is_empty_value(v)) {
            predicate.insert("_gte".to_string(), to_utc_timestamp(from));
        }
        if let Some(to) = range.get("to").filter(|v| !is_empty_value(v)) {
            predicate.insert("_lte".to_string(), to_utc_timestamp(to));
        }
        if predicate.is_empty() {
            return None;
        }
        return Some(Value::Object(predicate));
    }
    Some(json!({ "_eq": value }))
}

/// Build a `bool_exp` object from filters, silently dropping entries with
/// no path, no property or an empty value.
pub fn where_from_filters(filters: &[Filter]) -> Map<String, Value> {
    filters
        .iter()
        .filter(|f| !f.path.is_empty())
        .filter_map(|f| {
            let property = f.property.as_ref()?;
            shape_filter_value(&f.value, Some(property)).map(|p| (f.path.clone(), p))
        })
        .collect()
}

fn where_variable(resource_name: &str, filters: &[Filter]) -> Option<Variable> {
    let where_args = where_from_filters(filters);
    if where_args.is_empty() {
        return None;
    }
    Some(Variable::new(
        "where",
        format!("{}_bool_exp", resource_name),
        Value::Object(where_args),
    ))
}

/// Variables of a list query.
pub fn find_variables(resource_name: &str, filters: &[Filter], options: &FindOptions) -> Variables {
    let mut variables = Variables::new();

    if let Some(limit) = options.limit {
        variables.push(Variable::new("limit", "Int", json!(limit)));
    }
    if let Some(offset) = options.offset {
        variables.push(Variable::new("offset", "Int", json!(offset)));
    }
    if let Some(Sort {
        sort_by: Some(sort_by),
        direction,
    }) = &options.sort
    {
        let mut ordering = Map::new();
        ordering.insert(sort_by.clone(), json!(direction.as_str()));
        variables.push(Variable::new(
            "order_by",
            format!("[{}_order_by!]", resource_name),
            json!([ordering]),
        ));
    }
    if let Some(where_var) = where_variable(resource_name, filters) {
        variables.push(where_var);
    }

    variables
}

/// Coerce a host-side id string to the primary key's scalar.
///
/// Only `Int` and `Float` reject string input; Hasura's `bigint`, `numeric`
/// and `uuid` accept strings as they are.
pub fn coerce_id(id: &str, pk_type: &str) -> Value {
    let scalar = pk_type.trim_start_matches('[').trim_end_matches(['!', ']']);
    match scalar {
        "Int" => id.parse::<i64>().map(Value::from).unwrap_or_else(|_| json!(id)),
        "Float" => id
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| json!(id)),
        _ => json!(id),
    }
}

/// Variables of a primary key lookup. `pk_type` is the non-null GraphQL
/// type of the key column, e.g. `bigint!`.
pub fn find_one_variables(id: &str, pk_property: &str, pk_type: &str) -> Variables {
    let mut variables = Variables::new();
    variables.push(Variable::new(pk_property, pk_type, coerce_id(id, pk_type)));
    variables
}

/// Variables of a multi-id lookup: an `_in` filter on the primary key.
///
/// The predicate is always sent, even for an empty id list, so that no ids
/// match no rows.
pub fn find_many_variables(
    ids: &[String],
    pk_property: &str,
    pk_type: &str,
    resource_name: &str,
) -> Variables {
    let values: Vec<Value> = ids.iter().map(|id| coerce_id(id, pk_type)).collect();
    let mut where_args = Map::new();
    where_args.insert(pk_property.to_string(), json!({ "_in": values }));

    let mut variables = Variables::new();
    variables.push(Variable::new(
        "where",
        format!("{}_bool_exp", resource_name),
        Value::Object(where_args),
    ));
    variables
}

/// Variables of an insert: the params as a one-element `objects` array.
pub fn create_variables(params: Params, resource_name: &str) -> Variables {
    let mut variables = Variables::new();
    variables.push(Variable::new(
        "objects",
        format!("[{}_insert_input!]!", resource_name),
        json!([params]),
    ));
    variables
}

/// Variables of a by-pk delete. Same shape as [`find_one_variables`].
pub fn delete_variables(id: &str, pk_property: &str, pk_type: &str) -> Variables {
    find_one_variables(id, pk_property, pk_type)
}

/// Variables of a by-pk update. `__typename` never reaches `_set`.
pub fn update_variables(
    id: &str,
    mut params: Params,
    pk_property: &str,
    pk_type: &str,
    resource_name: &str,
) -> Variables {
    params.remove(TYPENAME_FIELD);

    let mut pk_columns = Map::new();
    pk_columns.insert(pk_property.to_string(), coerce_id(id, pk_type));

    let mut variables = Variables::new();
    variables.push(Variable::new(
        "pk_columns",
        format!("{}_pk_columns_input!", resource_name),
        Value::Object(pk_columns),
    ));
    variables.push(Variable::new(
        "_set",
        format!("{}_set_input!", resource_name),
        Value::Object(params),
    ));
    variables
}

/// Variables of an aggregate count.
pub fn count_variables(resource_name: &str, filters: &[Filter]) -> Variables {
    let mut variables = Variables::new();
    if let Some(where_var) = where_variable(resource_name, filters) {
        variables.push(where_var);
    }
    variables
}

fn render_document(kind: &str, name: &str, variables: &Variables, selection: &str) -> String {
    let (declarations, arguments) = if variables.is_empty() {
        (String::new(), String::new())
    } else {
        (
            format!("({})", variables.declarations()),
            format!("({})", variables.arguments()),
        )
    };
    format!(
        "{} {}{} {{ {}{} {{ {} }} }}",
        kind, name, declarations, name, arguments, selection
    )
}

/// `query name($v: T) { name(v: $v) { selection } }`. The operation is
/// named after its root field.
pub fn query_document(name: &str, variables: &Variables, selection: &str) -> String {
    render_document("query", name, variables, selection)
}

/// Mutation counterpart of [`query_document`].
pub fn mutation_document(name: &str, variables: &Variables, selection: &str) -> String {
    render_document("mutation", name, variables, selection)
}

/// Drop the `__typename` wire field from a row.
pub fn strip_typename(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            map.remove(TYPENAME_FIELD);
            Value::Object(map)
        }
        other => other,
    }
}
