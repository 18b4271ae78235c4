//! Structured query descriptors and the query builder
//!
//! A [`Query`] describes what to read: a conjunction of field conditions, an
//! ordered sort specification, an optional window and a lock-mode hint.
//! [`Query::compile`] checks it against a record's field list and produces a
//! [`CompiledQuery`] holding the executable filter and comparator.

use super::page::{PageError, Window};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scalar field value used in predicates and sorting
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    /// Ordering between two values of the same type; `None` when the types differ
    /// or either side is `Null`.
    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting: `Null` first, then integers, then text
    fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Int(_) => 1,
                Value::Text(_) => 2,
            }
        }
        self.compare(other)
            .unwrap_or_else(|| rank(self).cmp(&rank(other)))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Comparison operator, one tagged variant per operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Eq(Value),
    Gt(Value),
    Ge(Value),
    Lt(Value),
    Le(Value),
    In(Vec<Value>),
    /// SQL LIKE pattern: `%` matches any run, `_` matches one character
    Like(String),
}

/// A single `field <op> value` comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub op: Op,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Op) -> Self {
        Self {
            field: field.into(),
            op,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Op::Eq(value.into()))
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Op::Gt(value.into()))
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Op::Ge(value.into()))
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Op::Lt(value.into()))
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Op::Le(value.into()))
    }

    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(field, Op::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, Op::Like(pattern.into()))
    }
}

/// Conjunction of conditions; empty matches every row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// Predicate matching every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a condition (AND)
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Resolve field names and compile patterns for `T`
    pub fn compile<T: Fields>(&self) -> Result<CompiledPredicate, QueryError> {
        let conditions = self
            .conditions
            .iter()
            .map(|c| compile_condition::<T>(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompiledPredicate { conditions })
    }
}

impl From<Condition> for Predicate {
    fn from(condition: Condition) -> Self {
        Self::all().and(condition)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(QueryError::InvalidDirection(s.to_string()))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("asc"),
            Direction::Desc => f.write_str("desc"),
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

/// Ordered list of sort keys, applied in declared order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(order: Order) -> Self {
        Self {
            orders: vec![order],
        }
    }

    /// Append a lower-priority key
    pub fn then(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Row-lock hint forwarded to the backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    #[default]
    None,
    Shared,
    Exclusive,
}

/// Full read descriptor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub predicate: Predicate,
    pub sort: Sort,
    pub window: Option<Window>,
    pub lock: LockMode,
}

impl Query {
    /// Query over every row, unsorted, unbounded
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(predicate: impl Into<Predicate>) -> Self {
        Self {
            predicate: predicate.into(),
            ..Self::default()
        }
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.predicate = self.predicate.and(condition);
        self
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.sort = self.sort.then(order);
        self
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }

    pub fn lock(mut self, lock: LockMode) -> Self {
        self.lock = lock;
        self
    }

    /// Validate field names against `T` and build the executable plan
    pub fn compile<T: Fields>(&self) -> Result<CompiledQuery, QueryError> {
        let predicate = self.predicate.compile::<T>()?;
        for order in self.sort.orders() {
            check_field::<T>(&order.field)?;
        }
        if let Some(window) = self.window {
            Window::new(window.offset(), window.limit())?;
        }
        Ok(CompiledQuery {
            predicate,
            orders: self.sort.orders().to_vec(),
            window: self.window,
            lock: self.lock,
            fingerprint: format!("{:?}|{:?}|{:?}", self.predicate, self.sort, self.window),
        })
    }
}

/// Named scalar fields of a record, addressable by queries
pub trait Fields {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// Every field name a query may reference
    const FIELDS: &'static [&'static str];

    /// Current value of `field`; only called with names from `FIELDS`
    fn value(&self, field: &str) -> Value;
}

/// Query validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown field '{field}' on {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("invalid LIKE pattern '{pattern}': {details}")]
    InvalidPattern { pattern: String, details: String },

    #[error("invalid sort direction '{0}', expected asc or desc")]
    InvalidDirection(String),

    #[error(transparent)]
    Window(#[from] PageError),
}

#[derive(Debug, Clone)]
enum Matcher {
    Eq(Value),
    Gt(Value),
    Ge(Value),
    Lt(Value),
    Le(Value),
    In(Vec<Value>),
    Like(Regex),
}

#[derive(Debug, Clone)]
struct CompiledCondition {
    field: String,
    matcher: Matcher,
}

impl CompiledCondition {
    fn matches(&self, value: &Value) -> bool {
        let cmp = |rhs: &Value, accept: fn(Ordering) -> bool| {
            value.compare(rhs).is_some_and(accept)
        };
        match &self.matcher {
            Matcher::Eq(rhs) => cmp(rhs, Ordering::is_eq),
            Matcher::Gt(rhs) => cmp(rhs, Ordering::is_gt),
            Matcher::Ge(rhs) => cmp(rhs, Ordering::is_ge),
            Matcher::Lt(rhs) => cmp(rhs, Ordering::is_lt),
            Matcher::Le(rhs) => cmp(rhs, Ordering::is_le),
            Matcher::In(values) => values
                .iter()
                .any(|rhs| value.compare(rhs) == Some(Ordering::Equal)),
            Matcher::Like(re) => match value {
                Value::Text(text) => re.is_match(text),
                _ => false,
            },
        }
    }
}

/// Executable filter
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    conditions: Vec<CompiledCondition>,
}

impl CompiledPredicate {
    pub fn matches<T: Fields>(&self, row: &T) -> bool {
        self.conditions
            .iter()
            .all(|c| c.matches(&row.value(&c.field)))
    }
}

/// Executable filter, comparator and window
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    predicate: CompiledPredicate,
    orders: Vec<Order>,
    window: Option<Window>,
    lock: LockMode,
    fingerprint: String,
}

impl CompiledQuery {
    pub fn matches<T: Fields>(&self, row: &T) -> bool {
        self.predicate.matches(row)
    }

    /// Multi-key comparator; `Equal` on full ties so a stable sort keeps
    /// insertion order
    pub fn compare<T: Fields>(&self, a: &T, b: &T) -> Ordering {
        for order in &self.orders {
            let ord = a.value(&order.field).sort_cmp(&b.value(&order.field));
            let ord = match order.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn lock(&self) -> LockMode {
        self.lock
    }

    /// Stable key for result caching
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn check_field<T: Fields>(field: &str) -> Result<(), QueryError> {
    if T::FIELDS.contains(&field) {
        Ok(())
    } else {
        Err(QueryError::UnknownField {
            entity: T::ENTITY,
            field: field.to_string(),
        })
    }
}

fn compile_condition<T: Fields>(condition: &Condition) -> Result<CompiledCondition, QueryError> {
    check_field::<T>(&condition.field)?;
    let matcher = match &condition.op {
        Op::Eq(v) => Matcher::Eq(v.clone()),
        Op::Gt(v) => Matcher::Gt(v.clone()),
        Op::Ge(v) => Matcher::Ge(v.clone()),
        Op::Lt(v) => Matcher::Lt(v.clone()),
        Op::Le(v) => Matcher::Le(v.clone()),
        Op::In(vs) => Matcher::In(vs.clone()),
        Op::Like(pattern) => {
            let re = Regex::new(&like_to_regex(pattern)).map_err(|e| QueryError::InvalidPattern {
                pattern: pattern.clone(),
                details: e.to_string(),
            })?;
            Matcher::Like(re)
        }
    };
    Ok(CompiledCondition {
        field: condition.field.clone(),
        matcher,
    })
}

/// Translate a SQL LIKE pattern into an anchored regular expression
fn like_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)^");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}
