#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use sift_engine::{
    Bson, DateTime, Entity, FieldType, MappingTable, MemoryQuery, QueryComposer, Resource,
    Schema, TypeMap,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// ── Fixture model ───────────────────────────────────────────────

pub struct Address {
    pub city: String,
    pub country: String,
}

pub struct Customer {
    pub name: String,
    pub address: Option<Address>,
}

pub struct Order {
    pub id: i64,
    pub number: String,
    pub placed: DateTime,
    pub total: f64,
    pub paid: bool,
    pub customer: Customer,
    pub tags: Vec<String>,
    pub discount: Option<f64>,
}

impl Entity for Order {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Order>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let address = Schema::<Address>::new("Address")
                .string("city", |a| &a.city)
                .string("country", |a| &a.country);
            let customer = Schema::<Customer>::new("Customer")
                .string("name", |c| &c.name)
                .nested("address", |c| c.address.as_ref(), &address);

            Schema::<Order>::new("Order")
                .int("id", |o| o.id)
                .string("number", |o| &o.number)
                .date("placed", |o| o.placed)
                .float("total", |o| o.total)
                .bool("paid", |o| o.paid)
                .value("tags", FieldType::List(Box::new(FieldType::String)), |o| {
                    Some(Bson::Array(o.tags.iter().cloned().map(Bson::String).collect()))
                })
                .value("discount", FieldType::Float, |o| o.discount.map(Bson::Double))
                .nested("customer", |o| Some(&o.customer), &customer)
        })
    }
}

/// Client-facing view of an order.
pub struct OrderResource;

impl Resource for OrderResource {
    fn name() -> &'static str {
        "OrderResource"
    }

    fn properties() -> &'static [&'static str] {
        &[
            "id",
            "number",
            "placed",
            "total",
            "totalRaw",
            "paid",
            "customerName",
            "city",
            "country",
            "tags",
            "discount",
            "summary",
            "loopA",
            "loopB",
            "broken",
            "badExpression",
            "hop1",
            "hop2",
            "hop3",
        ]
    }
}

pub fn mappings() -> MappingTable {
    MappingTable::new().with(
        TypeMap::new::<Order, OrderResource>()
            .convention("id")
            .convention("number")
            .convention("placed")
            .convention("paid")
            .convention("tags")
            .convention("discount")
            .member("total", "o => o.lineTotals")
            .redirect("total", "totalRaw")
            .member("totalRaw", "o => o.total")
            .member("customerName", "o => o.customer.name")
            .member("city", "|o| o.customer.address.city")
            .member("country", "customer.address.country")
            .redirect("loopA", "loopB")
            .redirect("loopB", "loopA")
            .redirect("broken", "missing")
            .member("badExpression", "o => o..number")
            .redirect("hop1", "hop2")
            .redirect("hop2", "hop3")
            .redirect("hop3", "number"),
    )
}

pub fn composer() -> QueryComposer<MappingTable> {
    QueryComposer::new(mappings())
}

fn order(
    id: i64,
    number: &str,
    total: f64,
    paid: bool,
    name: &str,
    address: Option<(&str, &str)>,
) -> Order {
    Order {
        id,
        number: number.to_string(),
        placed: DateTime::parse_rfc3339_str(format!("2024-01-{id:02}T09:00:00Z")).unwrap(),
        total,
        paid,
        customer: Customer {
            name: name.to_string(),
            address: address.map(|(city, country)| Address {
                city: city.to_string(),
                country: country.to_string(),
            }),
        },
        tags: Vec::new(),
        discount: None,
    }
}

/// Ten orders, placed one per day from 2024-01-01 in id order.
pub fn orders() -> Vec<Order> {
    let mut orders = vec![
        order(1, "SO-1001", 120.0, true, "Ada", Some(("Austin", "US"))),
        order(2, "SO-1002", 45.5, false, "Bo", Some(("Boston", "US"))),
        order(3, "SO-1003", 300.0, true, "Cy", Some(("Berlin", "DE"))),
        order(4, "SO-1004", 45.5, true, "Di", Some(("Austin", "US"))),
        order(5, "SO-1005", 80.0, false, "Ed", Some(("Paris", "FR"))),
        order(6, "SO-1006", 120.0, true, "Flo", Some(("Berlin", "DE"))),
        order(7, "SO-1007", 15.0, false, "Gus", None),
        order(8, "XO-1008", 220.0, true, "Hal", Some(("Austin", "US"))),
        order(9, "SO-1009", 80.0, true, "Ivy", Some(("Lyon", "FR"))),
        order(10, "SO-1010", 120.0, false, "Jo", Some(("Boston", "US"))),
    ];
    orders[0].tags = vec!["rush".into()];
    orders[3].tags = vec!["gift".into()];
    orders[1].discount = Some(5.0);
    orders[4].discount = Some(10.0);
    orders
}

pub fn source() -> MemoryQuery<Order> {
    MemoryQuery::new(orders())
}

pub fn ids(query: &MemoryQuery<Order>) -> Vec<i64> {
    query.execute().iter().map(|o| o.id).collect()
}

// ── Log capture ─────────────────────────────────────────────────

/// One recorded tracing event with its fields rendered as strings.
#[derive(Debug, Clone)]
pub struct Captured {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl Captured {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Events describing a dropped clause carry an `event` field.
    pub fn is_dropped_clause(&self) -> bool {
        self.fields.contains_key("event")
    }
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<Captured>>>);

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = Fields::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

#[derive(Default)]
struct Fields(BTreeMap<String, String>);

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

/// Run `f` with a subscriber that records every event emitted on this thread.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Captured>) {
    let layer = Capture::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    let events = layer.0.lock().unwrap().clone();
    (out, events)
}

/// Only the dropped-clause events.
pub fn dropped(events: &[Captured]) -> Vec<&Captured> {
    events.iter().filter(|e| e.is_dropped_clause()).collect()
}
