use std::fmt;
use std::sync::Arc;

use bson::Bson;

use crate::error::PathError;
use crate::path::PropertyPath;

/// Reads one value from an element. `None` means absent.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Option<Bson> + Send + Sync>;

/// Storage type of a scalar member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    Date,
    List(Box<FieldType>),
}

impl FieldType {
    /// Supports eq/neq.
    pub fn is_comparable(&self) -> bool {
        !matches!(self, FieldType::List(_))
    }

    /// Supports lt/lte/gt/gte.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::Int | FieldType::Float | FieldType::Date
        )
    }

    /// Usable as a sort key.
    pub fn is_sortable(&self) -> bool {
        self.is_comparable()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::Date => f.write_str("date"),
            FieldType::List(inner) => write!(f, "list<{inner}>"),
        }
    }
}

/// A record type that can be filtered and sorted by property path.
///
/// Implementations build their schema once and hand out the same instance:
///
/// ```ignore
/// impl Entity for Order {
///     fn schema() -> &'static Schema<Self> {
///         static SCHEMA: OnceLock<Schema<Order>> = OnceLock::new();
///         SCHEMA.get_or_init(|| Schema::<Order>::new("Order").int("id", |o| o.id))
///     }
/// }
/// ```
pub trait Entity: Sized + 'static {
    fn schema() -> &'static Schema<Self>;
}

/// Structural description of `T`: member name to accessor and type.
pub struct Schema<T> {
    name: &'static str,
    fields: Vec<Field<T>>,
}

struct Field<T> {
    name: String,
    kind: FieldKind<T>,
}

enum FieldKind<T> {
    Value { ty: FieldType, get: Accessor<T> },
    /// Members of a nested record, already lifted to read from `T`.
    Nested(Schema<T>),
}

impl<T: 'static> Schema<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Add a member with an explicit type and a possibly absent value.
    pub fn value(mut self, name: &str, ty: FieldType, get: fn(&T) -> Option<Bson>) -> Self {
        self.push_value(name, ty, Arc::new(get));
        self
    }

    pub fn string(mut self, name: &str, get: fn(&T) -> &str) -> Self {
        self.push_value(
            name,
            FieldType::String,
            Arc::new(move |t: &T| Some(Bson::String(get(t).to_string()))),
        );
        self
    }

    pub fn int(mut self, name: &str, get: fn(&T) -> i64) -> Self {
        self.push_value(
            name,
            FieldType::Int,
            Arc::new(move |t: &T| Some(Bson::Int64(get(t)))),
        );
        self
    }

    pub fn float(mut self, name: &str, get: fn(&T) -> f64) -> Self {
        self.push_value(
            name,
            FieldType::Float,
            Arc::new(move |t: &T| Some(Bson::Double(get(t)))),
        );
        self
    }

    pub fn bool(mut self, name: &str, get: fn(&T) -> bool) -> Self {
        self.push_value(
            name,
            FieldType::Bool,
            Arc::new(move |t: &T| Some(Bson::Boolean(get(t)))),
        );
        self
    }

    pub fn date(mut self, name: &str, get: fn(&T) -> bson::DateTime) -> Self {
        self.push_value(
            name,
            FieldType::Date,
            Arc::new(move |t: &T| Some(Bson::DateTime(get(t)))),
        );
        self
    }

    /// Add a nested record. Its members become reachable as `name.member`.
    pub fn nested<U: 'static>(
        mut self,
        name: &str,
        project: fn(&T) -> Option<&U>,
        schema: &Schema<U>,
    ) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            kind: FieldKind::Nested(lift(schema, project)),
        });
        self
    }

    fn push_value(&mut self, name: &str, ty: FieldType, get: Accessor<T>) {
        self.fields.push(Field {
            name: name.to_string(),
            kind: FieldKind::Value { ty, get },
        });
    }
}

impl<T> Schema<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Walk `path` one segment at a time down to a scalar member.
    ///
    /// Internal names match exactly; case folding only applies to external names.
    pub fn resolve(&self, path: &PropertyPath) -> Result<Member<T>, PathError> {
        let (last, parents) = path.segments().split_last().ok_or(PathError::Empty)?;

        let mut schema = self;
        for segment in parents {
            let field = schema.lookup(segment)?;
            match &field.kind {
                FieldKind::Nested(inner) => schema = inner,
                FieldKind::Value { ty, .. } => {
                    return Err(PathError::NotNested {
                        segment: segment.clone(),
                        ty: ty.clone(),
                    });
                }
            }
        }

        match &schema.lookup(last)?.kind {
            FieldKind::Value { ty, get } => Ok(Member {
                path: path.clone(),
                ty: ty.clone(),
                get: Arc::clone(get),
            }),
            FieldKind::Nested(_) => Err(PathError::NotAValue {
                path: path.to_string(),
            }),
        }
    }

    fn lookup(&self, segment: &str) -> Result<&Field<T>, PathError> {
        let field = self.fields.iter().find(|f| f.name == segment);
        field.ok_or_else(|| PathError::UnknownMember {
            owner: self.name.to_string(),
            segment: segment.to_string(),
        })
    }
}

fn lift<T: 'static, U: 'static>(schema: &Schema<U>, project: fn(&T) -> Option<&U>) -> Schema<T> {
    let fields = schema
        .fields
        .iter()
        .map(|field| {
            let kind = match &field.kind {
                FieldKind::Value { ty, get } => {
                    let get = Arc::clone(get);
                    let lifted: Accessor<T> = Arc::new(move |t: &T| project(t).and_then(|u| get(u)));
                    FieldKind::Value {
                        ty: ty.clone(),
                        get: lifted,
                    }
                }
                FieldKind::Nested(inner) => FieldKind::Nested(lift(inner, project)),
            };
            Field {
                name: field.name.clone(),
                kind,
            }
        })
        .collect();
    Schema {
        name: schema.name,
        fields,
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for field in &self.fields {
            match &field.kind {
                FieldKind::Value { ty, .. } => map.entry(&field.name, ty),
                FieldKind::Nested(inner) => map.entry(&field.name, inner),
            };
        }
        map.finish()
    }
}

/// A resolved scalar member: its path, type and accessor.
pub struct Member<T> {
    path: PropertyPath,
    ty: FieldType,
    get: Accessor<T>,
}

impl<T> Member<T> {
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// Read the member. Explicit nulls read as absent.
    pub fn get(&self, item: &T) -> Option<Bson> {
        match (self.get)(item) {
            Some(Bson::Null) | None => None,
            Some(value) => Some(value),
        }
    }
}

impl<T> Clone for Member<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            ty: self.ty.clone(),
            get: Arc::clone(&self.get),
        }
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("path", &self.path)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}
