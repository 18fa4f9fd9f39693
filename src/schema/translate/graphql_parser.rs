use std::{fs, path::Path};

use arcstr::ArcStr;
use graphql_parser::{
    query::{Directive as ExternalDirective, Type as ExternalType},
    schema::{
        Definition, Document, EnumValue as ExternalEnumValue, Field as ExternalField,
        InputValue as ExternalInputValue, TypeDefinition as ExternalTypeDefinition,
        Value as ExternalValue, parse_schema,
    },
};
use indexmap::IndexMap;
use tracing::trace;

use crate::{
    ast::{InputValue, Type},
    schema::{
        SchemaError,
        meta::{
            Argument, EnumMeta, EnumValue, Field, InputObjectMeta, InterfaceMeta, MetaType,
            ObjectMeta, ScalarMeta, UnionMeta,
        },
        model::SchemaType,
        translate::SchemaTranslator,
    },
};

/// Document type produced by the `graphql-parser` crate.
pub type ExternalDocument<'a> = Document<'a, String>;

/// Builds a [`SchemaType`] out of a `graphql-parser` schema document.
pub struct GraphQLParserTranslator;

impl SchemaTranslator<ExternalDocument<'_>> for GraphQLParserTranslator {
    fn translate_schema(input: &ExternalDocument<'_>) -> Result<SchemaType, SchemaError> {
        let mut types = vec![];
        let (mut query, mut mutation, mut subscription) = (None, None, None);

        for def in &input.definitions {
            match def {
                Definition::SchemaDefinition(schema) => {
                    query = schema.query.as_deref().map(ArcStr::from);
                    mutation = schema.mutation.as_deref().map(ArcStr::from);
                    subscription = schema.subscription.as_deref().map(ArcStr::from);
                }
                Definition::TypeDefinition(ty) => {
                    let meta = Self::translate_meta(ty);
                    trace!(type_name = %meta.name(), "translated type definition");
                    types.push(meta);
                }
                Definition::TypeExtension(_) | Definition::DirectiveDefinition(_) => {
                    trace!("skipped unsupported definition");
                }
            }
        }

        SchemaType::new(types, query, mutation, subscription)
    }
}

impl GraphQLParserTranslator {
    fn translate_meta(input: &ExternalTypeDefinition<'_, String>) -> MetaType {
        match input {
            ExternalTypeDefinition::Scalar(x) => {
                let mut meta = ScalarMeta::new(x.name.as_str());
                if let Some(d) = &x.description {
                    meta = meta.description(d.as_str());
                }
                if let Some(url) = directive_argument(&x.directives, "specifiedBy", "url") {
                    meta = meta.specified_by_url(url);
                }
                meta.into_meta()
            }
            ExternalTypeDefinition::Object(x) => {
                let fields = x.fields.iter().map(Self::translate_field).collect::<Vec<_>>();
                let interfaces = x
                    .implements_interfaces
                    .iter()
                    .map(|i| Type::Named(i.as_str().into()))
                    .collect::<Vec<_>>();
                let mut meta = ObjectMeta::new(x.name.as_str(), &fields).interfaces(&interfaces);
                if let Some(d) = &x.description {
                    meta = meta.description(d.as_str());
                }
                meta.into_meta()
            }
            ExternalTypeDefinition::Interface(x) => {
                let fields = x.fields.iter().map(Self::translate_field).collect::<Vec<_>>();
                let mut meta = InterfaceMeta::new(x.name.as_str(), &fields);
                if let Some(d) = &x.description {
                    meta = meta.description(d.as_str());
                }
                meta.into_meta()
            }
            ExternalTypeDefinition::Union(x) => {
                let members = x
                    .types
                    .iter()
                    .map(|t| Type::Named(t.as_str().into()))
                    .collect::<Vec<_>>();
                let mut meta = UnionMeta::new(x.name.as_str(), &members);
                meta.description = x.description.as_deref().map(ArcStr::from);
                meta.into_meta()
            }
            ExternalTypeDefinition::Enum(x) => {
                let values = x
                    .values
                    .iter()
                    .map(Self::translate_enum_value)
                    .collect::<Vec<_>>();
                let mut meta = EnumMeta::new(x.name.as_str(), &values);
                if let Some(d) = &x.description {
                    meta = meta.description(d.as_str());
                }
                meta.into_meta()
            }
            ExternalTypeDefinition::InputObject(x) => {
                let fields = x
                    .fields
                    .iter()
                    .map(Self::translate_argument)
                    .collect::<Vec<_>>();
                let mut meta = InputObjectMeta::new(x.name.as_str(), &fields);
                if let Some(d) = &x.description {
                    meta = meta.description(d.as_str());
                }
                meta.into_meta()
            }
        }
    }

    fn translate_field(input: &ExternalField<'_, String>) -> Field {
        let mut field = Field::new(input.name.as_str(), Self::translate_type(&input.field_type));
        if let Some(d) = &input.description {
            field = field.description(d.as_str());
        }
        for arg in &input.arguments {
            field = field.argument(Self::translate_argument(arg));
        }
        if let Some(reason) = deprecation(&input.directives) {
            field = field.deprecated(reason);
        }
        field
    }

    fn translate_argument(input: &ExternalInputValue<'_, String>) -> Argument {
        let mut arg = Argument::new(input.name.as_str(), Self::translate_type(&input.value_type));
        if let Some(d) = &input.description {
            arg = arg.description(d.as_str());
        }
        if let Some(v) = &input.default_value {
            arg = arg.default_value(Self::translate_value(v));
        }
        arg
    }

    fn translate_enum_value(input: &ExternalEnumValue<'_, String>) -> EnumValue {
        let mut value = EnumValue::new(input.name.as_str());
        if let Some(d) = &input.description {
            value = value.description(d.as_str());
        }
        if let Some(reason) = deprecation(&input.directives) {
            value = value.deprecated(reason);
        }
        value
    }

    fn translate_type(input: &ExternalType<'_, String>) -> Type {
        match input {
            ExternalType::NamedType(x) => Type::Named(x.as_str().into()),
            ExternalType::ListType(x) => Type::List(Box::new(Self::translate_type(x))),
            ExternalType::NonNullType(x) => Self::translate_type(x).wrap_non_null(),
        }
    }

    /// Default values never contain variables, so these are translated as
    /// `null`.
    fn translate_value(input: &ExternalValue<'_, String>) -> InputValue {
        match input {
            ExternalValue::Null | ExternalValue::Variable(_) => InputValue::Null,
            ExternalValue::Int(n) => n.as_i64().map_or(InputValue::Null, |i| {
                i32::try_from(i).map_or_else(|_| InputValue::scalar(i as f64), InputValue::scalar)
            }),
            ExternalValue::Float(f) => InputValue::scalar(*f),
            ExternalValue::String(s) => InputValue::scalar(s.as_str()),
            ExternalValue::Boolean(b) => InputValue::scalar(*b),
            ExternalValue::Enum(e) => InputValue::enum_value(e),
            ExternalValue::List(l) => InputValue::list(l.iter().map(Self::translate_value).collect()),
            ExternalValue::Object(o) => InputValue::object(
                o.iter()
                    .map(|(k, v)| (k.as_str(), Self::translate_value(v)))
                    .collect::<IndexMap<_, _>>(),
            ),
        }
    }
}

/// Reads the `@deprecated` directive, if present, with its optional reason.
fn deprecation(directives: &[ExternalDirective<'_, String>]) -> Option<Option<ArcStr>> {
    directives
        .iter()
        .find(|d| d.name == "deprecated")
        .map(|_| directive_argument(directives, "deprecated", "reason"))
}

fn directive_argument(
    directives: &[ExternalDirective<'_, String>],
    directive: &str,
    argument: &str,
) -> Option<ArcStr> {
    directives
        .iter()
        .find(|d| d.name == directive)?
        .arguments
        .iter()
        .find_map(|(name, value)| match value {
            ExternalValue::String(s) if name == argument => Some(s.as_str().into()),
            _ => None,
        })
}

impl SchemaType {
    /// Parses a schema out of its GraphQL SDL representation.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Parse`] on a syntax error, or any error of
    /// [`SchemaType::new()`].
    pub fn parse(sdl: &str) -> Result<Self, SchemaError> {
        let doc = parse_schema::<String>(sdl).map_err(|e| SchemaError::Parse(e.to_string()))?;
        GraphQLParserTranslator::translate_schema(&doc)
    }

    /// Reads and parses a GraphQL SDL file.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Io`] if the file can't be read, otherwise the same as
    /// [`SchemaType::parse()`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let sdl = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&sdl)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        ast::InputValue,
        schema::{SchemaError, meta::MetaType, model::SchemaType},
    };

    const SDL: &str = r#"
        schema {
          query: Root
        }

        "An instant in time"
        scalar DateTime @specifiedBy(url: "https://tools.ietf.org/html/rfc3339")

        enum Sortable {
          id
          name
          createdAt @deprecated(reason: "use id")
        }

        input SortInput {
          by: Sortable = id
          desc: Boolean = false
          limit: Int = 10
        }

        interface Node {
          id: ID!
        }

        type User implements Node {
          id: ID!
          name: String @deprecated
          friends(first: Int = 5, sort: SortInput): [User!]!
        }

        union Entity = User

        type Root {
          user(id: ID!): User
          entity: Entity
          createdAt: DateTime
        }
    "#;

    #[test]
    fn translates_sdl() {
        let schema = SchemaType::parse(SDL).expect("valid SDL");

        assert_eq!(schema.query_type_name(), "Root");
        assert!(schema.query_type().is_some());

        let Some(MetaType::Object(user)) = schema.concrete_type_by_name("User") else {
            panic!("`User` is an object");
        };
        assert_eq!(user.interface_names, ["Node"]);
        let names = user.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["id", "name", "friends"]);
        assert!(user.fields[1].deprecation_status.is_deprecated());
        assert_eq!(user.fields[1].deprecation_status.reason(), None);

        let friends = &user.fields[2];
        assert_eq!(friends.field_type.to_string(), "[User!]!");
        assert_eq!(friends.arguments()[0].default_value, Some(InputValue::scalar(5)));

        let Some(MetaType::InputObject(sort)) = schema.concrete_type_by_name("SortInput") else {
            panic!("`SortInput` is an input object");
        };
        assert_eq!(sort.input_fields[0].default_value, Some(InputValue::enum_value("id")));
        assert_eq!(sort.input_fields[1].default_value, Some(InputValue::scalar(false)));

        let Some(MetaType::Enum(sortable)) = schema.concrete_type_by_name("Sortable") else {
            panic!("`Sortable` is an enum");
        };
        assert_eq!(sortable.values[2].deprecation_status.reason(), Some("use id"));

        let Some(MetaType::Scalar(date)) = schema.concrete_type_by_name("DateTime") else {
            panic!("`DateTime` is a scalar");
        };
        assert_eq!(date.description.as_deref(), Some("An instant in time"));
        assert_eq!(
            date.specified_by_url.as_deref(),
            Some("https://tools.ietf.org/html/rfc3339"),
        );
    }

    #[test]
    fn reports_errors() {
        assert!(matches!(
            SchemaType::parse("type Query {"),
            Err(SchemaError::Parse(_)),
        ));
        assert!(matches!(
            SchemaType::parse("type Query { me: Me }"),
            Err(SchemaError::UnknownType { .. }),
        ));
        assert!(matches!(
            SchemaType::from_file("/nonexistent/schema.graphql"),
            Err(SchemaError::Io { .. }),
        ));
    }
}
