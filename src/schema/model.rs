use std::fmt;

use arcstr::ArcStr;
use fnv::FnvHashMap;

use crate::{
    ast::Type,
    schema::{
        SchemaError,
        meta::{Argument, Field, InputObjectMeta, InterfaceMeta, MetaType, ObjectMeta, UnionMeta},
    },
    types::scalars::builtin_scalars,
};

/// Name of the root query type when a schema doesn't declare one.
pub const DEFAULT_QUERY_TYPE_NAME: &str = "Query";

/// Metadata for a schema
///
/// Every type referenced by a field, an argument or an input field is
/// guaranteed to be registered, so [`SchemaType::make_type()`] only fails for
/// type literals built outside of this schema.
#[derive(Clone, Debug)]
pub struct SchemaType {
    pub(crate) types: FnvHashMap<ArcStr, MetaType>,
    pub(crate) query_type_name: ArcStr,
    pub(crate) mutation_type_name: Option<ArcStr>,
    pub(crate) subscription_type_name: Option<ArcStr>,
}

/// A type reference resolved against a [`SchemaType`]
///
/// Unlike a [`Type`] literal, the named type at the bottom of the wrapping
/// chain is the schema's metadata itself.
#[derive(Clone, Debug)]
pub enum TypeType<'a> {
    /// A named type.
    Concrete(&'a MetaType),
    /// A non-null wrapper.
    NonNull(Box<TypeType<'a>>),
    /// A list wrapper.
    List(Box<TypeType<'a>>),
}

impl SchemaType {
    /// Assembles a schema out of the provided type definitions.
    ///
    /// The built-in scalars are always registered; redefining one of them as a
    /// scalar is a no-op. The query root defaults to [`DEFAULT_QUERY_TYPE_NAME`]
    /// and, unlike an explicitly named root, is allowed to be absent.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::DuplicateType`] if a name is defined twice;
    /// - [`SchemaError::UnknownType`] if a definition refers to an unknown type;
    /// - [`SchemaError::UnknownRootType`] if an explicitly named root type is
    ///   missing.
    pub fn new(
        types: impl IntoIterator<Item = MetaType>,
        query_type_name: Option<ArcStr>,
        mutation_type_name: Option<ArcStr>,
        subscription_type_name: Option<ArcStr>,
    ) -> Result<Self, SchemaError> {
        let mut registry = FnvHashMap::default();
        for scalar in builtin_scalars() {
            registry.insert(scalar.name().clone(), scalar);
        }

        for meta in types {
            let name = meta.name().clone();
            if meta.is_builtin() && matches!(meta, MetaType::Scalar(_)) {
                continue;
            }
            if registry.insert(name.clone(), meta).is_some() {
                return Err(SchemaError::DuplicateType(name));
            }
        }

        let schema = Self {
            types: registry,
            query_type_name: query_type_name
                .clone()
                .unwrap_or_else(|| DEFAULT_QUERY_TYPE_NAME.into()),
            mutation_type_name,
            subscription_type_name,
        };

        for root in [
            query_type_name.as_ref(),
            schema.mutation_type_name.as_ref(),
            schema.subscription_type_name.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if !schema.types.contains_key(root) {
                return Err(SchemaError::UnknownRootType(root.clone()));
            }
        }

        schema.check_references()?;

        Ok(schema)
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        let known = |type_name: &str, referenced_by: String| {
            if self.types.contains_key(type_name) {
                Ok(())
            } else {
                Err(SchemaError::UnknownType {
                    type_name: type_name.into(),
                    referenced_by,
                })
            }
        };
        let check_fields = |owner: &ArcStr, fields: &[Field]| -> Result<(), SchemaError> {
            for field in fields {
                known(
                    field.field_type.innermost_name(),
                    format!("{owner}.{}", field.name),
                )?;
                for arg in field.arguments() {
                    known(
                        arg.arg_type.innermost_name(),
                        format!("{owner}.{}({})", field.name, arg.name),
                    )?;
                }
            }
            Ok(())
        };
        let check_arguments = |owner: &ArcStr, args: &[Argument]| -> Result<(), SchemaError> {
            for arg in args {
                known(arg.arg_type.innermost_name(), format!("{owner}.{}", arg.name))?;
            }
            Ok(())
        };

        for meta in self.types.values() {
            match meta {
                MetaType::Object(ObjectMeta {
                    name,
                    fields,
                    interface_names,
                    ..
                })
                | MetaType::Interface(InterfaceMeta {
                    name,
                    fields,
                    interface_names,
                    ..
                }) => {
                    check_fields(name, fields)?;
                    for iface in interface_names {
                        known(iface.as_str(), name.to_string())?;
                    }
                }
                MetaType::InputObject(InputObjectMeta {
                    name, input_fields, ..
                }) => check_arguments(name, input_fields)?,
                MetaType::Union(UnionMeta {
                    name,
                    of_type_names,
                    ..
                }) => {
                    for member in of_type_names {
                        known(member.as_str(), name.to_string())?;
                    }
                }
                MetaType::Scalar(_) | MetaType::Enum(_) => {}
            }
        }
        Ok(())
    }

    /// Get a type by name.
    pub fn type_by_name(&self, name: &str) -> Option<TypeType<'_>> {
        self.types.get(name).map(TypeType::Concrete)
    }

    /// Get a concrete type by name.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// Get the query type, if it's defined.
    pub fn query_type(&self) -> Option<TypeType<'_>> {
        self.type_by_name(&self.query_type_name)
    }

    /// Name of the query root type.
    pub fn query_type_name(&self) -> &str {
        &self.query_type_name
    }

    /// Resolves a [`Type`] literal, or returns `None` if its named type isn't
    /// registered.
    pub fn make_type(&self, t: &Type) -> Option<TypeType<'_>> {
        Some(match t {
            Type::NonNullNamed(n) => TypeType::NonNull(Box::new(self.type_by_name(n)?)),
            Type::NonNullList(inner) => {
                TypeType::NonNull(Box::new(TypeType::List(Box::new(self.make_type(inner)?))))
            }
            Type::Named(n) => self.type_by_name(n)?,
            Type::List(inner) => TypeType::List(Box::new(self.make_type(inner)?)),
        })
    }
}

impl<'a> TypeType<'a> {
    #[inline]
    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn innermost_concrete(&self) -> &'a MetaType {
        match self {
            Self::Concrete(t) => t,
            Self::NonNull(n) | Self::List(n) => n.innermost_concrete(),
        }
    }

    /// Returns the item type, if this is a (possibly non-null) list.
    #[inline]
    pub fn list_contents(&self) -> Option<&TypeType<'a>> {
        match self {
            Self::List(n) => Some(n),
            Self::NonNull(n) => n.list_contents(),
            Self::Concrete(_) => None,
        }
    }

    /// Checks whether the outermost layer is non-null.
    #[inline]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }
}

impl fmt::Display for TypeType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(t) => f.write_str(t.name()),
            Self::List(i) => write!(f, "[{i}]"),
            Self::NonNull(i) => write!(f, "{i}!"),
        }
    }
}
