use std::{collections::HashSet, fmt};

use crate::{
    ast::{InputValue, Type},
    schema::{
        meta::{EnumMeta, InputObjectMeta, MetaType, ScalarMeta},
        model::{SchemaType, TypeType},
    },
};

#[derive(Debug)]
enum Path<'a> {
    Root,
    ArrayElement(usize, &'a Path<'a>),
    ObjectField(&'a str, &'a Path<'a>),
}

/// Checks whether a value is acceptable for a type of a schema, following the
/// GraphQL input coercion rules.
pub trait CoerceInputValue {
    /// Lists every reason the `value` can't be coerced to the type `ty`.
    ///
    /// An empty result means the value is valid.
    fn coercion_errors(&self, value: &InputValue, ty: &Type) -> Vec<String>;

    /// Returns `None` if the `value` is valid for the type `ty`, or a human
    /// readable message describing every problem otherwise.
    fn coerce_input_value(&self, value: &InputValue, ty: &Type) -> Option<String> {
        let errors = self.coercion_errors(value, ty);
        (!errors.is_empty()).then(|| errors.join("\n"))
    }
}

impl CoerceInputValue for SchemaType {
    fn coercion_errors(&self, value: &InputValue, ty: &Type) -> Vec<String> {
        let mut errs = match self.make_type(ty) {
            Some(meta_type) => unify_value(value, &meta_type, self, Path::Root),
            None => vec![format!(r#"Unknown type "{}"."#, ty.innermost_name())],
        };
        errs.sort();
        errs
    }
}

/// Validates the `value` against the type `ty` of the `schema`.
///
/// Returns `None` on success, or the error message.
pub fn validate_input_value(schema: &SchemaType, value: &InputValue, ty: &Type) -> Option<String> {
    schema.coerce_input_value(value, ty)
}

fn unify_value(
    value: &InputValue,
    meta_type: &TypeType<'_>,
    schema: &SchemaType,
    path: Path<'_>,
) -> Vec<String> {
    let mut errors: Vec<String> = vec![];

    match meta_type {
        TypeType::NonNull(inner) => {
            if value.is_null() {
                errors.push(unification_error(
                    &path,
                    format!(r#"Expected "{meta_type}", found null"#),
                ));
            } else {
                errors.append(&mut unify_value(value, inner, schema, path));
            }
        }

        TypeType::List(inner) => {
            if value.is_null() {
                return errors;
            }

            match value.to_list_value() {
                Some(l) => {
                    for (i, v) in l.iter().enumerate() {
                        errors.append(&mut unify_value(
                            v,
                            inner,
                            schema,
                            Path::ArrayElement(i, &path),
                        ));
                    }
                }
                None => errors.append(&mut unify_value(value, inner, schema, path)),
            }
        }

        TypeType::Concrete(mt) => {
            if value.is_null() {
                return errors;
            }

            match mt {
                MetaType::Scalar(sm) => errors.append(&mut unify_scalar(value, sm, &path)),
                MetaType::Enum(em) => errors.append(&mut unify_enum(value, em, &path)),
                MetaType::InputObject(iom) => {
                    errors.append(&mut unify_input_object(value, iom, schema, &path));
                }
                MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_) => {
                    errors.push(unification_error(
                        &path,
                        format!(r#""{}" is not an input type"#, mt.name()),
                    ));
                }
            }
        }
    }
    errors
}

fn unify_scalar(value: &InputValue, meta: &ScalarMeta, path: &Path<'_>) -> Vec<String> {
    match value {
        InputValue::List(_) => vec![unification_error(
            path,
            format!(r#"Expected "{}", found list"#, meta.name),
        )],
        InputValue::Object(_) => vec![unification_error(
            path,
            format!(r#"Expected "{}", found object"#, meta.name),
        )],
        _ => match meta.try_parse(value) {
            Ok(()) => vec![],
            Err(e) => vec![unification_error(path, e)],
        },
    }
}

fn unify_enum(value: &InputValue, meta: &EnumMeta, path: &Path<'_>) -> Vec<String> {
    let name = match value {
        InputValue::Enum(name) => Some(name.as_str()),
        InputValue::Scalar(scalar) => scalar.as_str(),
        _ => None,
    };

    match name {
        Some(name) if meta.values.iter().any(|ev| ev.name.as_str() == name) => vec![],
        Some(name) => vec![unification_error(
            path,
            format!(r#"Value "{name}" does not exist in "{}" enum"#, meta.name),
        )],
        None => vec![unification_error(
            path,
            format!(r#"Expected "{}", found not a string or enum"#, meta.name),
        )],
    }
}

fn unify_input_object(
    value: &InputValue,
    meta: &InputObjectMeta,
    schema: &SchemaType,
    path: &Path<'_>,
) -> Vec<String> {
    let mut errors: Vec<String> = vec![];

    if let Some(ref obj) = value.to_object_value() {
        let mut keys = obj.keys().collect::<HashSet<&&str>>();

        for input_field in &meta.input_fields {
            let mut has_value = false;
            keys.remove(&input_field.name.as_str());

            if let Some(value) = obj.get(input_field.name.as_str()) {
                if !value.is_null() {
                    has_value = true;

                    match schema.make_type(&input_field.arg_type) {
                        Some(field_type) => errors.append(&mut unify_value(
                            value,
                            &field_type,
                            schema,
                            Path::ObjectField(&input_field.name, path),
                        )),
                        None => errors.push(unification_error(
                            &Path::ObjectField(&input_field.name, path),
                            format!(
                                r#"Unknown type "{}""#,
                                input_field.arg_type.innermost_name(),
                            ),
                        )),
                    }
                }
            }

            if !has_value
                && input_field.arg_type.is_non_null()
                && input_field.default_value.is_none()
            {
                errors.push(unification_error(
                    &Path::ObjectField(&input_field.name, path),
                    format!(r#"Expected "{}", found null"#, input_field.arg_type),
                ));
            }
        }

        for key in keys {
            errors.push(unification_error(
                &Path::ObjectField(key, path),
                format!(r#"Field "{key}" is not defined by type "{}""#, meta.name),
            ));
        }
    } else {
        errors.push(unification_error(
            path,
            format!(r#"Expected "{}", found not an object"#, meta.name),
        ));
    }
    errors
}

fn unification_error(path: &Path<'_>, message: impl fmt::Display) -> String {
    format!("{path}{message}.")
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Path::Root => write!(f, ""),
            Path::ArrayElement(idx, prev) => write!(f, "{prev}In element #{idx}: "),
            Path::ObjectField(name, prev) => write!(f, r#"{prev}In field "{name}": "#),
        }
    }
}
