// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static field accessors over record instances.

use super::instance::TypedInstance;
use crate::error::{ModelError, Result};

/// Check that `instance` is a `type_name` record declaring every field in
/// `fields`. Used by [`typed_record!`](crate::typed_record).
#[doc(hidden)]
pub fn check_record_fields(instance: &TypedInstance, type_name: &str, fields: &[&str]) -> Result<()> {
    let Some(descriptor) = instance.descriptor() else {
        return Err(ModelError::UnknownType(instance.type_name()));
    };
    if !instance.is_record() || descriptor.name() != type_name {
        return Err(ModelError::InvalidOperation {
            type_name: instance.type_name(),
            operation: format!("view as {}", type_name),
        });
    }
    match fields.iter().find(|f| descriptor.field(f).is_none()) {
        Some(missing) => Err(ModelError::Definition {
            path: format!("{}.{}", type_name, missing),
            message: "field is not declared on the registered type".to_string(),
        }),
        None => Ok(()),
    }
}

/// Declare a typed view over a registered record type.
///
/// Each `field / setter` pair generates a getter returning the stored
/// [`TypedValue`](crate::TypedValue) and a setter routed through the
/// validating [`TypedInstance::set`].
///
/// ```rust
/// use serde_json::json;
/// use typemodel::{typed_record, TypeRegistry};
///
/// typed_record! {
///     pub struct User: "User" {
///         name / set_name,
///         age / set_age,
///     }
/// }
///
/// let mut builder = TypeRegistry::builder();
/// let (string, number) = (builder.string(), builder.number());
/// builder
///     .define("User", |_| vec![("name", string), ("age", number.with_default(10))])
///     .unwrap();
/// let registry = builder.build();
///
/// let user = User::create(&registry, json!({"name": "x"})).unwrap();
/// user.set_age(42).unwrap();
/// assert_eq!(user.name().as_str(), Some("x"));
/// assert_eq!(user.age().as_i64(), Some(42));
/// assert!(user.set_age("old").is_err());
/// ```
#[macro_export]
macro_rules! typed_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $type_name:literal {
            $( $field:ident / $setter:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name($crate::TypedInstance);

        impl $name {
            pub const TYPE_NAME: &'static str = $type_name;
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];

            pub fn create(
                registry: &::std::sync::Arc<$crate::TypeRegistry>,
                input: impl Into<$crate::Input>,
            ) -> $crate::Result<Self> {
                let ty = registry
                    .lookup(Self::TYPE_NAME)
                    .ok_or_else(|| $crate::ModelError::UnknownType(Self::TYPE_NAME.to_string()))?;
                Self::from_instance(registry.create(&ty, input)?)
            }

            pub fn from_instance(instance: $crate::TypedInstance) -> $crate::Result<Self> {
                $crate::value::check_record_fields(&instance, Self::TYPE_NAME, Self::FIELDS)?;
                Ok(Self(instance))
            }

            pub fn instance(&self) -> &$crate::TypedInstance {
                &self.0
            }

            pub fn into_instance(self) -> $crate::TypedInstance {
                self.0
            }

            pub fn as_read_only(&self) -> Self {
                Self(self.0.as_read_only())
            }

            $(
                pub fn $field(&self) -> $crate::TypedValue {
                    self.0
                        .get(stringify!($field))
                        .unwrap_or_else($crate::TypedValue::null)
                }

                pub fn $setter(&self, value: impl Into<$crate::Input>) -> $crate::Result<&Self> {
                    self.0.set(stringify!($field), value)?;
                    Ok(self)
                }
            )*
        }
    };
}
