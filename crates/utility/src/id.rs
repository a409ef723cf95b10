use std::{borrow::Cow, fmt, hash, marker::PhantomData};

use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Serialize};

pub trait HasId {
    type IdType;
}

/// An identifier typed by the entity it refers to, so a route id can not be
/// passed where a user id is expected.
pub struct Id<T: HasId>(T::IdType, PhantomData<T>);

impl<T: HasId> Id<T> {
    pub fn new(inner: T::IdType) -> Self {
        Self(inner, PhantomData)
    }

    pub fn into_raw(self) -> T::IdType {
        self.0
    }
}

impl<T: HasId> Id<T>
where
    T::IdType: Clone,
{
    pub fn raw(&self) -> T::IdType {
        self.0.clone()
    }

    pub fn raw_ref<R>(&self) -> &R
    where
        T::IdType: AsRef<R>,
        R: ?Sized,
    {
        self.0.as_ref()
    }
}

impl<T: HasId> Id<T>
where
    T::IdType: From<String>,
{
    /// Builds a url friendly id from a human readable name, e.g.
    /// `"Ruta del Parque 5K"` becomes `"ruta-del-parque-5k"`.
    pub fn from_name(name: &str) -> Self {
        let inner = name
            .trim()
            .chars()
            .filter_map(|c| match c {
                ' ' => Some('-'),
                'á' | 'Á' => Some('a'),
                'é' | 'É' => Some('e'),
                'í' | 'Í' => Some('i'),
                'ó' | 'Ó' => Some('o'),
                'ú' | 'Ú' => Some('u'),
                'ñ' | 'Ñ' => Some('n'),
                ch if ch.is_ascii_alphanumeric() => Some(ch.to_ascii_lowercase()),
                _ => None,
            })
            .collect::<String>();
        Self::new(inner.into())
    }
}

impl<T: HasId> Default for Id<T>
where
    T::IdType: Default,
{
    fn default() -> Self {
        Self(Default::default(), PhantomData)
    }
}

impl<T: HasId> fmt::Debug for Id<T>
where
    T::IdType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.0).finish()
    }
}

impl<T: HasId> fmt::Display for Id<T>
where
    T::IdType: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: HasId> Clone for Id<T>
where
    T::IdType: Clone,
{
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T: HasId> hash::Hash for Id<T>
where
    T::IdType: hash::Hash,
{
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T: HasId> PartialEq for Id<T>
where
    T::IdType: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl<T: HasId> Eq for Id<T> where T::IdType: Eq {}

impl<'de, T: HasId> Deserialize<'de> for Id<T>
where
    T::IdType: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::IdType::deserialize(deserializer).map(Id::new)
    }
}

impl<T: HasId> Serialize for Id<T>
where
    T::IdType: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T: HasId + JsonSchema> JsonSchema for Id<T>
where
    T::IdType: Serialize,
{
    fn schema_name() -> String {
        // Exclude the module path to make the name in generated schemas clearer.
        format!("{}Id", T::schema_name())
    }

    fn schema_id() -> Cow<'static, str> {
        // Include the module, in case a type with the same name is in another module/crate
        Cow::Borrowed(concat!(module_path!(), "::Id"))
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("id".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    struct Thing;

    impl HasId for Thing {
        type IdType = String;
    }

    #[rstest]
    #[case("Ruta del Parque 5K", "ruta-del-parque-5k")]
    #[case("  Montaña Azul ", "montana-azul")]
    #[case("Río Élite!", "rio-elite")]
    fn test_from_name(#[case] name: &str, #[case] expected: &str) {
        let id = Id::<Thing>::from_name(name);
        assert_eq!(expected, id.raw_ref::<str>());
    }

    #[test]
    fn test_serializes_transparently() {
        let id = Id::<Thing>::new("abc".to_owned());
        assert_eq!("\"abc\"", serde_json::to_string(&id).unwrap());
        let back: Id<Thing> = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, back);
    }
}
