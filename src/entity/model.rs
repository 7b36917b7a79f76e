use crate::{
    entity::{
        Entity,
        value::{FieldType, Value},
    },
    query::parse::ParseFromRow,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveModelValue<T>
where
    T: FieldType + Clone,
{
    Set(T),
    Unchanged(T),
    NotSet,
}

impl<T> ActiveModelValue<T>
where
    T: FieldType + Clone,
{
    pub fn get(&self) -> Option<&T> {
        Option::from(self)
    }

    pub fn set(&mut self, value: T) {
        *self = Self::Set(value);
    }

    pub fn clear(&mut self) {
        *self = Self::NotSet;
    }

    pub fn mark_unchanged(&mut self) {
        if let Self::Set(e) = self {
            *self = Self::Unchanged(e.clone());
        }
    }

    /// The value to write, if there is one.
    pub fn to_value(&self) -> Option<Value> {
        self.get().cloned().map(Into::into)
    }
}

impl<T> Default for ActiveModelValue<T>
where
    T: FieldType + Clone,
{
    fn default() -> Self {
        Self::NotSet
    }
}

impl<T> From<T> for ActiveModelValue<T>
where
    T: FieldType + Clone,
{
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<'m, T> From<&'m ActiveModelValue<T>> for Option<&'m T>
where
    T: FieldType + Clone,
{
    fn from(value: &'m ActiveModelValue<T>) -> Self {
        match value {
            ActiveModelValue::Set(e) | ActiveModelValue::Unchanged(e) => Some(e),
            ActiveModelValue::NotSet => None,
        }
    }
}

/// A fully read row, as returned by [`Record::load`](crate::entity::record::Record::load).
pub trait Model: ParseFromRow + Sized {
    type Entity: Entity;
    type ActiveModel: ActiveModel;

    fn into_active(self) -> Self::ActiveModel;
}

/// Column values for a row that is about to be written, e.g. by
/// [`Entity::insert`](crate::entity::Entity::insert).
pub trait ActiveModel: Default {
    type Model: Model;

    /// The column/value pairs that have a value, in declaration order.
    fn assignments(&self) -> Vec<(&'static str, Value)>;
}
