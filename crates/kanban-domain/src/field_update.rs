use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Three-state update for an optional field in a partial update request.
///
/// On the wire the three states map onto JSON like this:
/// - key absent: `NoChange` (needs `#[serde(default)]` on the field)
/// - `null`: `Clear`
/// - a value: `Set(value)`
///
/// # Example
///
/// ```
/// use kanban_domain::FieldUpdate;
///
/// let title_update = FieldUpdate::Set("New Title".to_string());
/// let description_update: FieldUpdate<String> = FieldUpdate::Clear;
/// let due_date_update: FieldUpdate<String> = FieldUpdate::NoChange;
/// assert!(title_update.is_change());
/// assert!(description_update.is_change());
/// assert!(!due_date_update.is_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Do not modify this field (keep existing value)
    NoChange,
    /// Set the field to the provided value
    Set(T),
    /// Clear the field (set to None)
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::NoChange
    }
}

impl<T> FieldUpdate<T> {
    /// Apply this update to an optional field
    ///
    /// ```
    /// use kanban_domain::FieldUpdate;
    ///
    /// let mut field = Some("old value".to_string());
    /// FieldUpdate::Set("new value".to_string()).apply_to(&mut field);
    /// assert_eq!(field, Some("new value".to_string()));
    ///
    /// FieldUpdate::Clear.apply_to(&mut field);
    /// assert_eq!(field, None);
    /// ```
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    /// Check if this represents a change (not NoChange)
    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }

    pub fn is_no_change(&self) -> bool {
        !self.is_change()
    }

    /// Transform the carried value, keeping the update state.
    /// A failing transform aborts with its error.
    pub fn try_map<U, E, F>(self, f: F) -> Result<FieldUpdate<U>, E>
    where
        F: FnOnce(T) -> Result<FieldUpdate<U>, E>,
    {
        match self {
            FieldUpdate::NoChange => Ok(FieldUpdate::NoChange),
            FieldUpdate::Clear => Ok(FieldUpdate::Clear),
            FieldUpdate::Set(value) => f(value),
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// Convert Option<T> to FieldUpdate<T>
    /// - Some(value) becomes Set(value)
    /// - None becomes Clear
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(FieldUpdate::from)
    }
}

/// `NoChange` serializes as `null` too, so pair the field with
/// `skip_serializing_if = "FieldUpdate::is_no_change"`.
impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldUpdate::Set(value) => serializer.serialize_some(value),
            FieldUpdate::NoChange | FieldUpdate::Clear => serializer.serialize_none(),
        }
    }
}
