//! Tri-state fields for template-resolvable object data.

/// A value that is either unset or explicitly set.
///
/// Template resolution only fills fields that are [`Field::Unset`]. An explicit
/// `Set(0.0)` or `Set(false)` is a real value and must survive resolution, which
/// is why plain `Default` values or sentinels can't be used here.
///
/// # Example
///
/// ```rust
/// use bevy_tiledbake_compiler::Field;
///
/// let mut x = Field::Unset;
/// x.inherit(&Field::Set(10.0));
/// assert_eq!(x, Field::Set(10.0));
///
/// let mut y = Field::Set(0.0);
/// y.inherit(&Field::Set(10.0));
/// assert_eq!(y, Field::Set(0.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Field<T> {
    /// Never assigned by the document.
    #[default]
    Unset,
    /// Assigned by the document, possibly to a default-looking value.
    Set(T),
}

impl<T> Field<T> {
    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, Field::Set(_))
    }

    /// Borrow the value if set.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        match self {
            Field::Set(value) => Some(value),
            Field::Unset => None,
        }
    }

    /// Copy `other` into `self` when `self` is unset and `other` is set.
    ///
    /// Returns `true` if a value was taken from `other`.
    pub fn inherit(&mut self, other: &Field<T>) -> bool
    where
        T: Clone,
    {
        match (&*self, other) {
            (Field::Unset, Field::Set(value)) => {
                *self = Field::Set(value.clone());
                true
            }
            _ => false,
        }
    }

    /// The set value, or `fallback` when unset.
    #[inline]
    pub fn value_or(&self, fallback: T) -> T
    where
        T: Clone,
    {
        self.get().cloned().unwrap_or(fallback)
    }
}

impl<T: Clone + Default> Field<T> {
    /// The set value, or `T::default()` when unset.
    #[inline]
    pub fn value_or_default(&self) -> T {
        self.get().cloned().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Set(value),
            None => Field::Unset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherit_fills_unset() {
        let mut field: Field<u32> = Field::Unset;
        assert!(field.inherit(&Field::Set(7)));
        assert_eq!(field, Field::Set(7));
    }

    #[test]
    fn test_inherit_keeps_explicit_default() {
        let mut visible = Field::Set(false);
        assert!(!visible.inherit(&Field::Set(true)));
        assert_eq!(visible, Field::Set(false));
    }

    #[test]
    fn test_inherit_from_unset_is_noop() {
        let mut field: Field<String> = Field::Unset;
        assert!(!field.inherit(&Field::Unset));
        assert!(!field.is_set());
    }

    #[test]
    fn test_value_or_default() {
        assert_eq!(Field::<f32>::Unset.value_or_default(), 0.0);
        assert_eq!(Field::Set(2.5_f32).value_or_default(), 2.5);
        assert!(Field::<bool>::Unset.value_or(true));
    }
}
