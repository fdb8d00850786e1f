/// A custom property.
///
/// Values are kept as strings regardless of their Tiled type. Class-typed
/// properties carry their members as `children`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub children: Vec<Property>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }
}

/// Append every property of `fallback` whose name is not already in `target`.
///
/// Properties already in `target` always win, and their relative order is kept.
pub fn merge_properties(target: &mut Vec<Property>, fallback: &[Property]) {
    for property in fallback {
        if !target.iter().any(|existing| existing.name == property.name) {
            target.push(property.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_properties_instance_wins() {
        let mut target = vec![Property::new("speed", "3")];
        let fallback = vec![Property::new("speed", "10"), Property::new("team", "red")];

        merge_properties(&mut target, &fallback);

        assert_eq!(
            target,
            vec![Property::new("speed", "3"), Property::new("team", "red")]
        );
    }
}
