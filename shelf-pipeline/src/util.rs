/// Last path segment of a type name, used as a stable component name in logs.
///
/// `"shelf_pipeline::components::category_filter::CategoryFilter"` becomes
/// `"CategoryFilter"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// Distinct values in first-seen order.
pub fn distinct_in_order<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("a::b::CategoryFilter"), "CategoryFilter");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let values = ["Tea", "Spices", "Tea", "Supplements", "Spices"];
        assert_eq!(
            distinct_in_order(values.iter().copied()),
            vec!["Tea", "Spices", "Supplements"]
        );
    }
}
